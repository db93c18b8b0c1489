use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeLevel {
    Freshman,
    Sophomore,
    Junior,
    Senior,
}

impl GradeLevel {
    pub const ALL: [GradeLevel; 4] = [
        GradeLevel::Freshman,
        GradeLevel::Sophomore,
        GradeLevel::Junior,
        GradeLevel::Senior,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GradeLevel::Freshman => "Freshman",
            GradeLevel::Sophomore => "Sophomore",
            GradeLevel::Junior => "Junior",
            GradeLevel::Senior => "Senior",
        }
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradeLevel {
    type Err = StoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        GradeLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == value.trim())
            .ok_or_else(|| StoreError::UnknownGradeLevel(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectGrade {
    pub subject: String,
    pub score: f64,
    pub letter: String,
}

impl SubjectGrade {
    pub fn band(&self) -> LetterBand {
        match self.letter.chars().next() {
            Some('A') => LetterBand::A,
            Some('B') => LetterBand::B,
            Some('C') => LetterBand::C,
            _ => LetterBand::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub grade_level: GradeLevel,
    pub gpa: f64,
    pub attendance_rate: f64,
    pub grades: Vec<SubjectGrade>,
    pub avatar_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<String>>,
}

impl StudentRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn activities(&self) -> &[String] {
        self.activities.as_deref().unwrap_or(&[])
    }

    pub fn gpa_tier(&self) -> GpaTier {
        if self.gpa >= 3.5 {
            GpaTier::High
        } else if self.gpa >= 2.5 {
            GpaTier::Standard
        } else {
            GpaTier::Low
        }
    }

    pub fn attendance_tier(&self) -> AttendanceTier {
        if self.attendance_rate >= 90.0 {
            AttendanceTier::Good
        } else if self.attendance_rate >= 75.0 {
            AttendanceTier::Fair
        } else {
            AttendanceTier::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GpaTier {
    High,
    Standard,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttendanceTier {
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LetterBand {
    A,
    B,
    C,
    Other,
}

/// Grade-level dropdown value: either every level or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradeFilter {
    #[default]
    All,
    Level(GradeLevel),
}

impl GradeFilter {
    pub fn matches(self, level: GradeLevel) -> bool {
        match self {
            GradeFilter::All => true,
            GradeFilter::Level(wanted) => wanted == level,
        }
    }
}

impl FromStr for GradeFilter {
    type Err = StoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim() == "All" {
            return Ok(GradeFilter::All);
        }
        value.parse().map(GradeFilter::Level)
    }
}

impl fmt::Display for GradeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeFilter::All => f.write_str("All"),
            GradeFilter::Level(level) => level.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub global_search: String,
    pub name_filter: String,
    pub grade_filter: GradeFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GpaBucket {
    Top,
    Upper,
    Middle,
    Low,
}

impl GpaBucket {
    pub const ALL: [GpaBucket; 4] = [
        GpaBucket::Top,
        GpaBucket::Upper,
        GpaBucket::Middle,
        GpaBucket::Low,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GpaBucket::Top => "3.5 - 4.0",
            GpaBucket::Upper => "3.0 - 3.49",
            GpaBucket::Middle => "2.5 - 2.99",
            GpaBucket::Low => "< 2.5",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketCount {
    pub bucket: GpaBucket,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub label: String,
    pub gpa: f64,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_count: usize,
    pub mean_gpa: f64,
    pub mean_attendance: f64,
    pub at_risk_count: usize,
    pub gpa_histogram: Vec<BucketCount>,
    pub trend_series: Vec<TrendPoint>,
}

impl Summary {
    pub fn bucket_count(&self, bucket: GpaBucket) -> usize {
        self.gpa_histogram
            .iter()
            .find(|entry| entry.bucket == bucket)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}
