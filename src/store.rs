use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{GradeLevel, StudentRecord, SubjectGrade};

pub const SUBJECTS: [&str; 9] = [
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "Literature",
    "History",
    "Computer Science",
    "Art",
    "PE",
];

/// Read-only roster, loaded once and shared by every view.
#[derive(Debug, Clone)]
pub struct RosterStore {
    records: Arc<[StudentRecord]>,
}

impl RosterStore {
    pub fn new(records: Vec<StudentRecord>) -> Result<Self, StoreError> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(StoreError::DuplicateId(record.id.clone()));
            }
            if record.first_name.trim().is_empty() {
                return Err(StoreError::EmptyName {
                    id: record.id.clone(),
                    field: "first name",
                });
            }
            if record.last_name.trim().is_empty() {
                return Err(StoreError::EmptyName {
                    id: record.id.clone(),
                    field: "last name",
                });
            }
        }

        Ok(Self {
            records: records.into(),
        })
    }

    pub fn fixture() -> Self {
        Self {
            records: seed_students().into(),
        }
    }

    /// Loads a roster file, picking the format from the extension.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        let records = if is_csv {
            read_csv(path)?
        } else {
            read_json(path)?
        };
        let store = Self::new(records)
            .with_context(|| format!("invalid roster in {}", path.display()))?;
        tracing::info!(count = store.len(), path = %path.display(), "roster loaded");
        Ok(store)
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&StudentRecord> {
        self.records.iter().find(|record| record.id == id)
    }
}

fn read_json(path: &Path) -> anyhow::Result<Vec<StudentRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn read_csv(path: &Path) -> anyhow::Result<Vec<StudentRecord>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        id: Option<String>,
        first_name: String,
        last_name: String,
        email: String,
        grade_level: String,
        gpa: f64,
        attendance_rate: f64,
        grades: String,
        avatar_url: String,
        activities: Option<String>,
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut records = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let id = row
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("student-{}", Uuid::new_v4()));
        let activities = row.activities.filter(|cell| !cell.trim().is_empty()).map(|cell| {
            cell.split('|')
                .map(|activity| activity.trim().to_string())
                .filter(|activity| !activity.is_empty())
                .collect()
        });

        records.push(StudentRecord {
            id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            grade_level: row.grade_level.parse()?,
            gpa: row.gpa,
            attendance_rate: row.attendance_rate,
            grades: parse_grades(&row.grades)?,
            avatar_url: row.avatar_url,
            activities,
        });
    }

    Ok(records)
}

/// Parses a `Subject:score:letter;...` cell. The subject may itself contain spaces.
fn parse_grades(cell: &str) -> Result<Vec<SubjectGrade>, StoreError> {
    cell.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let malformed = || StoreError::MalformedGrade(entry.to_string());
            let mut parts = entry.rsplitn(3, ':');
            let letter = parts.next().ok_or_else(malformed)?.trim();
            let score = parts.next().ok_or_else(malformed)?.trim();
            let subject = parts.next().ok_or_else(malformed)?.trim();
            if subject.is_empty() || letter.is_empty() {
                return Err(malformed());
            }
            Ok(SubjectGrade {
                subject: subject.to_string(),
                score: score.parse().map_err(|_| malformed())?,
                letter: letter.to_string(),
            })
        })
        .collect()
}

fn grade(subject: &str, score: f64, letter: &str) -> SubjectGrade {
    SubjectGrade {
        subject: subject.to_string(),
        score,
        letter: letter.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn student(
    id: &str,
    first_name: &str,
    last_name: &str,
    email: &str,
    grade_level: GradeLevel,
    gpa: f64,
    attendance_rate: f64,
    activities: &[&str],
    grades: Vec<SubjectGrade>,
) -> StudentRecord {
    StudentRecord {
        id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        grade_level,
        gpa,
        attendance_rate,
        grades,
        avatar_url: format!("https://picsum.photos/200/200?random={id}"),
        activities: Some(activities.iter().map(|a| a.to_string()).collect()),
    }
}

fn seed_students() -> Vec<StudentRecord> {
    vec![
        student(
            "1",
            "Alice",
            "Johnson",
            "alice.j@edutrack.edu",
            GradeLevel::Junior,
            3.8,
            98.0,
            &["Debate Club", "Varsity Tennis"],
            vec![
                grade("Mathematics", 92.0, "A"),
                grade("Physics", 88.0, "B+"),
                grade("Literature", 95.0, "A"),
                grade("History", 90.0, "A-"),
            ],
        ),
        student(
            "2",
            "Michael",
            "Chen",
            "m.chen@edutrack.edu",
            GradeLevel::Senior,
            3.95,
            99.0,
            &["Robotics", "Student Council"],
            vec![
                grade("Mathematics", 98.0, "A+"),
                grade("Physics", 96.0, "A"),
                grade("Literature", 89.0, "B+"),
                grade("Computer Science", 100.0, "A+"),
            ],
        ),
        student(
            "3",
            "Sarah",
            "Miller",
            "s.miller@edutrack.edu",
            GradeLevel::Sophomore,
            3.2,
            85.0,
            &["Drama Club"],
            vec![
                grade("Mathematics", 78.0, "C+"),
                grade("Biology", 85.0, "B"),
                grade("Literature", 92.0, "A"),
                grade("History", 80.0, "B-"),
            ],
        ),
        student(
            "4",
            "James",
            "Wilson",
            "j.wilson@edutrack.edu",
            GradeLevel::Freshman,
            2.8,
            90.0,
            &["Football"],
            vec![
                grade("Mathematics", 72.0, "C-"),
                grade("Science", 75.0, "C"),
                grade("English", 82.0, "B-"),
                grade("History", 78.0, "C+"),
            ],
        ),
        student(
            "5",
            "Emily",
            "Davis",
            "e.davis@edutrack.edu",
            GradeLevel::Junior,
            4.0,
            100.0,
            &["Volleyball", "Yearbook"],
            vec![
                grade("Mathematics", 99.0, "A+"),
                grade("Chemistry", 97.0, "A"),
                grade("Literature", 98.0, "A+"),
                grade("History", 96.0, "A"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn fixture_has_five_unique_students() {
        let store = RosterStore::fixture();
        assert_eq!(store.len(), 5);
        assert!(RosterStore::new(store.records().to_vec()).is_ok());
        assert_eq!(store.find("2").map(|s| s.last_name.as_str()), Some("Chen"));
        assert!(store.find("99").is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut records = RosterStore::fixture().records().to_vec();
        records[1].id = "1".to_string();
        assert!(matches!(
            RosterStore::new(records),
            Err(StoreError::DuplicateId(id)) if id == "1"
        ));
    }

    #[test]
    fn rejects_blank_names() {
        let mut records = RosterStore::fixture().records().to_vec();
        records[0].last_name = "  ".to_string();
        assert!(matches!(
            RosterStore::new(records),
            Err(StoreError::EmptyName { field: "last name", .. })
        ));
    }

    #[test]
    fn parses_grade_cells() {
        let grades = parse_grades("Computer Science:100:A+; History:78:C+").unwrap();
        assert_eq!(grades.len(), 2);
        assert_eq!(grades[0].subject, "Computer Science");
        assert_eq!(grades[0].score, 100.0);
        assert_eq!(grades[1].letter, "C+");
        assert!(parse_grades("").unwrap().is_empty());
        assert!(matches!(
            parse_grades("History:high:A"),
            Err(StoreError::MalformedGrade(_))
        ));
        assert!(parse_grades("History").is_err());
    }

    #[test]
    fn loads_csv_roster() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "id,first_name,last_name,email,grade_level,gpa,attendance_rate,grades,avatar_url,activities"
        )
        .unwrap();
        writeln!(
            file,
            "7,Nia,Okafor,n.okafor@edutrack.edu,Senior,2.4,91,Art:81:B-;PE:95:A,https://example.com/n.png,Choir|Chess"
        )
        .unwrap();
        writeln!(
            file,
            ",Omar,Haddad,o.haddad@edutrack.edu,Freshman,3.1,80,Biology:70:C-,https://example.com/o.png,"
        )
        .unwrap();

        let store = RosterStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        let nia = store.find("7").unwrap();
        assert_eq!(nia.grade_level, GradeLevel::Senior);
        assert_eq!(nia.activities(), ["Choir".to_string(), "Chess".to_string()]);
        let omar = &store.records()[1];
        assert!(omar.id.starts_with("student-"));
        assert!(omar.activities.is_none());
    }

    #[test]
    fn loads_json_roster() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let json = serde_json::to_string(RosterStore::fixture().records()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let store = RosterStore::load(file.path()).unwrap();
        assert_eq!(store.records(), RosterStore::fixture().records());
    }
}
