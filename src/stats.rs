use std::cmp::Ordering;

use crate::error::StatsError;
use crate::models::{BucketCount, GpaBucket, StudentRecord, Summary, TrendPoint};

pub const AT_RISK_GPA: f64 = 2.5;
pub const AT_RISK_ATTENDANCE: f64 = 85.0;

pub fn aggregate(records: &[StudentRecord]) -> Result<Summary, StatsError> {
    if records.is_empty() {
        return Err(StatsError::EmptyRoster);
    }

    let count = records.len() as f64;
    let gpa_total: f64 = records.iter().map(|r| r.gpa).sum();
    let attendance_total: f64 = records.iter().map(|r| r.attendance_rate).sum();

    let mut histogram: Vec<BucketCount> = GpaBucket::ALL
        .into_iter()
        .map(|bucket| BucketCount {
            bucket,
            label: bucket.label(),
            count: 0,
        })
        .collect();
    for record in records {
        let bucket = bucket_for(record.gpa);
        if let Some(entry) = histogram.iter_mut().find(|entry| entry.bucket == bucket) {
            entry.count += 1;
        }
    }

    Ok(Summary {
        total_count: records.len(),
        mean_gpa: round_to(gpa_total / count, 2),
        mean_attendance: round_to(attendance_total / count, 1),
        at_risk_count: records.iter().filter(|r| is_at_risk(r)).count(),
        gpa_histogram: histogram,
        trend_series: trend_series(records),
    })
}

/// Either threshold is enough; a student below both still counts once.
pub fn is_at_risk(record: &StudentRecord) -> bool {
    record.gpa < AT_RISK_GPA || record.attendance_rate < AT_RISK_ATTENDANCE
}

/// Half-open buckets: the lower edge belongs to the higher bucket.
pub fn bucket_for(gpa: f64) -> GpaBucket {
    if gpa >= 3.5 {
        GpaBucket::Top
    } else if gpa >= 3.0 {
        GpaBucket::Upper
    } else if gpa >= 2.5 {
        GpaBucket::Middle
    } else {
        GpaBucket::Low
    }
}

pub fn trend_series(records: &[StudentRecord]) -> Vec<TrendPoint> {
    let mut sorted: Vec<&StudentRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.gpa.partial_cmp(&b.gpa).unwrap_or(Ordering::Equal));
    sorted
        .into_iter()
        .map(|record| TrendPoint {
            label: record.first_name.clone(),
            gpa: record.gpa,
            attendance_rate: record.attendance_rate,
        })
        .collect()
}

/// Rounds the exact decimal value of `value`, so a stored `1.115`
/// (really 1.11499...) becomes 1.11.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GradeLevel;
    use crate::store::RosterStore;

    fn sample_student(first_name: &str, gpa: f64, attendance_rate: f64) -> StudentRecord {
        StudentRecord {
            id: first_name.to_lowercase(),
            first_name: first_name.to_string(),
            last_name: "Lee".to_string(),
            email: format!("{}@edutrack.edu", first_name.to_lowercase()),
            grade_level: GradeLevel::Junior,
            gpa,
            attendance_rate,
            grades: Vec::new(),
            avatar_url: String::new(),
            activities: None,
        }
    }

    #[test]
    fn fixture_summary_matches_dashboard() {
        let summary = aggregate(RosterStore::fixture().records()).unwrap();
        assert_eq!(summary.total_count, 5);
        assert!((summary.mean_gpa - 3.55).abs() < 1e-9);
        assert!((summary.mean_attendance - 94.4).abs() < 1e-9);
        assert_eq!(summary.at_risk_count, 0);
        assert_eq!(summary.bucket_count(GpaBucket::Top), 3);
        assert_eq!(summary.bucket_count(GpaBucket::Upper), 1);
        assert_eq!(summary.bucket_count(GpaBucket::Middle), 1);
        assert_eq!(summary.bucket_count(GpaBucket::Low), 0);
    }

    #[test]
    fn empty_roster_is_rejected() {
        assert_eq!(aggregate(&[]), Err(StatsError::EmptyRoster));
    }

    #[test]
    fn at_risk_uses_either_threshold_once() {
        let records = vec![
            sample_student("Avery", 2.4, 90.0),
            sample_student("Jules", 3.0, 80.0),
            sample_student("Kiara", 2.0, 60.0),
            sample_student("Rowan", 2.5, 85.0),
        ];
        let summary = aggregate(&records).unwrap();
        assert_eq!(summary.at_risk_count, 3);
        assert!(!is_at_risk(&records[3]));
    }

    #[test]
    fn bucket_edges_go_to_the_higher_bucket() {
        assert_eq!(bucket_for(3.5), GpaBucket::Top);
        assert_eq!(bucket_for(3.4999), GpaBucket::Upper);
        assert_eq!(bucket_for(3.0), GpaBucket::Upper);
        assert_eq!(bucket_for(2.5), GpaBucket::Middle);
        assert_eq!(bucket_for(2.4999), GpaBucket::Low);
        assert_eq!(bucket_for(-1.0), GpaBucket::Low);
        assert_eq!(bucket_for(4.3), GpaBucket::Top);
    }

    #[test]
    fn every_record_lands_in_exactly_one_bucket() {
        let records: Vec<StudentRecord> = [0.0, 2.49, 2.5, 2.99, 3.0, 3.49, 3.5, 4.0]
            .into_iter()
            .enumerate()
            .map(|(i, gpa)| sample_student(&format!("S{i}"), gpa, 95.0))
            .collect();
        let summary = aggregate(&records).unwrap();
        let total: usize = summary.gpa_histogram.iter().map(|b| b.count).sum();
        assert_eq!(total, records.len());
        assert_eq!(summary.bucket_count(GpaBucket::Top), 2);
        assert_eq!(summary.bucket_count(GpaBucket::Low), 2);
    }

    #[test]
    fn trend_series_sorts_by_gpa_and_keeps_pairs() {
        let records = vec![
            sample_student("Alice", 3.8, 98.0),
            sample_student("Michael", 3.95, 99.0),
            sample_student("Sarah", 3.2, 85.0),
        ];
        let trend = trend_series(&records);
        let pairs: Vec<(&str, f64, f64)> = trend
            .iter()
            .map(|p| (p.label.as_str(), p.gpa, p.attendance_rate))
            .collect();
        assert_eq!(
            pairs,
            [
                ("Sarah", 3.2, 85.0),
                ("Alice", 3.8, 98.0),
                ("Michael", 3.95, 99.0)
            ]
        );
    }

    #[test]
    fn trend_series_is_stable_on_ties() {
        let records = vec![
            sample_student("First", 3.0, 90.0),
            sample_student("Low", 2.0, 70.0),
            sample_student("Second", 3.0, 80.0),
        ];
        let labels: Vec<String> = trend_series(&records).into_iter().map(|p| p.label).collect();
        assert_eq!(labels, ["Low", "First", "Second"]);
    }

    #[test]
    fn rounds_the_stored_decimal_value() {
        assert_eq!(round_to(3.546, 2), 3.55);
        assert_eq!(round_to(94.44, 1), 94.4);
        assert_eq!(round_to(2.0, 2), 2.0);
        assert_eq!(round_to(1.115, 2), 1.11);
        assert_eq!(round_to(2.675, 2), 2.67);
    }

    #[test]
    fn mean_near_a_tie_displays_like_the_dashboard() {
        let summary = aggregate(&[sample_student("Avery", 1.115, 90.0)]).unwrap();
        assert_eq!(summary.mean_gpa, 1.11);
        assert_eq!(format!("{:.2}", summary.mean_gpa), "1.11");
    }

    #[test]
    fn signed_zero_gpas_keep_input_order() {
        let records = vec![
            sample_student("Positive", 0.0, 90.0),
            sample_student("Negative", -0.0, 90.0),
        ];
        let labels: Vec<String> = trend_series(&records).into_iter().map(|p| p.label).collect();
        assert_eq!(labels, ["Positive", "Negative"]);
    }
}
