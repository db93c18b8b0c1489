use std::fmt::Write;

use chrono::NaiveDate;

use crate::error::StatsError;
use crate::models::StudentRecord;
use crate::stats;

/// Markdown rendition of the dashboard overview.
pub fn build_dashboard_report(
    records: &[StudentRecord],
    generated_on: NaiveDate,
) -> Result<String, StatsError> {
    let summary = stats::aggregate(records)?;

    let mut output = String::new();

    let _ = writeln!(output, "# Dashboard Overview");
    let _ = writeln!(output, "Last updated: {}", generated_on);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(output, "- Total students: {}", summary.total_count);
    let _ = writeln!(output, "- Average GPA: {:.2}", summary.mean_gpa);
    let _ = writeln!(output, "- Avg attendance: {:.1}%", summary.mean_attendance);
    let _ = writeln!(output, "- At risk: {}", summary.at_risk_count);

    let _ = writeln!(output);
    let _ = writeln!(output, "## GPA Distribution");
    for entry in summary.gpa_histogram.iter() {
        let _ = writeln!(output, "- {}: {} students", entry.label, entry.count);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Students Needing Attention");
    let at_risk: Vec<&StudentRecord> = records.iter().filter(|r| stats::is_at_risk(r)).collect();
    if at_risk.is_empty() {
        let _ = writeln!(output, "No students below the GPA or attendance thresholds.");
    } else {
        for student in at_risk {
            let _ = writeln!(
                output,
                "- {} ({}, {}) GPA {:.2}, attendance {}%",
                student.full_name(),
                student.email,
                student.grade_level,
                student.gpa,
                student.attendance_rate
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Performance vs Attendance");
    let _ = writeln!(output, "| Student | GPA | Attendance % |");
    let _ = writeln!(output, "|---|---|---|");
    for point in summary.trend_series.iter() {
        let _ = writeln!(
            output,
            "| {} | {:.2} | {} |",
            point.label, point.gpa, point.attendance_rate
        );
    }

    Ok(output)
}
