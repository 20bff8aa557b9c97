//! Reply formatting for calculation results and history.

use crate::conversation::{CgpaOutcome, GpaOutcome};
use crate::grading::{grade_breakdown, grade_for_point, Grade};
use crate::storage::db::{BreakdownRow, LogRecord};

/// Formats the per-course breakdown and final GPA.
///
/// Line shape is load-bearing: `"<name>: <score> → <letter> (<point>) x
/// <credit> = <weighted>"`, weighted contribution and final GPA to two
/// decimals, score and point as entered/defined.
pub fn format_gpa_report(outcome: &GpaOutcome) -> String {
    let rows = grade_breakdown(&outcome.scores, outcome.catalog.courses);

    let mut report = String::from("📊 GPA Results:\n\n");
    for row in &rows {
        report.push_str(&format!(
            "{}: {} → {} ({}) x {} = {:.2}\n",
            row.course.name, row.score, row.grade.letter, row.grade.point, row.course.credit, row.weighted
        ));
    }
    report.push_str(&format!("\n🎯 Final GPA: {:.2}", outcome.gpa));
    report
}

/// Formats the CGPA result with its letter grade.
pub fn format_cgpa_report(outcome: &CgpaOutcome, cgpa: f64, credits1: u32, credits2: u32) -> String {
    let grade: Grade = grade_for_point(cgpa);
    format!(
        "📊 CGPA Results:\n\n\
         Semester 1: {} x {} credits\n\
         Semester 2: {} x {} credits\n\n\
         🎯 Cumulative GPA: {:.2} → {}",
        outcome.first, credits1, outcome.second, credits2, cgpa, grade.letter
    )
}

/// Storage rows for a completed GPA calculation.
pub fn gpa_breakdown_rows(outcome: &GpaOutcome) -> Vec<BreakdownRow> {
    grade_breakdown(&outcome.scores, outcome.catalog.courses)
        .iter()
        .map(|row| BreakdownRow {
            course: row.course.name.to_string(),
            credit: row.course.credit,
            score: row.score,
            letter: row.grade.letter.to_string(),
            point: row.grade.point,
        })
        .collect()
}

/// Storage rows for a completed CGPA calculation: one row per semester,
/// with the semester GPA in the score column.
pub fn cgpa_breakdown_rows(outcome: &CgpaOutcome, credits1: u32, credits2: u32) -> Vec<BreakdownRow> {
    [("Semester 1", outcome.first, credits1), ("Semester 2", outcome.second, credits2)]
        .into_iter()
        .map(|(label, gpa, credits)| {
            let grade = grade_for_point(gpa);
            BreakdownRow {
                course: label.to_string(),
                credit: credits,
                score: gpa,
                letter: grade.letter.to_string(),
                point: grade.point,
            }
        })
        .collect()
}

/// One-line-per-record history listing.
pub fn format_history(records: &[LogRecord]) -> String {
    if records.is_empty() {
        return "No calculations yet. Use /gpa to start one.".to_string();
    }

    let mut out = String::from("🗂 Your recent calculations:\n");
    for record in records {
        let date = record.timestamp.split('T').next().unwrap_or(&record.timestamp);
        out.push_str(&format!("\n• {} — {} {}", date, record.kind.as_str(), record.gpa));
        if let Some(id) = &record.verification_id {
            out.push_str(&format!(" (ID: {})", id));
        }
    }
    out
}

/// Detail reply for a /verify lookup.
pub fn format_verification(record: &LogRecord) -> String {
    let date = record.timestamp.split('T').next().unwrap_or(&record.timestamp);
    let mut out = format!(
        "✅ Valid record\n\nType: {}\nResult: {}\nDate: {}\n",
        record.kind.as_str(),
        record.gpa,
        date
    );
    if !record.breakdown.is_empty() {
        out.push('\n');
        for row in &record.breakdown {
            out.push_str(&format!("{}: {} → {} ({})\n", row.course, row.score, row.letter, row.point));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::catalog::YEAR1_SEMESTER2;
    use crate::storage::db::LogKind;

    #[test]
    fn gpa_report_line_shape() {
        let outcome = GpaOutcome {
            catalog: &YEAR1_SEMESTER2,
            scores: vec![95.0, 88.0, 80.0, 75.0, 70.0, 65.0, 92.0],
            gpa: 3.5,
        };
        let report = format_gpa_report(&outcome);

        assert!(report.starts_with("📊 GPA Results:"));
        assert!(report.contains("Applied Mathematics I(Math. 1041): 95 → A+ (4) x 5 = 20.00"));
        assert!(report.contains("Moral and Civic Education(MCiE. 1012): 80 → A- (3.75) x 4 = 15.00"));
        assert!(report.ends_with("🎯 Final GPA: 3.50"));
    }

    #[test]
    fn cgpa_report_rounds_to_two_decimals() {
        let outcome = CgpaOutcome { first: 3.5, second: 3.8 };
        let cgpa = (3.5 * 30.0 + 3.8 * 33.0) / 63.0;
        let report = format_cgpa_report(&outcome, cgpa, 30, 33);
        assert!(report.contains("🎯 Cumulative GPA: 3.66 → B+"));
    }

    #[test]
    fn history_shows_verification_ids_when_present() {
        let records = vec![LogRecord {
            id: 1,
            user_id: 5,
            timestamp: "2025-05-01T10:00:00+00:00".to_string(),
            gpa: "3.75".to_string(),
            kind: LogKind::Gpa,
            verification_id: Some("abc123".to_string()),
            breakdown: vec![],
        }];
        let out = format_history(&records);
        assert!(out.contains("2025-05-01 — GPA 3.75 (ID: abc123)"));
    }

    #[test]
    fn empty_history_prompts_for_gpa() {
        assert!(format_history(&[]).contains("/gpa"));
    }
}
