//! Weighted GPA/CGPA arithmetic.

use super::catalog::Course;
use super::grade::{grade_for_score, Grade};

/// One graded course: the input score paired with its derived grade and
/// credit-weighted contribution.
#[derive(Debug, Clone, Copy)]
pub struct CourseResult {
    pub course: Course,
    pub score: f64,
    pub grade: Grade,
    pub weighted: f64,
}

/// Pairs each score with its course and derives the grade row.
///
/// Scores are positional: `scores[i]` belongs to `courses[i]`. The
/// conversation controller guarantees equal lengths at completion.
pub fn grade_breakdown(scores: &[f64], courses: &[Course]) -> Vec<CourseResult> {
    debug_assert_eq!(scores.len(), courses.len());
    scores
        .iter()
        .zip(courses.iter())
        .map(|(&score, &course)| {
            let grade = grade_for_score(score);
            CourseResult {
                course,
                score,
                grade,
                weighted: grade.point * f64::from(course.credit),
            }
        })
        .collect()
}

/// `Σ(point_i * credit_i) / Σ(credit_i)`, single pass, unrounded.
///
/// Rounding to two decimals happens at presentation only.
pub fn compute_gpa(scores: &[f64], courses: &[Course]) -> f64 {
    let mut total = 0.0;
    let mut credits = 0u32;
    for row in grade_breakdown(scores, courses) {
        total += row.weighted;
        credits += row.course.credit;
    }
    total / f64::from(credits)
}

/// Credit-weighted cumulative GPA over two semesters, unrounded.
///
/// Semester credit weights come from configuration (see `core::config::cgpa`).
pub fn compute_cgpa(gpa1: f64, gpa2: f64, credits1: u32, credits2: u32) -> f64 {
    (gpa1 * f64::from(credits1) + gpa2 * f64::from(credits2)) / f64::from(credits1 + credits2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::catalog::PRE_ENGINEERING;

    #[test]
    fn gpa_matches_hand_computed_weighted_average() {
        let courses = PRE_ENGINEERING.courses;
        let scores = [95.0, 88.0, 80.0, 75.0, 70.0, 65.0, 92.0];

        let mut expected_total = 0.0;
        let mut expected_credits = 0.0;
        for (s, c) in scores.iter().zip(courses.iter()) {
            expected_total += grade_for_score(*s).point * f64::from(c.credit);
            expected_credits += f64::from(c.credit);
        }

        let gpa = compute_gpa(&scores, courses);
        assert!((gpa - expected_total / expected_credits).abs() < 1e-9);
    }

    #[test]
    fn breakdown_rows_are_positional() {
        let courses = PRE_ENGINEERING.courses;
        let scores = [95.0, 88.0, 80.0, 75.0, 70.0, 65.0, 92.0];
        let rows = grade_breakdown(&scores, courses);

        let letters: Vec<&str> = rows.iter().map(|r| r.grade.letter).collect();
        assert_eq!(letters, ["A+", "A", "A-", "B+", "B", "B-", "A+"]);
        for (row, course) in rows.iter().zip(courses.iter()) {
            assert_eq!(row.course.name, course.name);
            assert!((row.weighted - row.grade.point * f64::from(course.credit)).abs() < 1e-9);
        }
    }

    #[test]
    fn cgpa_is_the_weighted_mean_of_two_semesters() {
        let cgpa = compute_cgpa(3.5, 3.8, 30, 33);
        let expected = (3.5 * 30.0 + 3.8 * 33.0) / 63.0;
        assert!((cgpa - expected).abs() < 1e-9);
    }

    #[test]
    fn equal_weights_give_the_plain_mean() {
        let cgpa = compute_cgpa(2.0, 4.0, 30, 30);
        assert!((cgpa - 3.0).abs() < 1e-9);
    }
}
