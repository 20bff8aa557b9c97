//! Letter grade lookup tables.

/// A letter grade and its grade point value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grade {
    pub letter: &'static str,
    pub point: f64,
}

impl Grade {
    const fn new(letter: &'static str, point: f64) -> Self {
        Self { letter, point }
    }
}

/// Maps a 0–100 score to a letter grade by descending threshold.
///
/// Total over the real line: anything below 30 (including NaN, which fails
/// every comparison) falls through to F. Callers validate the [0,100] range
/// before scores reach the session; this table itself never rejects.
pub fn grade_for_score(score: f64) -> Grade {
    if score > 90.0 {
        Grade::new("A+", 4.0)
    } else if score >= 85.0 {
        Grade::new("A", 4.0)
    } else if score >= 80.0 {
        Grade::new("A-", 3.75)
    } else if score >= 75.0 {
        Grade::new("B+", 3.5)
    } else if score >= 70.0 {
        Grade::new("B", 3.0)
    } else if score >= 65.0 {
        Grade::new("B-", 2.75)
    } else if score >= 60.0 {
        Grade::new("C+", 2.5)
    } else if score >= 50.0 {
        Grade::new("C", 2.0)
    } else if score >= 45.0 {
        Grade::new("C-", 1.75)
    } else if score >= 40.0 {
        Grade::new("D", 1.0)
    } else if score >= 30.0 {
        Grade::new("FX", 0.0)
    } else {
        Grade::new("F", 0.0)
    }
}

/// Maps a 0–4 grade point value to a letter, used for CGPA results.
pub fn grade_for_point(point: f64) -> Grade {
    if point >= 4.0 {
        Grade::new("A", 4.0)
    } else if point >= 3.75 {
        Grade::new("A-", 3.75)
    } else if point >= 3.5 {
        Grade::new("B+", 3.5)
    } else if point >= 3.0 {
        Grade::new("B", 3.0)
    } else if point >= 2.75 {
        Grade::new("B-", 2.75)
    } else if point >= 2.5 {
        Grade::new("C+", 2.5)
    } else if point >= 2.0 {
        Grade::new("C", 2.0)
    } else if point >= 1.75 {
        Grade::new("C-", 1.75)
    } else if point >= 1.0 {
        Grade::new("D", 1.0)
    } else if point >= 0.0 {
        Grade::new("FX", 0.0)
    } else {
        Grade::new("F", 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_values_resolve_to_documented_bucket() {
        // Exactly 90 is A, not A+ (the top bucket is strictly > 90)
        assert_eq!(grade_for_score(90.0).letter, "A");
        assert_eq!(grade_for_score(90.01).letter, "A+");
        assert_eq!(grade_for_score(85.0).letter, "A");
        assert_eq!(grade_for_score(84.99).letter, "A-");
        assert_eq!(grade_for_score(45.0).letter, "C-");
        assert_eq!(grade_for_score(44.99).letter, "D");
        assert_eq!(grade_for_score(30.0).letter, "FX");
        assert_eq!(grade_for_score(29.99).letter, "F");
    }

    #[test]
    fn ladder_points_match_letters() {
        assert_eq!(grade_for_score(95.0), Grade::new("A+", 4.0));
        assert_eq!(grade_for_score(82.0), Grade::new("A-", 3.75));
        assert_eq!(grade_for_score(77.0), Grade::new("B+", 3.5));
        assert_eq!(grade_for_score(71.0), Grade::new("B", 3.0));
        assert_eq!(grade_for_score(66.0), Grade::new("B-", 2.75));
        assert_eq!(grade_for_score(61.0), Grade::new("C+", 2.5));
        assert_eq!(grade_for_score(55.0), Grade::new("C", 2.0));
        assert_eq!(grade_for_score(42.0), Grade::new("D", 1.0));
    }

    #[test]
    fn total_over_the_real_line() {
        assert_eq!(grade_for_score(f64::NAN).letter, "F");
        assert_eq!(grade_for_score(-10.0).letter, "F");
        assert_eq!(grade_for_score(1000.0).letter, "A+");
    }

    #[test]
    fn point_ladder() {
        assert_eq!(grade_for_point(4.0).letter, "A");
        assert_eq!(grade_for_point(3.8).letter, "A-");
        assert_eq!(grade_for_point(3.66).letter, "B+");
        assert_eq!(grade_for_point(0.5).letter, "FX");
        assert_eq!(grade_for_point(-0.1).letter, "F");
    }
}
