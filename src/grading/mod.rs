//! Pure grading logic: grade table, course catalogs, GPA/CGPA arithmetic.
//!
//! Nothing in this module touches Telegram or the database; everything is
//! deterministic and re-derivable from its inputs.

pub mod calculator;
pub mod catalog;
pub mod grade;

pub use calculator::{compute_cgpa, compute_gpa, grade_breakdown, CourseResult};
pub use catalog::{catalog_by_title, Course, CourseCatalog, CATALOGS};
pub use grade::{grade_for_point, grade_for_score, Grade};
