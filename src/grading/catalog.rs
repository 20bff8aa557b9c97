//! Static course catalogs.
//!
//! One ordered list of (name, credit) per program/semester variant. The
//! ordering is significant: it defines the sequence of score prompts. Course
//! names and credits follow the institution's published curriculum verbatim,
//! spelling included.

/// A single course with its credit weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Course {
    pub name: &'static str,
    pub credit: u32,
}

/// An ordered, non-empty course list for one program/semester.
#[derive(Debug, PartialEq, Eq)]
pub struct CourseCatalog {
    /// Human-facing title, also used as the keyboard button label.
    pub title: &'static str,
    pub courses: &'static [Course],
}

impl CourseCatalog {
    /// Sum of credit weights; the GPA denominator. Always > 0 because
    /// catalogs are statically non-empty.
    pub fn total_credits(&self) -> u32 {
        self.courses.iter().map(|c| c.credit).sum()
    }
}

const fn course(name: &'static str, credit: u32) -> Course {
    Course { name, credit }
}

/// Year 1, Semester 2 (common freshman curriculum).
pub static YEAR1_SEMESTER2: CourseCatalog = CourseCatalog {
    title: "Year 1 • Semester 2",
    courses: &[
        course("Applied Mathematics I(Math. 1041)", 5),
        course("Communicative English Language Skills II(FLEn. 1012)", 5),
        course("Moral and Civic Education(MCiE. 1012)", 4),
        course("Enterprenuership(Mgmt. 1012)", 5),
        course("Social Anthropology(Anth. 1012)", 4),
        course("Introduction to Emerging Technologies(EmTe.1012)", 5),
        course("Computer Programing(ECEg 2052) C++", 5),
    ],
};

/// Pre-engineering stream.
pub static PRE_ENGINEERING: CourseCatalog = CourseCatalog {
    title: "Pre-Engineering",
    courses: &[
        course("Applied Mathematics II(Math. 1042)", 5),
        course("General Physics(Phys. 1011)", 4),
        course("General Chemistry(Chem. 1012)", 4),
        course("Communicative English Language Skills II(FLEn. 1012)", 5),
        course("Logic and Critical Thinking(LoCT. 1011)", 4),
        course("Introduction to Emerging Technologies(EmTe. 1012)", 5),
        course("Engineering Drawing(MEng. 1012)", 5),
    ],
};

/// Other natural science stream.
pub static OTHER_NATURAL_SCIENCE: CourseCatalog = CourseCatalog {
    title: "Other Natural Science",
    courses: &[
        course("Applied Mathematics I(Math. 1041)", 5),
        course("General Psychology(Psch. 1011)", 4),
        course("Geography of Ethiopia and the Horn(GeES. 1011)", 4),
        course("Logic and Critical Thinking(LoCT. 1011)", 4),
        course("General Biology(Biol. 1012)", 4),
        course("Global Trends(GlTr. 1012)", 2),
    ],
};

/// All selectable catalogs, in menu order.
pub static CATALOGS: &[&CourseCatalog] = &[&YEAR1_SEMESTER2, &PRE_ENGINEERING, &OTHER_NATURAL_SCIENCE];

/// Resolves a keyboard button label back to its catalog.
pub fn catalog_by_title(title: &str) -> Option<&'static CourseCatalog> {
    CATALOGS.iter().find(|c| c.title == title).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_are_non_empty_with_positive_credits() {
        for catalog in CATALOGS {
            assert!(!catalog.courses.is_empty(), "{} is empty", catalog.title);
            assert!(catalog.total_credits() > 0);
            for c in catalog.courses {
                assert!(c.credit > 0, "{} has a zero-credit course", catalog.title);
            }
        }
    }

    #[test]
    fn titles_resolve_round_trip() {
        for catalog in CATALOGS {
            assert_eq!(catalog_by_title(catalog.title), Some(*catalog));
        }
        assert_eq!(catalog_by_title("Year 9000"), None);
    }
}
