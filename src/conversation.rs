//! The conversation controller.
//!
//! Dispatches free-form text against the session store and returns what the
//! transport layer should do next. All transitions are synchronous; no
//! Telegram or database calls happen here, which is what makes the state
//! machine testable on its own.

use crate::grading::{catalog_by_title, compute_gpa, CourseCatalog};
use crate::session::{ConversationState, SessionStore};

/// A completed GPA calculation, ready for formatting and persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct GpaOutcome {
    pub catalog: &'static CourseCatalog,
    pub scores: Vec<f64>,
    /// Unrounded; presentation rounds to two decimals.
    pub gpa: f64,
}

/// Both semester GPA values of a completed CGPA flow. The cumulative value
/// is computed by the caller with the configured semester credit weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CgpaOutcome {
    pub first: f64,
    pub second: f64,
}

/// What the transport layer should do with an inbound text message.
#[derive(Debug, Clone, PartialEq)]
pub enum TextOutcome {
    /// No session for this chat: say nothing.
    Ignored,
    /// Catalog picked; prompt for the first course.
    CatalogChosen {
        catalog: &'static CourseCatalog,
        first_course: &'static str,
    },
    /// Text in catalog-selection state that names no catalog.
    UnknownCatalog,
    /// Score rejected; re-issue the prompt for the same course.
    InvalidScore { course: &'static str },
    /// Score accepted; prompt for the next course.
    NextCourse { course: &'static str },
    /// All courses scored.
    GpaComplete(GpaOutcome),
    /// Semester GPA rejected; `step` is 0 for the first value, 1 for the second.
    InvalidSemesterGpa { step: u8 },
    /// First semester GPA accepted; prompt for the second.
    NeedSecondGpa,
    /// Both semester GPAs collected.
    CgpaComplete(CgpaOutcome),
    /// Admin broadcast text captured verbatim.
    BroadcastMessage(String),
}

/// Begins the GPA flow: the chat now picks a program/semester.
pub fn start_gpa(sessions: &SessionStore, chat_id: i64) {
    sessions.set(chat_id, ConversationState::ChoosingCatalog);
}

/// Begins the CGPA flow.
pub fn start_cgpa(sessions: &SessionStore, chat_id: i64) {
    sessions.set(chat_id, ConversationState::CollectingCgpa { first: None });
}

/// Arms the broadcast capture state (caller has already checked admin).
pub fn arm_broadcast(sessions: &SessionStore, chat_id: i64) {
    sessions.set(chat_id, ConversationState::AwaitingBroadcast);
}

/// Parses `text` as a finite number within `[min, max]`.
fn parse_in_range(text: &str, min: f64, max: f64) -> Option<f64> {
    let value: f64 = text.trim().parse().ok()?;
    if value.is_finite() && (min..=max).contains(&value) {
        Some(value)
    } else {
        None
    }
}

/// Advances the chat's conversation by one text message.
///
/// Rejected input leaves the state exactly as it was (same index, same
/// scores). Completion removes the session entirely.
pub fn on_text(sessions: &SessionStore, chat_id: i64, text: &str) -> TextOutcome {
    let Some(state) = sessions.take(chat_id) else {
        return TextOutcome::Ignored;
    };

    match state {
        ConversationState::ChoosingCatalog => match catalog_by_title(text.trim()) {
            Some(catalog) => {
                sessions.set(
                    chat_id,
                    ConversationState::CollectingScores {
                        catalog,
                        index: 0,
                        scores: Vec::with_capacity(catalog.courses.len()),
                    },
                );
                TextOutcome::CatalogChosen {
                    catalog,
                    first_course: catalog.courses[0].name,
                }
            }
            None => {
                sessions.set(chat_id, ConversationState::ChoosingCatalog);
                TextOutcome::UnknownCatalog
            }
        },

        ConversationState::CollectingScores {
            catalog,
            index,
            mut scores,
        } => match parse_in_range(text, 0.0, 100.0) {
            None => {
                let course = catalog.courses[index].name;
                sessions.set(chat_id, ConversationState::CollectingScores { catalog, index, scores });
                TextOutcome::InvalidScore { course }
            }
            Some(score) => {
                scores.push(score);
                let index = index + 1;
                if index < catalog.courses.len() {
                    let course = catalog.courses[index].name;
                    sessions.set(chat_id, ConversationState::CollectingScores { catalog, index, scores });
                    TextOutcome::NextCourse { course }
                } else {
                    // Session is gone: later text must not be read as a score.
                    let gpa = compute_gpa(&scores, catalog.courses);
                    TextOutcome::GpaComplete(GpaOutcome { catalog, scores, gpa })
                }
            }
        },

        ConversationState::CollectingCgpa { first } => match parse_in_range(text, 0.0, 4.0) {
            None => {
                let step = u8::from(first.is_some());
                sessions.set(chat_id, ConversationState::CollectingCgpa { first });
                TextOutcome::InvalidSemesterGpa { step }
            }
            Some(value) => match first {
                None => {
                    sessions.set(chat_id, ConversationState::CollectingCgpa { first: Some(value) });
                    TextOutcome::NeedSecondGpa
                }
                Some(first) => TextOutcome::CgpaComplete(CgpaOutcome { first, second: value }),
            },
        },

        ConversationState::AwaitingBroadcast => TextOutcome::BroadcastMessage(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::catalog::YEAR1_SEMESTER2;

    #[test]
    fn text_without_session_is_ignored() {
        let sessions = SessionStore::new();
        assert_eq!(on_text(&sessions, 1, "85"), TextOutcome::Ignored);
    }

    #[test]
    fn invalid_score_keeps_index_and_scores() {
        let sessions = SessionStore::new();
        start_gpa(&sessions, 1);
        on_text(&sessions, 1, YEAR1_SEMESTER2.title);

        for bad in ["abc", "-5", "150", "inf", "NaN"] {
            let outcome = on_text(&sessions, 1, bad);
            assert_eq!(
                outcome,
                TextOutcome::InvalidScore {
                    course: YEAR1_SEMESTER2.courses[0].name
                },
                "input {bad:?} should be rejected with the same prompt"
            );
        }
    }

    #[test]
    fn completing_all_courses_discards_the_session() {
        let sessions = SessionStore::new();
        start_gpa(&sessions, 1);
        on_text(&sessions, 1, YEAR1_SEMESTER2.title);

        let n = YEAR1_SEMESTER2.courses.len();
        for i in 0..n - 1 {
            let outcome = on_text(&sessions, 1, "80");
            assert_eq!(
                outcome,
                TextOutcome::NextCourse {
                    course: YEAR1_SEMESTER2.courses[i + 1].name
                }
            );
        }
        match on_text(&sessions, 1, "80") {
            TextOutcome::GpaComplete(outcome) => {
                assert_eq!(outcome.scores.len(), n);
                assert!((outcome.gpa - 3.75).abs() < 1e-9); // every score is an A-
            }
            other => panic!("expected completion, got {other:?}"),
        }
        assert!(!sessions.contains(1));
        assert_eq!(on_text(&sessions, 1, "99"), TextOutcome::Ignored);
    }

    #[test]
    fn cgpa_flow_collects_exactly_two_values() {
        let sessions = SessionStore::new();
        start_cgpa(&sessions, 1);

        assert_eq!(on_text(&sessions, 1, "4.5"), TextOutcome::InvalidSemesterGpa { step: 0 });
        assert_eq!(on_text(&sessions, 1, "3.5"), TextOutcome::NeedSecondGpa);
        assert_eq!(on_text(&sessions, 1, "nope"), TextOutcome::InvalidSemesterGpa { step: 1 });
        assert_eq!(
            on_text(&sessions, 1, "3.8"),
            TextOutcome::CgpaComplete(CgpaOutcome { first: 3.5, second: 3.8 })
        );
        assert!(!sessions.contains(1));
    }

    #[test]
    fn unknown_catalog_stays_in_selection() {
        let sessions = SessionStore::new();
        start_gpa(&sessions, 1);
        assert_eq!(on_text(&sessions, 1, "Year 9000"), TextOutcome::UnknownCatalog);
        assert!(sessions.contains(1));
    }

    #[test]
    fn broadcast_state_captures_text_verbatim() {
        let sessions = SessionStore::new();
        arm_broadcast(&sessions, 42);
        assert_eq!(
            on_text(&sessions, 42, "hello {{VERSION}}"),
            TextOutcome::BroadcastMessage("hello {{VERSION}}".to_string())
        );
        assert!(!sessions.contains(42));
    }
}
