//! Per-chat conversation state.
//!
//! One tagged union of states per chat, kept in a concurrent map keyed by
//! chat id. Handlers take the state out, transition it synchronously, and
//! re-insert it only while a flow is still in progress. Completed or
//! cancelled flows leave no entry behind, so stray text after completion is
//! ignored rather than parsed as a score.

use dashmap::DashMap;

use crate::grading::CourseCatalog;

/// Where a chat currently is in the conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationState {
    /// GPA flow started, waiting for a program/semester selection.
    ChoosingCatalog,
    /// Walking a course list; `scores[i]` belongs to `catalog.courses[i]`.
    CollectingScores {
        catalog: &'static CourseCatalog,
        index: usize,
        scores: Vec<f64>,
    },
    /// CGPA flow: collecting two semester GPA values.
    CollectingCgpa { first: Option<f64> },
    /// Admin armed /broadcast; the next message is the broadcast text.
    AwaitingBroadcast,
}

/// Process-wide session map, chat id → conversation state.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: DashMap<i64, ConversationState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever state the chat had.
    pub fn set(&self, chat_id: i64, state: ConversationState) {
        self.inner.insert(chat_id, state);
    }

    /// Removes and returns the chat's state, if any.
    pub fn take(&self, chat_id: i64) -> Option<ConversationState> {
        self.inner.remove(&chat_id).map(|(_, state)| state)
    }

    /// Discards the chat's state. Returns true if there was one.
    pub fn clear(&self, chat_id: i64) -> bool {
        self.inner.remove(&chat_id).is_some()
    }

    pub fn contains(&self, chat_id: i64) -> bool {
        self.inner.contains_key(&chat_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_removes_the_entry() {
        let store = SessionStore::new();
        store.set(7, ConversationState::ChoosingCatalog);
        assert!(store.contains(7));
        assert_eq!(store.take(7), Some(ConversationState::ChoosingCatalog));
        assert!(!store.contains(7));
        assert_eq!(store.take(7), None);
    }

    #[test]
    fn states_are_per_chat() {
        let store = SessionStore::new();
        store.set(1, ConversationState::ChoosingCatalog);
        store.set(2, ConversationState::CollectingCgpa { first: None });
        assert!(store.clear(1));
        assert!(store.contains(2));
    }
}
