//! Handler types and shared dependencies

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::Message;

use crate::session::SessionStore;
use crate::storage::db::DbPool;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub db_pool: Arc<DbPool>,
    pub sessions: Arc<SessionStore>,
    pub bot_username: Option<String>,
    pub bot_id: UserId,
}

impl HandlerDeps {
    pub fn new(db_pool: Arc<DbPool>, sessions: Arc<SessionStore>, bot_username: Option<String>, bot_id: UserId) -> Self {
        Self {
            db_pool,
            sessions,
            bot_username,
            bot_id,
        }
    }
}

/// Whether a plain-text message should be processed by this bot.
///
/// Private chats always qualify. In groups, only messages that mention
/// the bot by @username or reply to one of its messages do.
pub fn is_message_addressed_to_bot(msg: &Message, bot_username: Option<&str>, bot_id: UserId) -> bool {
    if msg.chat.is_private() {
        return true;
    }

    if let (Some(text), Some(username)) = (msg.text(), bot_username) {
        if text.contains(&format!("@{}", username)) {
            return true;
        }
    }

    msg.reply_to_message()
        .and_then(|reply| reply.from.as_ref())
        .map(|from| from.id == bot_id)
        .unwrap_or(false)
}
