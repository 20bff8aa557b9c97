//! Telegram bot integration and handlers

pub mod admin;
pub mod bot;
pub mod commands;
pub mod format;
pub mod handlers;

/// The bot type used throughout the crate.
pub type Bot = teloxide::Bot;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::schema::schema;
pub use handlers::types::{HandlerDeps, HandlerError};
