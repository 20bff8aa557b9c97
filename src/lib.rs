//! GpaBot - Telegram bot for GPA and CGPA calculation
//!
//! This library provides all the functionality for the bot: the grading
//! tables and catalogs, the conversational calculation flows, persistence
//! of calculation logs with verification IDs, and the admin surface.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, uptime client, web server
//! - `grading`: Grade table, course catalogs, GPA/CGPA arithmetic
//! - `session`: Per-chat conversation state store
//! - `conversation`: The text-driven calculation state machine
//! - `storage`: SQLite persistence for users and calculation logs
//! - `telegram`: Bot integration and handlers

pub mod cli;
pub mod conversation;
pub mod core;
pub mod grading;
pub mod session;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult};
pub use storage::{create_pool, get_connection, DbConnection, DbPool};
pub use telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};
