//! Telegram bot handler tree configuration
//!
//! The dispatcher schema is built here in a testable way: integration
//! tests can assemble the same handler tree as production code.

pub mod schema;
pub mod types;

pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
