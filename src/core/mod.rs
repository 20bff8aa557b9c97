//! Ambient infrastructure: configuration, errors, logging, HTTP surfaces.

pub mod config;
pub mod error;
pub mod logging;
pub mod uptime;
pub mod web_server;

pub use error::{AppError, AppResult};
pub use logging::init_logger;
