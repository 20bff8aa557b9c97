//! Configuration constants for the bot
//!
//! Everything is read once at startup from the environment (a `.env` file is
//! loaded in `main`). Values are cached in `Lazy` statics and read-only for
//! the life of the process.

use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Path to the SQLite database file
/// Read from DATABASE_PATH environment variable
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "gpabot.sqlite".to_string()));

/// Path to the log file
/// Read from LOG_FILE_PATH environment variable
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "gpabot.log".to_string()));

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_default()
});

/// Public webhook URL (e.g. https://bot.example.com/webhook)
/// When unset the bot runs in long-polling mode regardless of --webhook
pub static WEBHOOK_URL: Lazy<Option<String>> = Lazy::new(|| env::var("WEBHOOK_URL").ok());

/// Port the webhook listener binds to
pub static WEBHOOK_PORT: Lazy<u16> = Lazy::new(|| {
    env::var("WEBHOOK_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8443)
});

/// Port for the public web server (/health, /logs, /api/verify)
pub static WEB_PORT: Lazy<u16> = Lazy::new(|| {
    env::var("WEB_PORT").ok().and_then(|s| s.parse().ok()).unwrap_or(3000)
});

/// Admin configuration
pub mod admin {
    use super::{env, Lazy};

    /// Telegram user id of the bot administrator. 0 disables admin features.
    pub static ADMIN_USER_ID: Lazy<i64> = Lazy::new(|| {
        env::var("ADMIN_USER_ID")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    });

    /// Display name substituted for the {{ADMIN}} broadcast macro
    pub static ADMIN_NAME: Lazy<String> =
        Lazy::new(|| env::var("ADMIN_NAME").unwrap_or_else(|_| "the admin".to_string()));
}

/// Broadcast configuration
pub mod broadcast {
    use super::Duration;

    /// Delay between consecutive sends. Rate limiting, not correctness:
    /// Telegram allows ~30 messages/second to distinct chats.
    pub const INTER_SEND_DELAY_MS: u64 = 300;

    pub fn inter_send_delay() -> Duration {
        Duration::from_millis(INTER_SEND_DELAY_MS)
    }
}

/// CGPA semester credit weights
///
/// The 30/33 defaults come from one institution's curriculum.
pub mod cgpa {
    use super::{env, Lazy};

    pub static SEMESTER1_CREDITS: Lazy<u32> = Lazy::new(|| {
        env::var("CGPA_SEMESTER1_CREDITS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30)
    });

    pub static SEMESTER2_CREDITS: Lazy<u32> = Lazy::new(|| {
        env::var("CGPA_SEMESTER2_CREDITS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(33)
    });
}

/// Uptime monitor configuration
pub mod uptime {
    use super::{env, Lazy};

    /// API key for the uptime monitor. Unset disables /status.
    pub static API_KEY: Lazy<Option<String>> = Lazy::new(|| env::var("UPTIME_API_KEY").ok());
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Telegram API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}
