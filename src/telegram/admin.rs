//! Admin-only features: broadcast, log listing, uptime status, user lookup.
//!
//! The admin identity is the configured `ADMIN_USER_ID`; every handler here
//! checks it first and answers non-admins with a fixed refusal.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use teloxide::prelude::*;

use crate::conversation;
use crate::core::config;
use crate::core::error::AppResult;
use crate::core::uptime;
use crate::session::SessionStore;
use crate::storage::db::{distinct_user_ids, get_user, logs_by_user, recent_logs, DbPool};
use crate::storage::get_connection;
use crate::telegram::Bot;

const NOT_AUTHORIZED: &str = "⛔ You are not authorized to use this command.";

/// Checks if a user is the configured administrator.
pub fn is_admin(user_id: i64) -> bool {
    let admin_id = *config::admin::ADMIN_USER_ID;
    admin_id != 0 && admin_id == user_id
}

/// Expands broadcast macro tokens against the given clock reading.
fn expand_macros_at(text: &str, bot_name: &str, admin_name: &str, now: DateTime<Local>) -> String {
    text.replace("{{VERSION}}", env!("CARGO_PKG_VERSION"))
        .replace("{{DATETIME}}", &now.format("%Y-%m-%d %H:%M").to_string())
        .replace("{{DATE}}", &now.format("%Y-%m-%d").to_string())
        .replace("{{TIME}}", &now.format("%H:%M").to_string())
        .replace("{{BOT_NAME}}", bot_name)
        .replace("{{ADMIN}}", admin_name)
}

/// Expands the broadcast macro tokens: {{VERSION}}, {{DATE}}, {{TIME}},
/// {{DATETIME}}, {{BOT_NAME}}, {{ADMIN}}.
pub fn expand_macros(text: &str, bot_name: &str) -> String {
    expand_macros_at(text, bot_name, &config::admin::ADMIN_NAME, Local::now())
}

/// Delivery tally of one broadcast run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
}

/// Delivers a broadcast sequentially with a fixed inter-send delay.
///
/// Individual failures are swallowed and counted, never retried; the loop
/// always runs to the end of the recipient list. Generic over the send
/// future so the tally is testable without a live transport.
pub async fn deliver_broadcast<F, Fut, E>(recipients: &[i64], delay: Duration, mut send: F) -> BroadcastReport
where
    F: FnMut(i64) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    let mut report = BroadcastReport::default();
    for (i, &recipient) in recipients.iter().enumerate() {
        match send(recipient).await {
            Ok(()) => report.sent += 1,
            Err(e) => {
                log::warn!("Broadcast delivery to {} failed: {}", recipient, e);
                report.failed += 1;
            }
        }
        if i + 1 < recipients.len() {
            tokio::time::sleep(delay).await;
        }
    }
    report
}

/// Handles /broadcast by arming the capture state; the admin's next message
/// is the broadcast text.
pub async fn handle_broadcast_command(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    sessions: &SessionStore,
) -> AppResult<()> {
    if !is_admin(user_id) {
        bot.send_message(chat_id, NOT_AUTHORIZED).await?;
        return Ok(());
    }

    conversation::arm_broadcast(sessions, chat_id.0);
    bot.send_message(
        chat_id,
        "📝 Send the message you want to broadcast.\n\
         Macros: {{VERSION}}, {{DATE}}, {{TIME}}, {{DATETIME}}, {{BOT_NAME}}, {{ADMIN}}",
    )
    .await?;
    Ok(())
}

/// Expands macros, enumerates recipients and delivers the broadcast,
/// then reports the tally back to the admin.
pub async fn run_broadcast(bot: &Bot, db_pool: &Arc<DbPool>, admin_chat: ChatId, text: &str) -> AppResult<()> {
    let bot_name = bot.get_me().await.map(|me| me.full_name()).unwrap_or_default();
    let message = expand_macros(text, &bot_name);

    let conn = get_connection(db_pool)?;
    let recipients = distinct_user_ids(&conn)?;
    drop(conn);

    log::info!("Broadcasting to {} recipients", recipients.len());
    let body = format!("📢 Update:\n{}", message);

    let report = deliver_broadcast(&recipients, config::broadcast::inter_send_delay(), |recipient| {
        let bot = bot.clone();
        let body = body.clone();
        async move {
            bot.send_message(ChatId(recipient), body).await.map(|_| ())
        }
    })
    .await;

    bot.send_message(
        admin_chat,
        format!("✅ Broadcast finished: {} sent, {} failed.", report.sent, report.failed),
    )
    .await?;
    Ok(())
}

/// Handles /logs: recent calculation records across all users.
pub async fn handle_logs_command(bot: &Bot, chat_id: ChatId, user_id: i64, db_pool: &Arc<DbPool>) -> AppResult<()> {
    if !is_admin(user_id) {
        bot.send_message(chat_id, NOT_AUTHORIZED).await?;
        return Ok(());
    }

    let conn = get_connection(db_pool)?;
    let records = recent_logs(&conn, 20)?;

    if records.is_empty() {
        bot.send_message(chat_id, "No calculation logs yet.").await?;
        return Ok(());
    }

    let mut out = String::from("🗂 Recent calculations:\n");
    for record in &records {
        let date = record.timestamp.split('T').next().unwrap_or(&record.timestamp);
        out.push_str(&format!(
            "\n• {} — user {} — {} {}",
            date,
            record.user_id,
            record.kind.as_str(),
            record.gpa
        ));
    }
    bot.send_message(chat_id, out).await?;
    Ok(())
}

/// Handles /status by querying the uptime monitor API.
pub async fn handle_status_command(bot: &Bot, chat_id: ChatId, user_id: i64) -> AppResult<()> {
    if !is_admin(user_id) {
        bot.send_message(chat_id, NOT_AUTHORIZED).await?;
        return Ok(());
    }

    let Some(api_key) = config::uptime::API_KEY.as_deref() else {
        bot.send_message(chat_id, "Uptime monitoring is not configured (UPTIME_API_KEY unset).")
            .await?;
        return Ok(());
    };

    match uptime::fetch_monitors(api_key).await {
        Some(monitors) => {
            bot.send_message(chat_id, uptime::format_status_report(&monitors)).await?;
        }
        None => {
            bot.send_message(chat_id, "😔 Could not reach the uptime monitor right now.")
                .await?;
        }
    }
    Ok(())
}

/// Handles /user <id>: stored profile plus recent calculations for one user.
pub async fn handle_user_command(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    arg: &str,
    db_pool: &Arc<DbPool>,
) -> AppResult<()> {
    if !is_admin(user_id) {
        bot.send_message(chat_id, NOT_AUTHORIZED).await?;
        return Ok(());
    }

    let Ok(target_id) = arg.trim().parse::<i64>() else {
        bot.send_message(chat_id, "Usage: /user <telegram id>").await?;
        return Ok(());
    };

    let conn = get_connection(db_pool)?;
    let Some((profile, last_active)) = get_user(&conn, target_id)? else {
        bot.send_message(chat_id, format!("No user with id {} on record.", target_id))
            .await?;
        return Ok(());
    };

    let records = logs_by_user(&conn, target_id, 5)?;
    let mut out = format!(
        "👤 User {}\nUsername: {}\nName: {} {}\nLast active: {}\nCalculations on record: {}",
        profile.telegram_id,
        profile.username.as_deref().unwrap_or("—"),
        profile.first_name.as_deref().unwrap_or(""),
        profile.last_name.as_deref().unwrap_or(""),
        last_active,
        records.len()
    );
    for record in &records {
        let date = record.timestamp.split('T').next().unwrap_or(&record.timestamp);
        out.push_str(&format!("\n• {} — {} {}", date, record.kind.as_str(), record.gpa));
    }
    bot.send_message(chat_id, out).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn macro_expansion_substitutes_every_token() {
        let now = Local.with_ymd_and_hms(2025, 5, 4, 13, 37, 0).unwrap();
        let out = expand_macros_at(
            "v{{VERSION}} on {{DATE}} at {{TIME}} ({{DATETIME}}) by {{BOT_NAME}}/{{ADMIN}}",
            "GpaBot",
            "Abel",
            now,
        );
        assert_eq!(
            out,
            format!(
                "v{} on 2025-05-04 at 13:37 (2025-05-04 13:37) by GpaBot/Abel",
                env!("CARGO_PKG_VERSION")
            )
        );
    }

    #[test]
    fn text_without_macros_passes_through() {
        let now = Local.with_ymd_and_hms(2025, 5, 4, 13, 37, 0).unwrap();
        assert_eq!(expand_macros_at("plain text", "b", "a", now), "plain text");
    }

    #[tokio::test]
    async fn broadcast_tally_counts_failures() {
        let recipients = [1i64, 2, 3, 4, 5];
        let report = deliver_broadcast(&recipients, Duration::ZERO, |id| async move {
            if id % 2 == 0 {
                Err("boom")
            } else {
                Ok(())
            }
        })
        .await;
        assert_eq!(report, BroadcastReport { sent: 3, failed: 2 });
    }

    #[tokio::test]
    async fn broadcast_of_nobody_sends_nothing() {
        let report = deliver_broadcast(&[], Duration::ZERO, |_| async move { Ok::<(), &str>(()) }).await;
        assert_eq!(report, BroadcastReport { sent: 0, failed: 0 });
    }
}
