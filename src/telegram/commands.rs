//! User-facing command and text handlers.

use indoc::indoc;
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, Message};

use crate::conversation::{self, CgpaOutcome, GpaOutcome, TextOutcome};
use crate::core::config;
use crate::core::error::AppResult;
use crate::grading::{compute_cgpa, CATALOGS};
use crate::storage::db::{
    append_log, log_by_verification_id, logs_by_user, new_verification_id, upsert_user, LogKind, NewLogRecord,
    UserProfile,
};
use crate::storage::get_connection;
use crate::telegram::format::{
    cgpa_breakdown_rows, format_cgpa_report, format_gpa_report, format_history, format_verification,
    gpa_breakdown_rows,
};
use crate::telegram::handlers::types::HandlerDeps;
use crate::telegram::Bot;

/// Keyboard button labels; also accepted as plain text.
pub const BTN_GPA: &str = "🎓 Calculate GPA";
pub const BTN_CGPA: &str = "📈 Calculate CGPA";

/// Generic failure reply. Any handler error that reaches the dispatcher
/// endpoint is reported to the requester with this text.
pub const APOLOGY: &str = "😔 Sorry, something went wrong on our side. Please try again.";

/// Main menu reply keyboard.
fn main_menu_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(BTN_GPA)],
        vec![KeyboardButton::new(BTN_CGPA)],
    ])
    .resize_keyboard()
}

/// One button per course catalog.
fn catalog_keyboard() -> KeyboardMarkup {
    let rows = CATALOGS
        .iter()
        .map(|catalog| vec![KeyboardButton::new(catalog.title)])
        .collect::<Vec<_>>();
    KeyboardMarkup::new(rows).resize_keyboard().one_time_keyboard()
}

/// Records the sender's profile and activity. Persistence failures are
/// logged and ignored; the conversation must not stall on them.
fn touch_user(deps: &HandlerDeps, msg: &Message) {
    let Some(from) = msg.from.as_ref() else { return };
    let profile = UserProfile {
        telegram_id: msg.chat.id.0,
        username: from.username.clone(),
        first_name: Some(from.first_name.clone()),
        last_name: from.last_name.clone(),
    };
    match get_connection(&deps.db_pool) {
        Ok(conn) => {
            if let Err(e) = upsert_user(&conn, &profile) {
                log::error!("Failed to upsert user {}: {}", profile.telegram_id, e);
            }
        }
        Err(e) => log::error!("No database connection for user upsert: {}", e),
    }
}

/// Handles /start: welcome text, menu keyboard, fresh session slate.
pub async fn handle_start_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    touch_user(deps, msg);
    deps.sessions.clear(msg.chat.id.0);

    let welcome = indoc! {"
        📘 Welcome to the GPA Calculator!

        I can walk you through your course scores and compute your
        semester GPA, or combine two semester GPAs into a CGPA.

        Pick an option below, or use /gpa and /cgpa directly.
    "};
    bot.send_message(msg.chat.id, welcome)
        .reply_markup(main_menu_keyboard())
        .await?;
    Ok(())
}

/// Handles /gpa by starting catalog selection.
pub async fn handle_gpa_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    touch_user(deps, msg);
    conversation::start_gpa(&deps.sessions, msg.chat.id.0);
    bot.send_message(msg.chat.id, "🧭 Choose your program/semester:")
        .reply_markup(catalog_keyboard())
        .await?;
    Ok(())
}

/// Handles /cgpa by starting the two-semester flow.
pub async fn handle_cgpa_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    touch_user(deps, msg);
    conversation::start_cgpa(&deps.sessions, msg.chat.id.0);
    bot.send_message(msg.chat.id, "Enter your Semester 1 GPA (0.0–4.0):").await?;
    Ok(())
}

/// Handles /cancel, discarding any in-progress session.
pub async fn handle_cancel_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    let had_session = deps.sessions.clear(msg.chat.id.0);
    let reply = if had_session {
        "Calculation cancelled."
    } else {
        "Nothing to cancel."
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Handles /history with the sender's recent calculations.
pub async fn handle_history_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    touch_user(deps, msg);
    let conn = get_connection(&deps.db_pool)?;
    let records = logs_by_user(&conn, msg.chat.id.0, 10)?;
    bot.send_message(msg.chat.id, format_history(&records)).await?;
    Ok(())
}

/// Handles /verify <id>, looking up a calculation by verification token.
pub async fn handle_verify_command(bot: &Bot, msg: &Message, deps: &HandlerDeps, id: &str) -> AppResult<()> {
    let id = id.trim();
    if id.is_empty() {
        bot.send_message(msg.chat.id, "Usage: /verify <verification id>").await?;
        return Ok(());
    }

    let conn = get_connection(&deps.db_pool)?;
    match log_by_verification_id(&conn, id)? {
        Some(record) => {
            bot.send_message(msg.chat.id, format_verification(&record)).await?;
        }
        None => {
            bot.send_message(msg.chat.id, "❌ No record found for that verification ID.")
                .await?;
        }
    }
    Ok(())
}

/// Persists a completed GPA calculation and replies with the report.
async fn finish_gpa(bot: &Bot, chat_id: ChatId, deps: &HandlerDeps, outcome: &GpaOutcome) -> AppResult<()> {
    let verification_id = new_verification_id();
    let record = NewLogRecord {
        user_id: chat_id.0,
        gpa: format!("{:.2}", outcome.gpa),
        kind: LogKind::Gpa,
        verification_id: verification_id.clone(),
        breakdown: gpa_breakdown_rows(outcome),
    };

    let conn = get_connection(&deps.db_pool)?;
    append_log(&conn, &record)?;

    let report = format!("{}\n🔑 Verification ID: {}", format_gpa_report(outcome), verification_id);
    bot.send_message(chat_id, report).await?;
    Ok(())
}

/// Persists a completed CGPA calculation and replies with the report.
async fn finish_cgpa(bot: &Bot, chat_id: ChatId, deps: &HandlerDeps, outcome: &CgpaOutcome) -> AppResult<()> {
    let credits1 = *config::cgpa::SEMESTER1_CREDITS;
    let credits2 = *config::cgpa::SEMESTER2_CREDITS;
    let cgpa = compute_cgpa(outcome.first, outcome.second, credits1, credits2);

    let verification_id = new_verification_id();
    let record = NewLogRecord {
        user_id: chat_id.0,
        gpa: format!("{:.2}", cgpa),
        kind: LogKind::Cgpa,
        verification_id: verification_id.clone(),
        breakdown: cgpa_breakdown_rows(outcome, credits1, credits2),
    };

    let conn = get_connection(&deps.db_pool)?;
    append_log(&conn, &record)?;

    let report = format!(
        "{}\n🔑 Verification ID: {}",
        format_cgpa_report(outcome, cgpa, credits1, credits2),
        verification_id
    );
    bot.send_message(chat_id, report).await?;
    Ok(())
}

/// Routes free-form text: menu buttons first, then the conversation
/// controller. Text with no session is silently ignored.
pub async fn handle_text_message(bot: &Bot, msg: &Message, deps: &HandlerDeps, text: &str) -> AppResult<()> {
    match text {
        BTN_GPA => return handle_gpa_command(bot, msg, deps).await,
        BTN_CGPA => return handle_cgpa_command(bot, msg, deps).await,
        _ => {}
    }

    let chat_id = msg.chat.id;
    match conversation::on_text(&deps.sessions, chat_id.0, text) {
        TextOutcome::Ignored => {}
        TextOutcome::CatalogChosen { first_course, .. } => {
            touch_user(deps, msg);
            bot.send_message(chat_id, format!("📌 Enter score for: {}", first_course))
                .await?;
        }
        TextOutcome::UnknownCatalog => {
            bot.send_message(chat_id, "Please pick a program from the keyboard:")
                .reply_markup(catalog_keyboard())
                .await?;
        }
        TextOutcome::InvalidScore { course } => {
            bot.send_message(
                chat_id,
                format!("❌ Enter a valid score (0–100)\n📌 Enter score for: {}", course),
            )
            .await?;
        }
        TextOutcome::NextCourse { course } => {
            bot.send_message(chat_id, format!("Next: {}", course)).await?;
        }
        TextOutcome::GpaComplete(outcome) => {
            // Session is already gone; a persistence failure below must
            // still leave the user with an answer, not a stuck state.
            if let Err(e) = finish_gpa(bot, chat_id, deps, &outcome).await {
                log::error!("Failed to finish GPA calculation for {}: {}", chat_id, e);
                bot.send_message(chat_id, APOLOGY).await?;
            }
        }
        TextOutcome::InvalidSemesterGpa { step } => {
            let which = if step == 0 { "Semester 1" } else { "Semester 2" };
            bot.send_message(chat_id, format!("❌ Enter a valid GPA (0.0–4.0) for {}:", which))
                .await?;
        }
        TextOutcome::NeedSecondGpa => {
            bot.send_message(chat_id, "Enter your Semester 2 GPA (0.0–4.0):").await?;
        }
        TextOutcome::CgpaComplete(outcome) => {
            if let Err(e) = finish_cgpa(bot, chat_id, deps, &outcome).await {
                log::error!("Failed to finish CGPA calculation for {}: {}", chat_id, e);
                bot.send_message(chat_id, APOLOGY).await?;
            }
        }
        TextOutcome::BroadcastMessage(message) => {
            let user_id = msg.from.as_ref().map(|u| i64::try_from(u.id.0).unwrap_or(0)).unwrap_or(0);
            if crate::telegram::admin::is_admin(user_id) {
                if let Err(e) = crate::telegram::admin::run_broadcast(bot, &deps.db_pool, chat_id, &message).await {
                    log::error!("Broadcast failed: {}", e);
                    bot.send_message(chat_id, APOLOGY).await?;
                }
            }
        }
    }
    Ok(())
}
