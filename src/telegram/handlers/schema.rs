//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{is_message_addressed_to_bot, HandlerDeps, HandlerError};
use crate::telegram::bot::Command;
use crate::telegram::{admin, commands};
use crate::telegram::Bot;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// This function returns a handler tree that can be used with teloxide's
/// Dispatcher. The same schema is used in production and in integration
/// tests.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_messages = deps;

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(message_handler(deps_messages))
}

/// Handler for bot commands (/start, /gpa, /cgpa, etc.)
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);
                let user_id = msg.from.as_ref().and_then(|u| i64::try_from(u.id.0).ok()).unwrap_or(0);

                let result = match cmd {
                    Command::Start => commands::handle_start_command(&bot, &msg, &deps).await,
                    Command::Gpa => commands::handle_gpa_command(&bot, &msg, &deps).await,
                    Command::Cgpa => commands::handle_cgpa_command(&bot, &msg, &deps).await,
                    Command::Cancel => commands::handle_cancel_command(&bot, &msg, &deps).await,
                    Command::History => commands::handle_history_command(&bot, &msg, &deps).await,
                    Command::Verify(id) => commands::handle_verify_command(&bot, &msg, &deps, &id).await,
                    Command::Logs => admin::handle_logs_command(&bot, msg.chat.id, user_id, &deps.db_pool).await,
                    Command::Status => admin::handle_status_command(&bot, msg.chat.id, user_id).await,
                    Command::Broadcast => {
                        admin::handle_broadcast_command(&bot, msg.chat.id, user_id, &deps.sessions).await
                    }
                    Command::User(arg) => {
                        admin::handle_user_command(&bot, msg.chat.id, user_id, &arg, &deps.db_pool).await
                    }
                };

                // The requester always hears back, even when storage or a
                // downstream call failed mid-handler.
                if let Err(e) = result {
                    log::error!("Command handler failed for chat {}: {}", msg.chat.id, e);
                    let _ = bot.send_message(msg.chat.id, commands::APOLOGY).await;
                }
                Ok(())
            }
        },
    ))
}

/// Handler for regular text messages (keyboard buttons, scores, GPAs)
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let bot_username = deps.bot_username.clone();
    let bot_id = deps.bot_id;

    Update::filter_message()
        .filter(move |msg: Message| {
            msg.text().is_some() && is_message_addressed_to_bot(&msg, bot_username.as_deref(), bot_id)
        })
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let text = msg.text().unwrap_or_default().to_string();
                if let Err(e) = commands::handle_text_message(&bot, &msg, &deps, &text).await {
                    log::error!("Error handling message from {}: {}", msg.chat.id, e);
                    let _ = bot.send_message(msg.chat.id, commands::APOLOGY).await;
                }
                Ok(())
            }
        })
}
