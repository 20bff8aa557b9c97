//! Bot initialization and command definitions.

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;
use crate::telegram::Bot;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "What I can do:")]
pub enum Command {
    #[command(description = "show the main menu")]
    Start,
    #[command(description = "calculate your semester GPA")]
    Gpa,
    #[command(description = "calculate your cumulative GPA over two semesters")]
    Cgpa,
    #[command(description = "cancel the current calculation")]
    Cancel,
    #[command(description = "show your recent calculations")]
    History,
    #[command(description = "verify a calculation by its verification ID")]
    Verify(String),
    #[command(description = "recent calculation logs (admin only)")]
    Logs,
    #[command(description = "uptime monitor status (admin only)")]
    Status,
    #[command(description = "broadcast a message to all users (admin only)")]
    Broadcast,
    #[command(description = "look up a user by id (admin only)")]
    User(String),
}

/// Creates a Bot instance with a request timeout.
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Missing token or HTTP client build failure
pub fn create_bot() -> anyhow::Result<Bot> {
    let token = config::BOT_TOKEN.clone();
    if token.is_empty() {
        anyhow::bail!("BOT_TOKEN environment variable not set");
    }

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    Ok(Bot::with_client(token, client))
}

/// Sets up bot commands in Telegram UI
///
/// Admin-only commands are registered too; non-admins invoking them get a
/// fixed "not authorized" reply rather than silence.
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    use teloxide::types::BotCommand;

    bot.set_my_commands(vec![
        BotCommand::new("start", "show the main menu"),
        BotCommand::new("gpa", "calculate your semester GPA"),
        BotCommand::new("cgpa", "calculate your cumulative GPA"),
        BotCommand::new("cancel", "cancel the current calculation"),
        BotCommand::new("history", "show your recent calculations"),
        BotCommand::new("verify", "verify a calculation by its ID"),
    ])
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_descriptions_include_the_menu() {
        let commands = Command::descriptions();
        let command_list = format!("{}", commands);

        assert!(command_list.contains("What I can do"));
        assert!(command_list.contains("start"));
        assert!(command_list.contains("gpa"));
        assert!(command_list.contains("history"));
    }
}
