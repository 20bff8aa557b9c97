use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use teloxide::update_listeners::Polling;

use gpabot::cli::{Cli, Commands};
use gpabot::core::web_server::start_web_server;
use gpabot::core::{config, init_logger};
use gpabot::session::SessionStore;
use gpabot::storage::create_pool;
use gpabot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    // Load environment variables from .env if present
    let _ = dotenv();

    match cli.command {
        Some(Commands::Run { webhook }) => {
            log::info!("Running bot (webhook: {})", webhook);
            run_bot(webhook).await
        }
        None => {
            log::info!("No command specified, running bot in polling mode");
            run_bot(false).await
        }
    }
}

/// Run the Telegram bot
async fn run_bot(use_webhook: bool) -> Result<()> {
    log::info!("Starting bot...");

    let bot = create_bot()?;

    let bot_info = bot.get_me().await?;
    let bot_username = bot_info.username.clone();
    let bot_id = bot_info.id;
    log::info!("Bot username: {:?}, Bot ID: {}", bot_username, bot_id);

    setup_bot_commands(&bot).await?;

    // Create database connection pool
    let db_pool = Arc::new(
        create_pool(&config::DATABASE_PATH).map_err(|e| anyhow::anyhow!("Failed to create database pool: {}", e))?,
    );

    // Start the status/verification web server
    {
        let web_port = *config::WEB_PORT;
        let db_pool_web = Arc::clone(&db_pool);
        log::info!("Starting web server on port {}", web_port);
        tokio::spawn(async move {
            if let Err(e) = start_web_server(web_port, db_pool_web).await {
                log::error!("Web server error: {}", e);
            }
        });
    }

    let sessions = Arc::new(SessionStore::new());

    let handler_deps = HandlerDeps::new(Arc::clone(&db_pool), Arc::clone(&sessions), bot_username, bot_id);
    let handler = schema(handler_deps);

    let webhook_url = if use_webhook { config::WEBHOOK_URL.clone() } else { None };

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(DependencyMap::new())
        .enable_ctrlc_handler()
        .build();

    if let Some(url) = webhook_url {
        log::info!("Starting bot in webhook mode at {}", url);
        let addr = ([0, 0, 0, 0], *config::WEBHOOK_PORT).into();
        let listener = webhooks::axum(bot.clone(), webhooks::Options::new(addr, url::Url::parse(&url)?))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to set up webhook listener: {}", e))?;

        dispatcher
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    } else {
        log::info!("Starting bot in long polling mode");
        log::info!("📡 Ready to receive updates!");

        let listener = Polling::builder(bot.clone()).drop_pending_updates().build();
        dispatcher
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    }

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
