//! Binary entry point: loads config, wires stores, LLM client, handler
//! chain, and runs the Telegram polling loop.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::RwLock;
use tracing::{error, info};

use alter_bot::handlers::{AmbientHandler, CommandHandler, ReplyHandler};
use alter_bot::reply::ReplyCoordinator;
use alter_bot::talkative::TalkativeResponder;
use alter_bot::telegram::{run_polling, BotIdentity, TelegramBotAdapter};
use alter_bot::{BotConfig, Cli, Commands};
use bot_core::{init_tracing, Bot, HandlerChain};
use chat_memory::{MemoryRepository, MemoryStore, SessionStore, SESSION_CAPACITY};
use llm_client::{ChatClient, OpenAiChatClient};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { token } => run(token).await,
    }
}

async fn build_memory_store(config: &BotConfig) -> MemoryStore {
    match &config.memory_database_path {
        Some(path) => match MemoryRepository::new(path).await {
            Ok(repository) => MemoryStore::with_repository(config.memory_max_count, repository),
            Err(e) => {
                error!(error = %e, path = %path, "failed to open memory database; continuing memory-only");
                MemoryStore::new(config.memory_max_count)
            }
        },
        None => MemoryStore::new(config.memory_max_count),
    }
}

async fn run(token: Option<String>) -> Result<()> {
    let config = BotConfig::load(token)?;
    init_tracing(&config.log_file)?;
    info!(model = %config.model, max_steps = config.max_steps, "starting Alter Ego");

    let sessions = Arc::new(SessionStore::new(SESSION_CAPACITY));
    let memory = Arc::new(build_memory_store(&config).await);
    {
        // Eager, non-blocking startup load; turns may start before it lands.
        let memory = memory.clone();
        tokio::spawn(async move { memory.load_from_database().await });
    }

    let llm: Arc<dyn ChatClient> = Arc::new(OpenAiChatClient::new(
        config.api_key.clone(),
        config.base_url.clone(),
        config.model.clone(),
        config.max_steps,
    ));

    let mut bot = teloxide::Bot::new(config.bot_token.clone());
    if let Some(url) = &config.telegram_api_url {
        bot = bot.set_api_url(url.parse()?);
    }
    let adapter: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(bot.clone()));
    let identity = Arc::new(RwLock::new(BotIdentity::default()));

    let coordinator = Arc::new(ReplyCoordinator::new(
        adapter.clone(),
        llm,
        sessions.clone(),
        memory.clone(),
    ));
    let talkative = config
        .talkative_enabled
        .then(|| Arc::new(TalkativeResponder::new(config.talkative_probability_override)));
    let ambient_coordinator = config
        .talkative_use_ai_reply
        .then(|| coordinator.clone());

    let chain = HandlerChain::new()
        .add_handler(Arc::new(CommandHandler::new(
            adapter.clone(),
            sessions.clone(),
            memory.clone(),
        )))
        .add_handler(Arc::new(ReplyHandler::new(
            coordinator.clone(),
            identity.clone(),
        )))
        .add_handler(Arc::new(AmbientHandler::new(
            adapter,
            sessions,
            talkative,
            ambient_coordinator,
        )));

    run_polling(bot, chain, identity).await
}
