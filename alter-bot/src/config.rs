//! Bot configuration, loaded from environment variables.

use anyhow::Result;
use std::env;

/// Application configuration.
pub struct BotConfig {
    pub bot_token: String,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_steps: u32,
    pub memory_max_count: usize,
    /// SQLite path for long-term memory. `None` runs memory-only.
    pub memory_database_path: Option<String>,
    pub talkative_enabled: bool,
    /// Overrides every pattern's base probability when in `0.0..=1.0`;
    /// `None` keeps per-pattern defaults.
    pub talkative_probability_override: Option<f64>,
    /// When true, a probabilistic hit runs a full AI turn instead of
    /// sending the pattern's canned reply.
    pub talkative_use_ai_reply: bool,
    pub log_file: String,
    /// Optional Telegram Bot API base URL (for tests against a mock server).
    pub telegram_api_url: Option<String>,
}

impl BotConfig {
    /// Loads configuration from the environment. A token passed on the CLI
    /// takes precedence over `TELEGRAM_BOT_TOKEN`.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("TELEGRAM_BOT_TOKEN")
                .map_err(|_| anyhow::anyhow!("TELEGRAM_BOT_TOKEN not set"))?,
        };
        let api_key = env::var("AI_OPENROUTER_API_KEY")
            .map_err(|_| anyhow::anyhow!("AI_OPENROUTER_API_KEY not set"))?;
        let base_url = env::var("AI_OPENROUTER_BASE_URL")
            .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string());
        let model =
            env::var("AI_LLM_DEFAULT_MODEL").unwrap_or_else(|_| "openai/gpt-5".to_string());
        let max_steps = env::var("AI_LLM_MAX_STEPS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);
        let memory_max_count = env::var("AI_MEMORY_MAX_COUNT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(chat_memory::DEFAULT_MEMORY_CAPACITY);
        let memory_database_path = env::var("MEMORY_DATABASE_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty());
        let talkative_enabled = env::var("TALKATIVE_RANDOM_REPLY_ENABLED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(true);
        // -1 is the "no override" sentinel.
        let talkative_probability_override = env::var("TALKATIVE_RANDOM_REPLY_COVERAGE_PROBABILITY")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|p| (0.0..=1.0).contains(p));
        let talkative_use_ai_reply = env::var("TALKATIVE_RANDOM_REPLY_USE_AI")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(false);
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/alter-bot.log".to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();

        Ok(Self {
            bot_token,
            api_key,
            base_url,
            model,
            max_steps,
            memory_max_count,
            memory_database_path,
            talkative_enabled,
            talkative_probability_override,
            talkative_use_ai_reply,
            log_file,
            telegram_api_url,
        })
    }
}
