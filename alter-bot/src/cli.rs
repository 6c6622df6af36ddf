//! Command-line interface for the bot binary.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "alter-bot", about = "Alter Ego Telegram companion bot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Runs the bot with long polling.
    Run {
        /// Telegram bot token; falls back to TELEGRAM_BOT_TOKEN.
        #[arg(long)]
        token: Option<String>,
    },
}
