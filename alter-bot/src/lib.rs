//! # Alter Ego bot
//!
//! Telegram companion bot: proxies messages to a streaming LLM, keeps
//! bounded per-chat conversation history, persists long-term per-user
//! notes, and streams replies by editing one placeholder message in place.

pub mod cli;
pub mod config;
pub mod format;
pub mod handlers;
pub mod prompt;
pub mod reply;
pub mod talkative;
pub mod telegram;
pub mod tools;

use bot_core::Message;
use chat_memory::SessionKey;

pub use cli::{Cli, Commands};
pub use config::BotConfig;

/// Session identity for an inbound message: group chats collapse into one
/// shared session, private chats are per user and chat.
pub fn session_key_for(message: &Message) -> SessionKey {
    SessionKey::from_chat(
        message.chat.id,
        message.chat.kind.is_group(),
        message.user.id,
    )
}
