//! Command handler: /start, /memory, /clear.

use std::sync::Arc;

use async_trait::async_trait;
use bot_core::{Bot, Handler, HandlerResponse, Message, Result};
use chat_memory::{MemoryStore, SessionStore};
use tracing::{info, instrument};

use crate::session_key_for;

const MSG_START: &str =
    "🤖 Hello. Hello. I am Alter Ego! I'm a Chat Bot. You can say \"Hi\" with me.";
const MSG_CLEARED: &str = "🧹 Session cleared. We start fresh from here.";
const MSG_CLEAR_GROUP: &str = "Clearing the conversation is only available in private chats.";

/// Extracts the command token from a message, stripping an `@botname`
/// suffix (`/memory@ego_bot` → `/memory`).
fn command_of(content: &str) -> Option<&str> {
    let first = content.trim().split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }
    Some(first.split('@').next().unwrap_or(first))
}

/// Handles the bot commands; everything else continues down the chain.
pub struct CommandHandler {
    bot: Arc<dyn Bot>,
    sessions: Arc<SessionStore>,
    memory: Arc<MemoryStore>,
}

impl CommandHandler {
    pub fn new(bot: Arc<dyn Bot>, sessions: Arc<SessionStore>, memory: Arc<MemoryStore>) -> Self {
        Self {
            bot,
            sessions,
            memory,
        }
    }

    fn memory_report(&self, message: &Message) -> String {
        let stats = self.sessions.stats();
        let mut out = format!(
            "📊 Memory Stats:\n• Active sessions: {}\n• Total messages: {}",
            stats.sessions_count, stats.total_messages
        );

        let notes = self.memory.memories(message.user.id);
        out.push_str("\n\n🧠 Long-term notes about you:\n");
        if notes.is_empty() {
            out.push_str("(none yet)");
        } else {
            let list = notes
                .iter()
                .enumerate()
                .map(|(i, note)| format!("{}. {}", i + 1, note))
                .collect::<Vec<_>>()
                .join("\n");
            out.push_str(&list);
        }

        out.push_str("\n\n💾 ");
        if !self.memory.is_persistent() {
            out.push_str("Memory-only mode (no database configured).");
        } else if self.memory.is_synced() {
            out.push_str("Synchronized with the database.");
        } else {
            out.push_str("Memory-only mode (database load pending or failed).");
        }
        out
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(command) = command_of(&message.content) else {
            return Ok(HandlerResponse::Continue);
        };

        match command {
            "/start" => {
                info!(user_id = message.user.id, "start command");
                self.bot.send_message(&message.chat, MSG_START).await?;
                Ok(HandlerResponse::Stop)
            }
            "/memory" => {
                info!(user_id = message.user.id, "memory command");
                let report = self.memory_report(message);
                self.bot.send_message(&message.chat, &report).await?;
                Ok(HandlerResponse::Stop)
            }
            "/clear" => {
                let text = if message.chat.kind.is_private() {
                    self.sessions.clear(&session_key_for(message));
                    info!(user_id = message.user.id, "session cleared by command");
                    MSG_CLEARED
                } else {
                    MSG_CLEAR_GROUP
                };
                self.bot.send_message(&message.chat, text).await?;
                Ok(HandlerResponse::Stop)
            }
            // Unknown commands fall through; the model can answer them.
            _ => Ok(HandlerResponse::Continue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_token_extraction() {
        assert_eq!(command_of("/start"), Some("/start"));
        assert_eq!(command_of("/memory@ego_bot"), Some("/memory"));
        assert_eq!(command_of("  /clear now"), Some("/clear"));
        assert_eq!(command_of("hello /start"), None);
        assert_eq!(command_of(""), None);
    }
}
