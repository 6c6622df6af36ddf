//! Bot abstraction for sending and editing messages.
//!
//! [`Bot`] is transport-agnostic; the application provides a Telegram
//! implementation, tests substitute a recording mock.

use crate::error::BotError;
use crate::types::Chat;
use async_trait::async_trait;

/// Abstraction for sending and editing messages. Implementations map to a
/// transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<(), BotError>;

    /// Sends a message and returns its id for later [`Bot::edit_message`]
    /// calls (streamed replies: send once, then edit in place).
    /// `reply_to` attaches the message as a reply to an existing one.
    async fn send_message_and_return_id(
        &self,
        chat: &Chat,
        text: &str,
        reply_to: Option<&str>,
    ) -> Result<String, BotError>;

    /// Edits an already-sent message. `message_id` is transport-specific
    /// (e.g. a Telegram numeric string). Returns [`BotError::NotModified`]
    /// when the new text equals the current one.
    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str)
        -> Result<(), BotError>;
}

/// Parses a message id string into an i32. Used by edit_message implementations.
pub fn parse_message_id(s: &str) -> Result<i32, BotError> {
    s.parse()
        .map_err(|_| BotError::InvalidMessageId(s.to_string()))
}
