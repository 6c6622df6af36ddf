//! Wraps `teloxide::Bot` and implements [`bot_core::Bot`]. Production code
//! sends messages via Telegram; tests substitute a recording mock.

use async_trait::async_trait;
use bot_core::{bot::parse_message_id, Bot as CoreBot, BotError, Chat};
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, ReplyParameters};
use teloxide::ApiError;

/// Thin wrapper around `teloxide::Bot` that implements the core Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// The underlying teloxide Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }

    /// Classifies teloxide errors into the core taxonomy: unchanged-content
    /// edits and blocked recipients get their own variants so the reply
    /// pipeline can treat them as benign / terminal.
    fn map_error(e: teloxide::RequestError) -> BotError {
        match e {
            teloxide::RequestError::Api(ApiError::MessageNotModified) => BotError::NotModified,
            teloxide::RequestError::Api(ApiError::BotBlocked) => BotError::Blocked,
            other => BotError::Api(other.to_string()),
        }
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<(), BotError> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(Self::map_error)?;
        Ok(())
    }

    async fn send_message_and_return_id(
        &self,
        chat: &Chat,
        text: &str,
        reply_to: Option<&str>,
    ) -> Result<String, BotError> {
        let mut request = self.bot.send_message(ChatId(chat.id), text.to_string());
        if let Some(reply_to) = reply_to {
            let id = parse_message_id(reply_to)?;
            request = request.reply_parameters(ReplyParameters::new(MessageId(id)));
        }
        let sent = request.await.map_err(Self::map_error)?;
        Ok(sent.id.to_string())
    }

    async fn edit_message(
        &self,
        chat: &Chat,
        message_id: &str,
        text: &str,
    ) -> Result<(), BotError> {
        let id = parse_message_id(message_id)?;
        self.bot
            .edit_message_text(ChatId(chat.id), MessageId(id), text)
            .await
            .map_err(Self::map_error)?;
        Ok(())
    }
}
