//! AI reply handler: decides whether an inbound message starts a model
//! turn (private text, @mention, or reply-to-bot) and runs the coordinator.

use std::sync::Arc;

use async_trait::async_trait;
use bot_core::{mention, Handler, HandlerResponse, Message, Result};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::reply::ReplyCoordinator;
use crate::telegram::BotIdentity;

pub struct ReplyHandler {
    coordinator: Arc<ReplyCoordinator>,
    identity: Arc<RwLock<BotIdentity>>,
}

impl ReplyHandler {
    pub fn new(coordinator: Arc<ReplyCoordinator>, identity: Arc<RwLock<BotIdentity>>) -> Self {
        Self {
            coordinator,
            identity,
        }
    }
}

#[async_trait]
impl Handler for ReplyHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let bot_username = self.identity.read().await.username.clone();
        if !mention::should_trigger_reply(message, bot_username.as_deref()) {
            return Ok(HandlerResponse::Continue);
        }

        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            reply_to = ?message.reply_to_message_id,
            "message triggers an AI reply"
        );
        self.coordinator.run_turn(message).await;
        Ok(HandlerResponse::Stop)
    }
}
