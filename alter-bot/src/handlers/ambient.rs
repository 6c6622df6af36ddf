//! Ambient group handler: silently records unaddressed group messages so
//! the bot keeps context, and occasionally chimes in when the probabilistic
//! responder fires: either the pattern's canned reply, or (alternate
//! configuration) a full model turn.

use std::sync::Arc;

use async_trait::async_trait;
use bot_core::{Bot, BotError, Handler, HandlerResponse, Message, Result};
use chat_memory::SessionStore;
use tracing::{error, info, instrument};

use crate::format;
use crate::reply::ReplyCoordinator;
use crate::session_key_for;
use crate::talkative::TalkativeResponder;

pub struct AmbientHandler {
    bot: Arc<dyn Bot>,
    sessions: Arc<SessionStore>,
    /// `None` disables the probabilistic reply path; recording still happens.
    talkative: Option<Arc<TalkativeResponder>>,
    /// When set, a probabilistic hit runs a full AI turn instead of sending
    /// the canned reply.
    coordinator: Option<Arc<ReplyCoordinator>>,
}

impl AmbientHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        sessions: Arc<SessionStore>,
        talkative: Option<Arc<TalkativeResponder>>,
        coordinator: Option<Arc<ReplyCoordinator>>,
    ) -> Self {
        Self {
            bot,
            sessions,
            talkative,
            coordinator,
        }
    }

    fn record_silently(&self, message: &Message) {
        let key = session_key_for(message);
        let user_name = format::format_sender_name(&message.user);
        let inbound = format::format_inbound(message);
        self.sessions
            .record_user_message(&key, message.user.id, &user_name, &inbound);
        info!(
            user_id = message.user.id,
            chat = message.chat.title.as_deref().unwrap_or("group"),
            "silently recorded group message"
        );
    }
}

#[async_trait]
impl Handler for AmbientHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !message.chat.kind.is_group() || message.content.trim().is_empty() {
            return Ok(HandlerResponse::Continue);
        }

        let hit = self
            .talkative
            .as_ref()
            .and_then(|r| r.should_reply(&message.content, &mut rand::thread_rng()));

        let Some(reply) = hit else {
            self.record_silently(message);
            return Ok(HandlerResponse::Stop);
        };

        // Alternate configuration: a hit triggers the full model turn, which
        // records the user message itself.
        if let Some(coordinator) = &self.coordinator {
            info!(chat_id = message.chat.id, "probabilistic hit; running full AI turn");
            coordinator.run_turn(message).await;
            return Ok(HandlerResponse::Stop);
        }

        self.record_silently(message);
        match self.bot.send_message(&message.chat, &reply).await {
            Ok(()) => {
                self.sessions
                    .record_assistant_message(&session_key_for(message), &reply);
                info!(chat_id = message.chat.id, "sent probabilistic canned reply");
                Ok(HandlerResponse::Reply(reply))
            }
            Err(BotError::Blocked) => {
                info!(chat_id = message.chat.id, "recipient blocked the bot");
                Ok(HandlerResponse::Stop)
            }
            Err(e) => {
                error!(error = %e, "failed to send canned reply");
                Ok(HandlerResponse::Stop)
            }
        }
    }
}
