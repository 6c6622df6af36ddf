//! # Handler chain
//!
//! Runs a sequence of handlers in order until one returns Stop or Reply.
//! Each inbound message is handled in its own spawned task, so a slow
//! handler never blocks other chats.

use crate::error::Result;
use crate::types::{HandlerResponse, Message};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// A single message handler. Return `Continue` to pass the message on.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse>;
}

/// Chain of handlers: runs each handler's `handle` until Stop or Reply.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Runs handlers in order until one returns Stop or Reply.
    #[instrument(skip(self, message))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            message_id = %message.id,
            "step: handler chain started"
        );

        for h in &self.handlers {
            let name = std::any::type_name_of_val(h.as_ref());
            let response = h.handle(message).await?;
            debug!(handler = %name, response = ?response, "handler processed");

            match response {
                HandlerResponse::Stop | HandlerResponse::Reply(_) => {
                    info!(
                        user_id = message.user.id,
                        handler = %name,
                        "step: handler chain stopped by handler"
                    );
                    return Ok(response);
                }
                HandlerResponse::Continue => {}
            }
        }

        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            "step: handler chain finished, no handler replied"
        );
        Ok(HandlerResponse::Continue)
    }
}
