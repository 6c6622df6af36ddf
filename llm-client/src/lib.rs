//! # LLM client
//!
//! Streaming chat-completion client for OpenAI-compatible endpoints
//! (e.g. OpenRouter). [`ChatClient`] is the seam the reply coordinator
//! talks to; [`OpenAiChatClient`] implements it with a bounded multi-step
//! tool loop: stream text deltas, execute requested tools, feed results
//! back, repeat until the model stops or the step limit is reached.

pub mod accumulate;
pub mod openai;
pub mod tool;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use accumulate::{ToolCallAccumulator, ToolInvocation};
pub use openai::OpenAiChatClient;
pub use tool::Tool;

/// Message role for chat-completion requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One ordered role/content pair in a chat-completion request.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Incremental events surfaced while a completion streams.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A text increment. May be empty (some models emit an empty first
    /// delta while reasoning; the renderer shows "thinking" for it).
    TextDelta(String),
    /// A fragment of a tool call arrived; the call is not complete yet.
    ToolCallDelta,
    /// A complete tool call, observed before its execution.
    ToolCall { name: String, arguments: String },
}

/// Errors from the completion client.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("chat completion request failed: {0}")]
    Api(#[from] async_openai::error::OpenAIError),

    #[error("completion stream failed: {0}")]
    Stream(String),
}

/// Streaming chat-completion seam. `on_event` receives each increment as it
/// arrives; the returned string is the full accumulated assistant text.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        tools: &[Arc<dyn Tool>],
        on_event: &mut (dyn FnMut(StreamEvent) + Send),
    ) -> Result<String, LlmError>;
}
