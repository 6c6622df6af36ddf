//! Shared test doubles: a recording Bot and a scripted chat client, so turn
//! scenarios run without Telegram or a live completion API.

// Each integration-test binary compiles this module separately and uses a
// different subset of the helpers.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bot_core::{Bot, BotError, Chat, ChatKind, Message, User};
use llm_client::{ChatClient, ChatMessage, LlmError, StreamEvent, Tool};

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCall {
    Send { text: String },
    SendWithId { text: String, reply_to: Option<String> },
    Edit { message_id: String, text: String },
}

/// How the mock transport misbehaves, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailMode {
    None,
    /// Every send fails as a blocked recipient.
    BlockedOnSend,
}

/// Records every call; `send_message_and_return_id` returns a fixed id.
pub struct MockBot {
    placeholder_id: String,
    fail_mode: FailMode,
    calls: Mutex<Vec<BotCall>>,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            placeholder_id: "1".to_string(),
            fail_mode: FailMode::None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn blocking() -> Arc<Self> {
        Arc::new(Self {
            placeholder_id: "1".to_string(),
            fail_mode: FailMode::BlockedOnSend,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<BotCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Texts of recorded edits, in order.
    pub fn edits(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BotCall::Edit { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn placeholder_sends(&self) -> Vec<BotCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, BotCall::SendWithId { .. }))
            .collect()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, _chat: &Chat, text: &str) -> Result<(), BotError> {
        if self.fail_mode == FailMode::BlockedOnSend {
            return Err(BotError::Blocked);
        }
        self.calls.lock().unwrap().push(BotCall::Send {
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_message_and_return_id(
        &self,
        _chat: &Chat,
        text: &str,
        reply_to: Option<&str>,
    ) -> Result<String, BotError> {
        if self.fail_mode == FailMode::BlockedOnSend {
            return Err(BotError::Blocked);
        }
        self.calls.lock().unwrap().push(BotCall::SendWithId {
            text: text.to_string(),
            reply_to: reply_to.map(String::from),
        });
        Ok(self.placeholder_id.clone())
    }

    async fn edit_message(
        &self,
        _chat: &Chat,
        message_id: &str,
        text: &str,
    ) -> Result<(), BotError> {
        self.calls.lock().unwrap().push(BotCall::Edit {
            message_id: message_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Replays a fixed event script, then succeeds with the accumulated text or
/// fails with the given error. Captures the submitted prompt for assertions.
pub struct ScriptedChatClient {
    events: Vec<StreamEvent>,
    error: Option<String>,
    pub submitted: Mutex<Vec<ChatMessage>>,
}

impl ScriptedChatClient {
    pub fn succeeding(events: Vec<StreamEvent>) -> Arc<Self> {
        Arc::new(Self {
            events,
            error: None,
            submitted: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(events: Vec<StreamEvent>, error: &str) -> Arc<Self> {
        Arc::new(Self {
            events,
            error: Some(error.to_string()),
            submitted: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        _tools: &[Arc<dyn Tool>],
        on_event: &mut (dyn FnMut(StreamEvent) + Send),
    ) -> Result<String, LlmError> {
        *self.submitted.lock().unwrap() = messages;
        let mut full = String::new();
        for event in &self.events {
            if let StreamEvent::TextDelta(delta) = event {
                full.push_str(delta);
            }
            on_event(event.clone());
        }
        match &self.error {
            Some(message) => Err(LlmError::Stream(message.clone())),
            None => Ok(full),
        }
    }
}

pub fn private_chat() -> Chat {
    Chat {
        id: 10,
        kind: ChatKind::Private,
        title: None,
    }
}

pub fn group_chat() -> Chat {
    Chat {
        id: -100,
        kind: ChatKind::Supergroup,
        title: Some("test group".to_string()),
    }
}

pub fn user(id: i64, first_name: &str) -> User {
    User {
        id,
        username: None,
        first_name: Some(first_name.to_string()),
        last_name: None,
    }
}

pub fn text_message(chat: Chat, sender: User, content: &str) -> Message {
    Message::text("900", sender, chat, content)
}
