//! Short-term session store: bounded per-chat conversation history.
//!
//! Group chats share one session (the bot's context for a group is a single
//! continuous thread); private chats get one session per (user, chat) pair.
//! Sessions are created lazily, live for the process lifetime, and are only
//! emptied by the private-chat clear command.

use std::collections::VecDeque;
use std::sync::Arc;

use dashmap::DashMap;
use llm_client::ChatMessage;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};

/// Maximum messages kept per session; the oldest entry is dropped on overflow.
pub const SESSION_CAPACITY: usize = 20;

/// Role of a stored conversation entry. Role alternation is not enforced:
/// consecutive silently-recorded user messages are expected in groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// Sender attribution for group entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSender {
    pub id: i64,
    pub name: String,
}

/// One stored conversation entry.
#[derive(Debug, Clone)]
pub struct SessionMessage {
    pub role: Role,
    pub content: String,
    pub timestamp_ms: i64,
    /// Set for user entries in group sessions; stripped at prompt time.
    pub sender: Option<GroupSender>,
}

/// Session identity. Groups collapse all members into one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionKey {
    Private { user_id: i64, chat_id: i64 },
    Group { chat_id: i64 },
}

impl SessionKey {
    /// Derives the key from chat identity: group/supergroup chats share one
    /// session, private chats are per user.
    pub fn from_chat(chat_id: i64, is_group: bool, user_id: i64) -> Self {
        if is_group {
            SessionKey::Group { chat_id }
        } else {
            SessionKey::Private { user_id, chat_id }
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, SessionKey::Private { .. })
    }
}

/// Session shape: a private session remembers who it belongs to, a group
/// session tags each user entry with its sender instead.
#[derive(Debug, Clone)]
pub enum SessionKind {
    Private { user_id: i64, user_name: String },
    Group,
}

/// Bounded conversation history for one session key.
#[derive(Debug, Clone)]
pub struct Session {
    pub kind: SessionKind,
    messages: VecDeque<SessionMessage>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Session {
    fn new(kind: SessionKind, now_ms: i64) -> Self {
        Self {
            kind,
            messages: VecDeque::new(),
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &SessionMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn push(&mut self, message: SessionMessage, capacity: usize, now_ms: i64) {
        self.messages.push_back(message);
        self.updated_at_ms = now_ms;
        if self.messages.len() > capacity {
            self.messages.pop_front();
        }
    }

    /// Renders the history for the model: timestamps and sender ids are
    /// stripped; in group sessions each user entry is prefixed with the
    /// sender's display name so the model can tell speakers apart.
    pub fn to_prompt_messages(&self) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .map(|m| match m.role {
                Role::Assistant => ChatMessage::assistant(m.content.clone()),
                Role::User => match (&self.kind, &m.sender) {
                    (SessionKind::Group, Some(sender)) => {
                        ChatMessage::user(format!("[{}]: {}", sender.name, m.content))
                    }
                    _ => ChatMessage::user(m.content.clone()),
                },
            })
            .collect()
    }

    fn clear(&mut self, now_ms: i64) {
        self.messages.clear();
        self.updated_at_ms = now_ms;
    }
}

/// Aggregate counters for the stats command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub sessions_count: usize,
    pub total_messages: usize,
}

/// Process-wide keyed session map. Mutations go through the map's per-entry
/// locking; each turn owns its key for the duration of one call.
pub struct SessionStore {
    sessions: DashMap<SessionKey, Session>,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: DashMap::new(),
            capacity,
            clock,
        }
    }

    fn kind_for(key: &SessionKey, sender_name: &str) -> SessionKind {
        match key {
            SessionKey::Private { user_id, .. } => SessionKind::Private {
                user_id: *user_id,
                user_name: sender_name.to_string(),
            },
            SessionKey::Group { .. } => SessionKind::Group,
        }
    }

    /// Records a user turn. Empty or whitespace-only content is stored too;
    /// suppressing empty text is the renderer's job, not the store's.
    pub fn record_user_message(
        &self,
        key: &SessionKey,
        sender_id: i64,
        sender_name: &str,
        content: &str,
    ) {
        let now = self.clock.now_ms();
        let mut session = self
            .sessions
            .entry(key.clone())
            .or_insert_with(|| {
                info!(?key, "created new chat session");
                Session::new(Self::kind_for(key, sender_name), now)
            });
        let sender = match key {
            SessionKey::Group { .. } => Some(GroupSender {
                id: sender_id,
                name: sender_name.to_string(),
            }),
            SessionKey::Private { .. } => None,
        };
        if let SessionKind::Private { user_name, .. } = &mut session.kind {
            *user_name = sender_name.to_string();
        }
        session.push(
            SessionMessage {
                role: Role::User,
                content: content.to_string(),
                timestamp_ms: now,
                sender,
            },
            self.capacity,
            now,
        );
        debug!(?key, total = session.len(), "recorded user message");
    }

    /// Records an assistant turn.
    pub fn record_assistant_message(&self, key: &SessionKey, content: &str) {
        let now = self.clock.now_ms();
        let mut session = self
            .sessions
            .entry(key.clone())
            .or_insert_with(|| Session::new(Self::kind_for(key, "User"), now));
        session.push(
            SessionMessage {
                role: Role::Assistant,
                content: content.to_string(),
                timestamp_ms: now,
                sender: None,
            },
            self.capacity,
            now,
        );
        debug!(?key, total = session.len(), "recorded assistant message");
    }

    /// Prompt-formatted history for the key; empty when no session exists.
    pub fn prompt_history(&self, key: &SessionKey) -> Vec<ChatMessage> {
        self.sessions
            .get(key)
            .map(|s| s.to_prompt_messages())
            .unwrap_or_default()
    }

    /// Empties the session. Returns false when no session exists for the key.
    pub fn clear(&self, key: &SessionKey) -> bool {
        match self.sessions.get_mut(key) {
            Some(mut session) => {
                session.clear(self.clock.now_ms());
                info!(?key, "session cleared");
                true
            }
            None => false,
        }
    }

    /// Counters over all live sessions.
    pub fn stats(&self) -> SessionStats {
        let mut total_messages = 0;
        for entry in self.sessions.iter() {
            total_messages += entry.value().len();
        }
        SessionStats {
            sessions_count: self.sessions.len(),
            total_messages,
        }
    }
}
