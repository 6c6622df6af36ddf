//! Chat identity type for core messages.

use serde::{Deserialize, Serialize};

/// The kind of chat a message was sent in. Groups and supergroups share
/// one conversational context; private chats are per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    /// True for group and supergroup chats.
    pub fn is_group(&self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Supergroup)
    }

    pub fn is_private(&self) -> bool {
        matches!(self, ChatKind::Private)
    }

    /// Lowercase label for prompts and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatKind::Private => "private",
            ChatKind::Group => "group",
            ChatKind::Supergroup => "supergroup",
            ChatKind::Channel => "channel",
        }
    }
}

/// Chat identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub kind: ChatKind,
    /// Group/channel title, when the transport provides one.
    pub title: Option<String>,
}
