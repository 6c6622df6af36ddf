//! Message type for the core model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{chat::Chat, user::User};

/// Attribution of a forwarded message, reduced to a display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardOrigin {
    pub name: String,
}

/// A single inbound message with sender, chat, text, and reply/forward context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub reply_to_message_id: Option<String>,
    /// Whether the replied-to message was sent by the bot itself; only
    /// meaningful when `reply_to_message_id` is set. Decides the
    /// reply-to-bot trigger.
    pub reply_to_from_bot: bool,
    /// Text of the replied-to message, quoted into the prompt so the model
    /// knows what the user is replying to.
    pub reply_to_content: Option<String>,
    /// Display name of the replied-to message's sender.
    pub reply_to_sender: Option<String>,
    pub forward_origin: Option<ForwardOrigin>,
    /// Number of attached photos (the bot cannot display them; a note is
    /// rendered into the prompt instead).
    pub photo_count: usize,
}

impl Message {
    /// A bare text message, used by tests and by synthetic turns.
    pub fn text(id: impl Into<String>, user: User, chat: Chat, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user,
            chat,
            content: content.into(),
            created_at: Utc::now(),
            reply_to_message_id: None,
            reply_to_from_bot: false,
            reply_to_content: None,
            reply_to_sender: None,
            forward_origin: None,
            photo_count: 0,
        }
    }
}
