//! Telegram transport: teloxide adapter for the core [`bot_core::Bot`]
//! trait, message conversion, and the long-polling runner.

pub mod adapter;
pub mod runner;

use bot_core::{Chat, ChatKind, ForwardOrigin, Message, User};
use chrono::Utc;
use teloxide::types::MessageOrigin;

pub use adapter::TelegramBotAdapter;
pub use runner::run_polling;

/// Bot's own identity, resolved via `get_me` before polling starts. The
/// username drives @mention detection; the id drives reply-to-bot detection.
#[derive(Debug, Default, Clone)]
pub struct BotIdentity {
    pub username: Option<String>,
    pub id: Option<i64>,
}

fn to_core_user(user: &teloxide::types::User) -> User {
    User {
        id: user.id.0 as i64,
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()),
        last_name: user.last_name.clone(),
    }
}

fn chat_kind(chat: &teloxide::types::Chat) -> ChatKind {
    if chat.is_private() {
        ChatKind::Private
    } else if chat.is_group() {
        ChatKind::Group
    } else if chat.is_supergroup() {
        ChatKind::Supergroup
    } else {
        ChatKind::Channel
    }
}

fn origin_name(origin: &MessageOrigin) -> String {
    match origin {
        MessageOrigin::User { sender_user, .. } => {
            let mut name = sender_user.first_name.clone();
            if let Some(last) = &sender_user.last_name {
                name.push(' ');
                name.push_str(last);
            }
            name
        }
        MessageOrigin::HiddenUser {
            sender_user_name, ..
        } => sender_user_name.clone(),
        MessageOrigin::Chat { sender_chat, .. } => {
            sender_chat.title().unwrap_or("Chat").to_string()
        }
        MessageOrigin::Channel { chat, .. } => chat.title().unwrap_or("Channel").to_string(),
    }
}

/// Converts a teloxide message to the core model. `bot_user_id` (from
/// `get_me`) decides whether a replied-to message was the bot's own.
pub fn to_core_message(msg: &teloxide::types::Message, bot_user_id: Option<i64>) -> Message {
    let user = msg
        .from
        .as_ref()
        .map(to_core_user)
        .unwrap_or_else(|| User {
            id: 0,
            username: None,
            first_name: None,
            last_name: None,
        });

    let reply = msg.reply_to_message();
    let reply_to_from_bot = match (reply.and_then(|r| r.from.as_ref()), bot_user_id) {
        (Some(sender), Some(bot_id)) => sender.id.0 as i64 == bot_id,
        _ => false,
    };

    Message {
        id: msg.id.to_string(),
        user,
        chat: Chat {
            id: msg.chat.id.0,
            kind: chat_kind(&msg.chat),
            title: msg.chat.title().map(str::to_string),
        },
        content: msg.text().or_else(|| msg.caption()).unwrap_or("").to_string(),
        created_at: Utc::now(),
        reply_to_message_id: reply.map(|r| r.id.to_string()),
        reply_to_from_bot,
        reply_to_content: reply
            .and_then(|r| r.text().or_else(|| r.caption()))
            .map(str::to_string),
        reply_to_sender: reply
            .and_then(|r| r.from.as_ref())
            .map(|u| crate::format::format_sender_name(&to_core_user(u))),
        forward_origin: msg.forward_origin().map(|origin| ForwardOrigin {
            name: origin_name(origin),
        }),
        photo_count: msg.photo().map(|p| p.len()).unwrap_or(0),
    }
}
