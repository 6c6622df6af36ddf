//! Shared pure functions for @-mention detection and reply triggers.
//!
//! Used by the reply handler to decide when a message should start an AI
//! turn, and by the ambient responder to normalize group text.

use crate::types::Message;

/// Returns true if `text` contains a @mention of the given bot username.
#[inline]
pub fn is_bot_mentioned(text: &str, bot_username: &str) -> bool {
    text.contains(&format!("@{}", bot_username))
}

/// Returns true if `message` is a reply to one of the bot's own messages.
#[inline]
pub fn is_reply_to_bot(message: &Message) -> bool {
    message.reply_to_message_id.is_some() && message.reply_to_from_bot
}

/// Trigger predicate for an AI turn: private-chat text always triggers;
/// group text triggers on @mention or reply-to-bot.
pub fn should_trigger_reply(message: &Message, bot_username: Option<&str>) -> bool {
    if message.content.trim().is_empty() {
        return false;
    }
    if message.chat.kind.is_private() {
        return true;
    }
    if is_reply_to_bot(message) {
        return true;
    }
    match bot_username {
        Some(username) => is_bot_mentioned(&message.content, username),
        None => false,
    }
}
