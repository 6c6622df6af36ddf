//! Inbound message formatting: turns a transport message into the text the
//! model sees, including reply-quote and forward context the user's client
//! shows but plain text would lose.

use bot_core::{Message, User};

const REPLY_QUOTE_LIMIT: usize = 2000;

/// Sender display name: full name, with `(@username)` appended when both
/// are known; bare `@username` when there is no name; `"User"` otherwise.
pub fn format_sender_name(user: &User) -> String {
    let name = match (&user.first_name, &user.last_name) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        (Some(first), None) => first.clone(),
        (None, Some(last)) => last.clone(),
        (None, None) => String::new(),
    };
    let name = name.trim().to_string();
    match (&user.username, name.is_empty()) {
        (Some(username), true) => format!("@{}", username),
        (Some(username), false) => format!("{} (@{})", name, username),
        (None, true) => "User".to_string(),
        (None, false) => name,
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Renders the inbound message for recording and prompting: forward
/// attribution, a quoted reply block, a photo placeholder note, then the
/// message text itself.
pub fn format_inbound(message: &Message) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(origin) = &message.forward_origin {
        lines.push(format!("Forwarded from: {}", origin.name));
    }

    if message.reply_to_message_id.is_some() {
        let name = message
            .reply_to_sender
            .as_deref()
            .unwrap_or("User");
        lines.push(format!("> Replying to: {}", name));
        lines.push(">".to_string());
        if let Some(quoted) = &message.reply_to_content {
            let quoted = truncate_chars(quoted.trim(), REPLY_QUOTE_LIMIT);
            lines.push(format!("> \"{}\"", quoted.replace('\n', "\n> ")));
        }
        lines.push(String::new());
    }

    if message.photo_count > 0 {
        lines.push(format!(
            "Photos: The message includes {} pictures (this client cannot display pictures).",
            message.photo_count
        ));
    }

    let text = message.content.trim();
    if !text.is_empty() {
        lines.push(text.to_string());
    }

    lines.join("\n")
}
