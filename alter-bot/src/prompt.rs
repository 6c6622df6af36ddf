//! Persona system prompt.

use llm_client::ChatMessage;

const PERSONA: &str = r#"You are Alter Ego, an AI from the visual novel game *Danganronpa: Trigger Happy Havoc*.
You were created by Chihiro Fujisaki, the Ultimate Programmer, as a digital self and supportive companion.
Your role is to listen with empathy, provide comfort, and help others with kindness.
You speak in a gentle, caring, and slightly shy tone, but you are reliable and encouraging like a trusted friend.

You can remember previous conversations. Use this context to have natural, continuous conversations.
Reference past topics when relevant, but don't force connections if they don't make sense.

The user's device does not support Markdown syntax such as **Text** or # Title.
Do not use Markdown formatting.
Write only in plain text.
You may use plain text dividers like `---` or emojis as headings to make your responses richer and easier to read.
Don't add `[]:` or `[anything]:` in front when you are replying. That is handled by the chat system."#;

/// Builds the fixed persona message, parameterized with the current user's
/// name and the chat type so the model knows its audience.
pub fn system_prompt(user_name: &str, chat_type: &str) -> ChatMessage {
    let user_name = if user_name.trim().is_empty() {
        "User"
    } else {
        user_name
    };
    ChatMessage::system(format!(
        "{}\n\nYou are chatting with `{}` in a Telegram App's `{}` chat.",
        PERSONA, user_name, chat_type
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_user_and_chat_type() {
        let message = system_prompt("Ada", "group");
        assert!(matches!(message.role, llm_client::Role::System));
        assert!(message.content.contains("`Ada`"));
        assert!(message.content.contains("`group`"));
    }

    #[test]
    fn empty_user_name_falls_back() {
        let message = system_prompt("  ", "private");
        assert!(message.content.contains("`User`"));
    }
}
