//! Render policy: maps turn state to the text shown to the user.
//!
//! The status line is derived from three independent signals by priority
//! (tool activity > thinking > typing); accumulated text is appended with a
//! trailing ellipsis while more may come.

/// Placeholder text sent before the completion stream opens.
pub const MSG_CONNECTING: &str = "🔵 Connecting...";
/// Apology shown (and recorded) when a turn fails.
pub const MSG_ERROR: &str = "🔴 Something went wrong. I don't know what to say next...";
/// Final text when the model produced no visible reply and ran no tools.
pub const MSG_EMPTY_REPLY: &str = "☑️ Done. (No text reply this time.)";

const TOOL_ARGS_PREVIEW: usize = 32;

/// One tool invocation observed mid-stream, for the "working" status.
#[derive(Debug, Clone)]
pub struct ToolCallLog {
    pub name: String,
    pub arguments: String,
}

/// Mutable view of one streaming turn.
#[derive(Debug, Default)]
pub struct TurnProgress {
    /// A tool call (or a fragment of one) was observed.
    pub working: bool,
    /// The stream opened with an empty text delta: the model is reasoning.
    pub thinking: bool,
    /// Raw accumulated assistant text.
    pub text: String,
    pub tool_calls: Vec<ToolCallLog>,
}

impl TurnProgress {
    /// True when the turn produced anything worth showing alongside an error.
    pub fn has_output(&self) -> bool {
        !self.text.is_empty() || !self.tool_calls.is_empty()
    }
}

/// Strips the `[label]:` prefix some models emit at the start of a reply
/// (the chat system adds speaker labels itself), then trims.
pub fn clean_reply(text: &str) -> String {
    let trimmed = text.trim_start();
    if let Some(rest) = trimmed.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            if let Some(after) = rest[end + 1..].strip_prefix(':') {
                return after.trim().to_string();
            }
        }
    }
    text.trim().to_string()
}

fn tool_log(calls: &[ToolCallLog]) -> String {
    calls
        .iter()
        .map(|call| {
            let mut preview: String = call.arguments.chars().take(TOOL_ARGS_PREVIEW).collect();
            if call.arguments.chars().count() > TOOL_ARGS_PREVIEW {
                preview.push_str("...");
            }
            let preview = preview.replace('\n', " ").replace('`', "");
            format!("⚙️ {} `{}`", call.name, preview)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// In-progress status: working/thinking/typing header plus the cleaned
/// partial text with a trailing ellipsis.
pub fn render_progress(progress: &TurnProgress) -> String {
    let cleaned = clean_reply(&progress.text);
    let mut out = if progress.working {
        format!("🟠 Working...\n{}", tool_log(&progress.tool_calls))
    } else if progress.thinking && cleaned.is_empty() {
        "🟢 Thinking...".to_string()
    } else {
        "🟢 Typing...".to_string()
    };
    if !cleaned.is_empty() {
        out.push_str("\n\n");
        out.push_str(&cleaned);
        out.push_str("...");
    }
    out
}

/// Final text for a successful turn. The "done working" marker records that
/// tools ran during the turn.
pub fn render_final(clean_text: &str, with_tools: bool) -> String {
    if clean_text.is_empty() {
        if with_tools {
            "☑️ Done working".to_string()
        } else {
            MSG_EMPTY_REPLY.to_string()
        }
    } else if with_tools {
        format!("☑️ Done working\n{}", clean_text)
    } else {
        clean_text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_reply_strips_leading_bracket_label() {
        assert_eq!(clean_reply("[Alter Ego]: hi there"), "hi there");
        assert_eq!(clean_reply("  [speaker]:hello"), "hello");
        assert_eq!(clean_reply("[]: x"), "x");
    }

    #[test]
    fn clean_reply_leaves_normal_text_alone() {
        assert_eq!(clean_reply("hello [world]: ok"), "hello [world]: ok");
        assert_eq!(clean_reply("[not a label] text"), "[not a label] text");
        assert_eq!(clean_reply("  plain  "), "plain");
    }

    #[test]
    fn progress_priority_working_over_thinking_over_typing() {
        let mut progress = TurnProgress::default();
        assert!(render_progress(&progress).starts_with("🟢 Typing..."));

        progress.thinking = true;
        assert_eq!(render_progress(&progress), "🟢 Thinking...");

        progress.working = true;
        assert!(render_progress(&progress).starts_with("🟠 Working..."));
    }

    #[test]
    fn thinking_with_text_becomes_typing() {
        let progress = TurnProgress {
            thinking: true,
            text: "Hi".to_string(),
            ..Default::default()
        };
        assert_eq!(render_progress(&progress), "🟢 Typing...\n\nHi...");
    }

    #[test]
    fn partial_text_gets_trailing_ellipsis() {
        let progress = TurnProgress {
            text: "[bot]: Partial".to_string(),
            ..Default::default()
        };
        assert_eq!(render_progress(&progress), "🟢 Typing...\n\nPartial...");
    }

    #[test]
    fn tool_log_lists_calls_with_truncated_arguments() {
        let progress = TurnProgress {
            working: true,
            tool_calls: vec![
                ToolCallLog {
                    name: "remember".to_string(),
                    arguments: "{\"text\":\"a short one\"}".to_string(),
                },
                ToolCallLog {
                    name: "weather".to_string(),
                    arguments: format!("{{\"location\":\"{}\"}}", "x".repeat(60)),
                },
            ],
            ..Default::default()
        };
        let rendered = render_progress(&progress);
        assert!(rendered.contains("⚙️ remember `{\"text\":\"a short one\"}`"));
        assert!(rendered.contains("⚙️ weather `"));
        assert!(rendered.contains("...`"));
    }

    #[test]
    fn final_render_variants() {
        assert_eq!(render_final("Hi there", false), "Hi there");
        assert_eq!(render_final("Hi there", true), "☑️ Done working\nHi there");
        assert_eq!(render_final("", true), "☑️ Done working");
        assert_eq!(render_final("", false), MSG_EMPTY_REPLY);
    }
}
