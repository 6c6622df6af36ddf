//! End-to-end turn scenarios through the reply coordinator, with the
//! transport and the completion API mocked.

mod common;

use std::sync::Arc;

use alter_bot::reply::{ReplyCoordinator, MSG_CONNECTING};
use alter_bot::session_key_for;
use chat_memory::{MemoryStore, SessionStore, DEFAULT_MEMORY_CAPACITY, SESSION_CAPACITY};
use llm_client::StreamEvent;

use common::{group_chat, private_chat, text_message, user, BotCall, MockBot, ScriptedChatClient};

fn stores() -> (Arc<SessionStore>, Arc<MemoryStore>) {
    (
        Arc::new(SessionStore::new(SESSION_CAPACITY)),
        Arc::new(MemoryStore::new(DEFAULT_MEMORY_CAPACITY)),
    )
}

#[tokio::test(start_paused = true)]
async fn private_hello_streams_to_final_text_and_records_turn() {
    let bot = MockBot::new();
    let llm = ScriptedChatClient::succeeding(vec![
        StreamEvent::TextDelta("Hi".to_string()),
        StreamEvent::TextDelta(" there".to_string()),
    ]);
    let (sessions, memory) = stores();
    let coordinator = ReplyCoordinator::new(bot.clone(), llm, sessions.clone(), memory);

    let message = text_message(private_chat(), user(7, "Ada"), "Hello");
    coordinator.run_turn(&message).await;

    // Exactly one placeholder send, not attached as a reply in private chat.
    let sends = bot.placeholder_sends();
    assert_eq!(
        sends,
        vec![BotCall::SendWithId {
            text: MSG_CONNECTING.to_string(),
            reply_to: None,
        }]
    );

    // At least one edit, culminating in the clean final text.
    let edits = bot.edits();
    assert!(!edits.is_empty());
    assert_eq!(edits.last().unwrap(), "Hi there");

    // Both turns recorded, in order.
    let history = sessions.prompt_history(&session_key_for(&message));
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content, "Hello");
    assert_eq!(history[1].content, "Hi there");
}

#[tokio::test(start_paused = true)]
async fn leading_bracket_label_is_stripped_from_the_final_reply() {
    let bot = MockBot::new();
    let llm = ScriptedChatClient::succeeding(vec![StreamEvent::TextDelta(
        "[Alter Ego]: Hi there".to_string(),
    )]);
    let (sessions, memory) = stores();
    let coordinator = ReplyCoordinator::new(bot.clone(), llm, sessions.clone(), memory);

    let message = text_message(private_chat(), user(7, "Ada"), "Hello");
    coordinator.run_turn(&message).await;

    assert_eq!(bot.edits().last().unwrap(), "Hi there");
    let history = sessions.prompt_history(&session_key_for(&message));
    assert_eq!(history[1].content, "Hi there");
}

#[tokio::test(start_paused = true)]
async fn mid_stream_failure_preserves_partial_and_error_shape() {
    let bot = MockBot::new();
    let llm = ScriptedChatClient::failing(
        vec![StreamEvent::TextDelta("Partial".to_string())],
        "connection reset",
    );
    let (sessions, memory) = stores();
    let coordinator = ReplyCoordinator::new(bot.clone(), llm, sessions.clone(), memory);

    let message = text_message(private_chat(), user(7, "Ada"), "Hello");
    coordinator.run_turn(&message).await;

    let final_edit = bot.edits().last().unwrap().clone();
    assert!(!final_edit.is_empty());
    assert!(final_edit.contains("Partial..."));
    assert!(final_edit.contains("Something went wrong"));

    // The failure is visible to the model in later turns, raw error included.
    let history = sessions.prompt_history(&session_key_for(&message));
    assert_eq!(history.len(), 2);
    assert!(history[1].content.contains("Partial..."));
    assert!(history[1].content.contains("Something went wrong"));
    assert!(history[1].content.contains("connection reset"));
}

#[tokio::test(start_paused = true)]
async fn failure_without_output_shows_only_the_error_notice() {
    let bot = MockBot::new();
    let llm = ScriptedChatClient::failing(vec![], "quota exceeded");
    let (sessions, memory) = stores();
    let coordinator = ReplyCoordinator::new(bot.clone(), llm, sessions.clone(), memory);

    let message = text_message(private_chat(), user(7, "Ada"), "Hello");
    coordinator.run_turn(&message).await;

    let final_edit = bot.edits().last().unwrap().clone();
    assert!(final_edit.starts_with("🔴 Something went wrong"));
    assert!(!final_edit.contains("Typing"));
}

#[tokio::test(start_paused = true)]
async fn tool_activity_yields_working_status_and_done_marker() {
    let bot = MockBot::new();
    let llm = ScriptedChatClient::succeeding(vec![
        StreamEvent::ToolCallDelta,
        StreamEvent::ToolCall {
            name: "remember".to_string(),
            arguments: "{\"text\":\"likes tea\"}".to_string(),
        },
        StreamEvent::TextDelta("Noted!".to_string()),
    ]);
    let (sessions, memory) = stores();
    let coordinator = ReplyCoordinator::new(bot.clone(), llm, sessions.clone(), memory);

    let message = text_message(private_chat(), user(7, "Ada"), "remember that I like tea");
    coordinator.run_turn(&message).await;

    let final_edit = bot.edits().last().unwrap().clone();
    assert_eq!(final_edit, "☑️ Done working\nNoted!");
}

#[tokio::test(start_paused = true)]
async fn blocked_recipient_aborts_the_turn_silently() {
    let bot = MockBot::blocking();
    let llm = ScriptedChatClient::succeeding(vec![StreamEvent::TextDelta("Hi".to_string())]);
    let (sessions, memory) = stores();
    let coordinator = ReplyCoordinator::new(bot.clone(), llm, sessions.clone(), memory);

    let message = text_message(private_chat(), user(7, "Ada"), "Hello");
    coordinator.run_turn(&message).await;

    // Nothing was sent or edited, and no assistant turn was recorded; the
    // user turn itself is still in the session.
    assert!(bot.calls().is_empty());
    let history = sessions.prompt_history(&session_key_for(&message));
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].content, "Hello");
}

#[tokio::test(start_paused = true)]
async fn group_mention_attaches_placeholder_as_reply_and_prefixes_history() {
    let bot = MockBot::new();
    let llm = ScriptedChatClient::succeeding(vec![StreamEvent::TextDelta("Hello!".to_string())]);
    let (sessions, memory) = stores();
    let coordinator = ReplyCoordinator::new(bot.clone(), llm.clone(), sessions.clone(), memory);

    let message = text_message(group_chat(), user(11, "Alice"), "@ego_bot hello");
    coordinator.run_turn(&message).await;

    let sends = bot.placeholder_sends();
    assert_eq!(sends.len(), 1);
    assert!(matches!(
        &sends[0],
        BotCall::SendWithId { reply_to: Some(id), .. } if id == "900"
    ));

    // The submitted prompt renders the group user turn with attribution.
    let submitted = llm.submitted.lock().unwrap().clone();
    let last = submitted.last().unwrap();
    assert!(last.content.starts_with("[Alice"));
    assert!(last.content.contains("@ego_bot hello"));
}

#[tokio::test(start_paused = true)]
async fn long_term_memory_is_injected_before_history() {
    let bot = MockBot::new();
    let llm = ScriptedChatClient::succeeding(vec![StreamEvent::TextDelta("ok".to_string())]);
    let (sessions, memory) = stores();
    memory.remember(7, "likes tea");
    let coordinator = ReplyCoordinator::new(bot.clone(), llm.clone(), sessions, memory);

    let message = text_message(private_chat(), user(7, "Ada"), "Hello");
    coordinator.run_turn(&message).await;

    let submitted = llm.submitted.lock().unwrap().clone();
    assert!(submitted.len() >= 3);
    assert!(matches!(submitted[0].role, llm_client::Role::System));
    assert!(submitted[1].content.contains("1. likes tea"));
    assert_eq!(submitted.last().unwrap().content, "Hello");
}
