//! Reply coordinator: drives one conversational turn.
//!
//! Records the inbound message, assembles the prompt (persona + long-term
//! memory + session history), streams the completion while the placeholder
//! message is edited in place, then records the final assistant turn. Every
//! failure is contained within the turn: partial output is preserved and the
//! failure itself is written back into the session so the model can explain
//! it later.

use std::sync::Arc;

use bot_core::{Bot, BotError, Message};
use chat_memory::{MemoryStore, SessionKey, SessionStore};
use llm_client::{ChatClient, ChatMessage, StreamEvent, Tool};
use tracing::{debug, error, info};

use crate::format;
use crate::prompt;
use crate::reply::editor::spawn_editor;
use crate::reply::render::{
    render_final, render_progress, ToolCallLog, TurnProgress, MSG_CONNECTING, MSG_ERROR,
};
use crate::session_key_for;
use crate::tools::RememberTool;

/// Orchestrates streamed AI reply turns.
pub struct ReplyCoordinator {
    bot: Arc<dyn Bot>,
    llm: Arc<dyn ChatClient>,
    sessions: Arc<SessionStore>,
    memory: Arc<MemoryStore>,
}

impl ReplyCoordinator {
    pub fn new(
        bot: Arc<dyn Bot>,
        llm: Arc<dyn ChatClient>,
        sessions: Arc<SessionStore>,
        memory: Arc<MemoryStore>,
    ) -> Self {
        Self {
            bot,
            llm,
            sessions,
            memory,
        }
    }

    /// Builds the completion request: persona, optional long-term memory,
    /// then the session history (the current user turn is already recorded).
    fn build_prompt(&self, message: &Message, key: &SessionKey, user_name: &str) -> Vec<ChatMessage> {
        let mut messages = vec![prompt::system_prompt(user_name, message.chat.kind.as_str())];
        if let Some(memory_message) = self.memory.prompt_message(message.user.id, user_name) {
            messages.push(memory_message);
        }
        messages.extend(self.sessions.prompt_history(key));
        messages
    }

    /// Records a failed turn into the session, raw error included, so the
    /// model has its own failure visible in future turns.
    fn record_failure(&self, key: &SessionKey, shown_text: &str, raw_error: &str) {
        self.sessions.record_assistant_message(
            key,
            &format!("{}\n\nAlter Ego System Error Log: {}", shown_text, raw_error),
        );
    }

    /// Runs one full turn for a triggering message.
    pub async fn run_turn(&self, message: &Message) {
        let key = session_key_for(message);
        let user_name = format::format_sender_name(&message.user);
        let inbound = format::format_inbound(message);

        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            chat_type = message.chat.kind.as_str(),
            content_len = inbound.len(),
            "starting AI reply turn"
        );
        self.sessions
            .record_user_message(&key, message.user.id, &user_name, &inbound);

        // Replies and mentions get the placeholder attached to the
        // triggering message so group members can follow the thread.
        let reply_to = (message.content.contains('@') || message.reply_to_message_id.is_some())
            .then_some(message.id.as_str());
        let placeholder = match self
            .bot
            .send_message_and_return_id(&message.chat, MSG_CONNECTING, reply_to)
            .await
        {
            Ok(id) => id,
            Err(BotError::Blocked) => {
                info!(user_id = message.user.id, "recipient blocked the bot; dropping turn");
                return;
            }
            Err(e) => {
                error!(error = %e, "failed to send placeholder message");
                self.record_failure(&key, MSG_ERROR, &e.to_string());
                let _ = self.bot.send_message(&message.chat, MSG_ERROR).await;
                return;
            }
        };

        let (edit_tx, edit_task) =
            spawn_editor(self.bot.clone(), message.chat.clone(), placeholder.clone());

        let prompt_messages = self.build_prompt(message, &key, &user_name);
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(RememberTool::new(
            self.memory.clone(),
            message.user.id,
        ))];

        let mut progress = TurnProgress::default();
        let result = {
            let progress = &mut progress;
            let edit_tx = edit_tx.clone();
            let mut on_event = move |event: StreamEvent| {
                match event {
                    StreamEvent::TextDelta(delta) => {
                        if progress.text.is_empty() && delta.is_empty() {
                            progress.thinking = true;
                        }
                        progress.text.push_str(&delta);
                    }
                    StreamEvent::ToolCallDelta => progress.working = true,
                    StreamEvent::ToolCall { name, arguments } => {
                        progress.working = true;
                        info!(tool = %name, "model invoked tool");
                        progress.tool_calls.push(ToolCallLog { name, arguments });
                    }
                }
                let _ = edit_tx.send(render_progress(progress));
            };
            self.llm
                .stream_chat(prompt_messages, &tools, &mut on_event)
                .await
        };

        match result {
            Ok(raw) => {
                let clean = crate::reply::render::clean_reply(&raw);
                if !clean.is_empty() {
                    self.sessions.record_assistant_message(&key, &clean);
                }
                let final_text = render_final(&clean, progress.working);
                info!(
                    user_id = message.user.id,
                    reply_len = clean.len(),
                    with_tools = progress.working,
                    "AI reply turn finished"
                );
                let _ = edit_tx.send(final_text);
            }
            Err(e) => {
                error!(error = %e, user_id = message.user.id, "completion stream failed");
                let shown = if progress.has_output() {
                    format!("{}\n\n{}", render_progress(&progress), MSG_ERROR)
                } else {
                    MSG_ERROR.to_string()
                };
                self.record_failure(&key, &shown, &e.to_string());
                let _ = edit_tx.send(shown);
            }
        }

        drop(edit_tx);
        let _ = edit_task.await;

        let stats = self.sessions.stats();
        debug!(
            sessions = stats.sessions_count,
            total_messages = stats.total_messages,
            "session stats after turn"
        );
    }
}
