//! Rate-limited edit loop for the streamed placeholder message.
//!
//! The coordinator pushes every freshly rendered status into an unbounded
//! channel; this loop owns the edit pacing. Invariants:
//!
//! - at most one edit per [`EDIT_INTERVAL`], with a deferred trailing edit
//!   when a value was suppressed, so the visible message is never stale by
//!   more than one interval;
//! - a newer value supersedes a pending deferred one (the latest value is
//!   sent, never an intermediate);
//! - identical consecutive renders are not re-sent;
//! - only one edit call is in flight at a time (the loop awaits each edit).

use std::sync::Arc;
use std::time::Duration;

use bot_core::{Bot, BotError, Chat};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};

/// Minimum spacing between edits of the placeholder message.
pub const EDIT_INTERVAL: Duration = Duration::from_millis(1000);

/// What to do with a freshly arrived render candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditAction {
    /// Send the edit now.
    Flush,
    /// Too soon; hold the value and send at the interval boundary.
    Defer,
    /// Drop the value (empty, or identical to what is already shown).
    Skip,
}

/// Pure decision function for the edit loop, kept transport-free so the
/// pacing rules are unit-testable.
pub(crate) fn decide_edit(
    last_rendered: Option<&str>,
    since_last_send: Duration,
    interval: Duration,
    candidate: &str,
) -> EditAction {
    if candidate.trim().is_empty() {
        return EditAction::Skip;
    }
    if last_rendered == Some(candidate) {
        return EditAction::Skip;
    }
    if since_last_send >= interval {
        EditAction::Flush
    } else {
        EditAction::Defer
    }
}

/// Issues one edit. Returns `false` when the recipient blocked the bot and
/// the loop must stop touching the transport.
async fn apply_edit(bot: &Arc<dyn Bot>, chat: &Chat, message_id: &str, text: &str) -> bool {
    match bot.edit_message(chat, message_id, text).await {
        Ok(()) => true,
        Err(BotError::NotModified) => {
            debug!(message_id, "edit produced identical content; ignoring");
            true
        }
        Err(BotError::Blocked) => {
            info!(chat_id = chat.id, "recipient blocked the bot; stopping edits");
            false
        }
        Err(e) => {
            error!(error = %e, message_id, "failed to edit streamed message");
            true
        }
    }
}

async fn run_edit_loop(
    bot: Arc<dyn Bot>,
    chat: Chat,
    message_id: String,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let mut last_rendered: Option<String> = None;
    // The placeholder send counts as the first transmission.
    let mut last_sent = Instant::now();
    let mut pending: Option<String> = None;

    loop {
        let received = if pending.is_some() {
            let deadline = last_sent + EDIT_INTERVAL;
            tokio::select! {
                item = rx.recv() => Some(item),
                _ = tokio::time::sleep_until(deadline) => None,
            }
        } else {
            Some(rx.recv().await)
        };

        match received {
            // Fresh value: supersedes whatever was pending.
            Some(Some(text)) => pending = Some(text),
            // Channel closed: the turn is over.
            Some(None) => break,
            // Deferred deadline reached with the held value.
            None => {}
        }

        if let Some(text) = pending.take() {
            match decide_edit(
                last_rendered.as_deref(),
                last_sent.elapsed(),
                EDIT_INTERVAL,
                &text,
            ) {
                EditAction::Skip => {}
                EditAction::Defer => pending = Some(text),
                EditAction::Flush => {
                    if !apply_edit(&bot, &chat, &message_id, &text).await {
                        return;
                    }
                    last_sent = Instant::now();
                    last_rendered = Some(text);
                }
            }
        }
    }

    // Final flush ignores the interval: the last rendered state must land.
    if let Some(text) = pending.take() {
        if !text.trim().is_empty() && last_rendered.as_deref() != Some(text.as_str()) {
            apply_edit(&bot, &chat, &message_id, &text).await;
        }
    }
}

/// Starts the edit loop for one placeholder message. Push rendered statuses
/// into the returned sender; drop it and await the handle to guarantee the
/// final edit landed.
pub fn spawn_editor(
    bot: Arc<dyn Bot>,
    chat: Chat,
    message_id: String,
) -> (mpsc::UnboundedSender<String>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(run_edit_loop(bot, chat, message_id, rx));
    (tx, handle)
}
