//! Streamed reply pipeline: render policy, rate-limited edit loop, and the
//! coordinator that drives one turn from inbound message to final edit.

pub mod coordinator;
pub mod editor;
pub mod render;

pub use coordinator::ReplyCoordinator;
pub use editor::{spawn_editor, EDIT_INTERVAL};
pub use render::{
    clean_reply, render_final, render_progress, ToolCallLog, TurnProgress, MSG_CONNECTING,
    MSG_ERROR,
};
