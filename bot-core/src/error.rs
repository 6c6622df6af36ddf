//! Error types for the bot core.
//!
//! [`BotError`] classifies transport failures so callers can tell benign
//! edit races and blocked recipients apart from real errors; [`CoreError`]
//! is the top-level error for handlers and the chain.

use thiserror::Error;

/// Transport-level error from [`crate::Bot`] implementations.
#[derive(Error, Debug)]
pub enum BotError {
    /// Edit produced identical content. A benign race, not a failure.
    #[error("message is not modified")]
    NotModified,

    /// The recipient blocked the bot. The turn must abort silently.
    #[error("bot was blocked by the recipient")]
    Blocked,

    #[error("invalid message id: {0}")]
    InvalidMessageId(String),

    #[error("transport error: {0}")]
    Api(String),
}

/// Top-level error for handlers and the handler chain.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("bot transport error: {0}")]
    Bot(#[from] BotError),

    #[error("handler error: {0}")]
    Handler(String),
}

/// Result type for core operations; uses [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
