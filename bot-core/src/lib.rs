//! # Bot core
//!
//! Transport-agnostic building blocks for the chat bot: message types,
//! the [`Bot`] trait for sending and editing messages, the [`Handler`]
//! chain, the error taxonomy, and tracing initialization.

pub mod bot;
pub mod chain;
pub mod error;
pub mod logger;
pub mod mention;
pub mod types;

pub use bot::Bot;
pub use chain::{Handler, HandlerChain};
pub use error::{BotError, CoreError, Result};
pub use logger::init_tracing;
pub use types::{Chat, ChatKind, ForwardOrigin, HandlerResponse, Message, User};
