//! # Chat memory
//!
//! Two stores with the same bounded-FIFO policy but different scopes:
//!
//! - [`SessionStore`]: short-term conversational history, one session per
//!   private (user, chat) pair or per group chat, capped at a fixed number
//!   of messages. Read on every turn to build the prompt.
//! - [`MemoryStore`]: long-term per-user notes written by the model's
//!   `remember` tool, optionally mirrored to SQLite. Injected into the
//!   prompt ahead of the conversation history.

pub mod clock;
pub mod longterm;
pub mod persist;
pub mod session;

pub use clock::{Clock, FixedClock, SystemClock};
pub use longterm::{MemoryStore, DEFAULT_MEMORY_CAPACITY};
pub use persist::MemoryRepository;
pub use session::{
    Role, Session, SessionKey, SessionMessage, SessionStats, SessionStore, SESSION_CAPACITY,
};
