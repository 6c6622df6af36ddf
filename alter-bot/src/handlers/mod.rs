//! Handler chain members, wired in order: commands first, then the AI reply
//! trigger, then the ambient group path (silent recording + probabilistic
//! canned replies).

pub mod ai_reply;
pub mod ambient;
pub mod commands;

pub use ai_reply::ReplyHandler;
pub use ambient::AmbientHandler;
pub use commands::CommandHandler;
