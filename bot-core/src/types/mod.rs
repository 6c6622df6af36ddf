//! Core message model: user, chat, message, handler response.

pub mod chat;
pub mod message;
pub mod response;
pub mod user;

pub use chat::{Chat, ChatKind};
pub use message::{ForwardOrigin, Message};
pub use response::HandlerResponse;
pub use user::User;
