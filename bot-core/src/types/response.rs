//! Handler chain result type.

/// Handler result for the chain. `Reply(text)` carries the response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to the next handler.
    Continue,
    /// Stop the chain; no response body.
    Stop,
    /// Stop the chain and attach the reply text.
    Reply(String),
}
