//! Conversation state and the chat send cycle.
//!
//! [`ConversationStore`] owns the message log, input buffer and sending flag.
//! [`ChatController`] serializes access to the store and runs the optimistic
//! send: the user message is committed before the request goes out, then the
//! reply (or an error message) is appended when it settles.

pub mod dispatch;
pub mod error;
pub mod store;

pub use dispatch::{ChatController, SendOutcome};
pub use error::ChatError;
pub use store::{ConversationEvent, ConversationSnapshot, ConversationStore, PendingSend, Settlement};
