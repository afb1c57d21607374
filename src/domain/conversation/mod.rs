//! Conversation domain module.
//!
//! Conversations are append-only threads of user and AI messages.

mod conversation;
mod message;

pub use conversation::{Conversation, ConversationSummary};
pub use message::{Message, MessageText, Sender};
