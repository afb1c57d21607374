//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod chat;

pub use chat::{
    GetHistoryError, GetHistoryHandler, GetHistoryQuery, ListConversationsHandler,
    SendMessageCommand, SendMessageError, SendMessageHandler, SendMessageResult, SessionSelector,
};
