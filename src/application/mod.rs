//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Writes (chat turns) and reads (listing, history) are separate handlers.

pub mod handlers;

pub use handlers::{
    GetHistoryError, GetHistoryHandler, GetHistoryQuery, ListConversationsHandler,
    SendMessageCommand, SendMessageError, SendMessageHandler, SendMessageResult, SessionSelector,
};
