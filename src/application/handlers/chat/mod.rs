//! Chat handlers.
//!
//! - `SendMessageHandler` - One customer turn and its generated reply
//! - `ListConversationsHandler` - Recent conversations with previews
//! - `GetHistoryHandler` - Full transcript of one conversation

mod get_history;
mod list_conversations;
mod send_message;

pub use get_history::{GetHistoryError, GetHistoryHandler, GetHistoryQuery};
pub use list_conversations::{ListConversationsHandler, LIST_LIMIT};
pub use send_message::{
    SendMessageCommand, SendMessageError, SendMessageHandler, SendMessageResult, SessionSelector,
    HISTORY_LIMIT,
};
