//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `conversation` - Conversations, messages, and message validation

pub mod conversation;
pub mod foundation;
