//! Support Chat - Customer-support chat backend
//!
//! Persists conversations, forwards each customer message with recent
//! history to a generative model, and stores the reply.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
