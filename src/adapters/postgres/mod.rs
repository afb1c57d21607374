//! PostgreSQL adapters - Database implementations for conversation ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresConversationRepository` - Conversation inserts, message appends, timestamp touches
//! - `PostgresConversationReader` - Conversation list and history queries
//!
//! Pool construction and migrations live here too so `main` stays thin.

mod conversation_reader;
mod conversation_repository;

pub use conversation_reader::PostgresConversationReader;
pub use conversation_repository::PostgresConversationRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Builds a connection pool from configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
}

/// Applies the bundled schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
