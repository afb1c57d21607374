//! PostgreSQL implementation of ConversationReader.
//!
//! Provides read access for the conversation list and message history.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::conversation::{ConversationSummary, Message, Sender};
use crate::domain::foundation::{ConversationId, DomainError, MessageId, Timestamp};
use crate::ports::ConversationReader;

/// PostgreSQL implementation of ConversationReader.
#[derive(Clone)]
pub struct PostgresConversationReader {
    pool: PgPool,
}

impl PostgresConversationReader {
    /// Creates a new PostgresConversationReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationReader for PostgresConversationReader {
    async fn list_recent(&self, limit: u32) -> Result<Vec<ConversationSummary>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.created_at, c.updated_at,
                   (
                       SELECT m.text
                       FROM messages m
                       WHERE m.conversation_id = c.id
                       ORDER BY m.created_at ASC, m.seq ASC
                       LIMIT 1
                   ) AS first_message
            FROM conversations c
            ORDER BY c.updated_at DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list conversations", e))?;

        Ok(rows
            .iter()
            .map(|row| {
                let id: uuid::Uuid = row.get("id");
                let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
                let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");
                let first_message: Option<String> = row.get("first_message");

                ConversationSummary {
                    id: ConversationId::from_uuid(id),
                    created_at: Timestamp::from_datetime(created_at),
                    updated_at: Timestamp::from_datetime(updated_at),
                    first_message,
                }
            })
            .collect())
    }

    async fn get_messages(&self, conversation_id: &ConversationId) -> Result<Vec<Message>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, sender, text, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(conversation_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch messages", e))?;

        rows.iter().map(row_to_message).collect()
    }

    async fn recent_messages(
        &self,
        conversation_id: &ConversationId,
        exclude: &MessageId,
        limit: u32,
    ) -> Result<Vec<Message>, DomainError> {
        // Newest `limit` rows, flipped back to chronological order.
        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, sender, text, created_at
            FROM (
                SELECT id, conversation_id, sender, text, created_at, seq
                FROM messages
                WHERE conversation_id = $1 AND id <> $2
                ORDER BY created_at DESC, seq DESC
                LIMIT $3
            ) recent
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(conversation_id.as_uuid())
        .bind(exclude.as_uuid())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch recent messages", e))?;

        rows.iter().map(row_to_message).collect()
    }
}

// === Helper Functions ===

fn row_to_message(row: &PgRow) -> Result<Message, DomainError> {
    let id: uuid::Uuid = row.get("id");
    let conversation_id: uuid::Uuid = row.get("conversation_id");
    let sender_str: &str = row.get("sender");
    let text: String = row.get("text");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

    let sender = Sender::parse(sender_str).ok_or_else(|| {
        DomainError::database("Invalid message sender", sender_str)
    })?;

    Ok(Message::reconstitute(
        MessageId::from_uuid(id),
        ConversationId::from_uuid(conversation_id),
        sender,
        text,
        Timestamp::from_datetime(created_at),
    ))
}
