//! PostgreSQL implementation of ConversationRepository.
//!
//! Persists conversations and appends messages to PostgreSQL. Every call is
//! its own statement, so an appended message survives later failures in the
//! same turn.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::conversation::{Conversation, Message};
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, Timestamp};
use crate::ports::ConversationRepository;

/// PostgreSQL implementation of ConversationRepository.
#[derive(Clone)]
pub struct PostgresConversationRepository {
    pool: PgPool,
}

impl PostgresConversationRepository {
    /// Creates a new PostgresConversationRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn create(&self, conversation: &Conversation) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, created_at, updated_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(conversation.id().as_uuid())
        .bind(conversation.created_at().as_datetime())
        .bind(conversation.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert conversation", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, created_at, updated_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch conversation", e))?;

        Ok(row.map(|row| {
            let id: uuid::Uuid = row.get("id");
            let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
            let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

            Conversation::reconstitute(
                ConversationId::from_uuid(id),
                Timestamp::from_datetime(created_at),
                Timestamp::from_datetime(updated_at),
            )
        }))
    }

    async fn add_message(&self, message: &Message) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, sender, text, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id().as_uuid())
        .bind(message.conversation_id().as_uuid())
        .bind(message.sender().as_str())
        .bind(message.text())
        .bind(message.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                DomainError::new(ErrorCode::ConversationNotFound, "Conversation not found")
                    .with_detail("conversation_id", message.conversation_id().to_string())
            }
            _ => DomainError::database("Failed to insert message", e),
        })?;

        Ok(())
    }

    async fn touch(&self, id: &ConversationId, at: Timestamp) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE conversations SET updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update conversation timestamp", e))?;

        if result.rows_affected() == 0 {
            return Err(
                DomainError::new(ErrorCode::ConversationNotFound, "Conversation not found")
                    .with_detail("conversation_id", id.to_string()),
            );
        }

        Ok(())
    }
}
