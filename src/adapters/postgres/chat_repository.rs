//! PostgreSQL implementation of ChatRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::chat::{ChatMessage, Conversation, ConversationSummary};
use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, MessageId, Page, PageRequest, PropertyId, Timestamp,
    UserId,
};
use crate::ports::ChatRepository;

use super::support::{db_error, opt_ts, total, ts};

pub struct PostgresChatRepository {
    pool: PgPool,
}

impl PostgresChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ConversationRow {
    id: Uuid,
    property_id: Uuid,
    buyer_id: Uuid,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    last_message_at: Option<DateTime<Utc>>,
}

impl From<ConversationRow> for Conversation {
    fn from(row: ConversationRow) -> Self {
        Conversation {
            id: ConversationId::from_uuid(row.id),
            property_id: PropertyId::from_uuid(row.property_id),
            buyer_id: UserId::from_uuid(row.buyer_id),
            owner_id: UserId::from_uuid(row.owner_id),
            created_at: ts(row.created_at),
            last_message_at: opt_ts(row.last_message_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    #[sqlx(flatten)]
    conversation: ConversationRow,
    property_title: Option<String>,
    counterpart_name: Option<String>,
    last_message: Option<String>,
    unread_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    conversation_id: Uuid,
    sender_id: Uuid,
    body: String,
    created_at: DateTime<Utc>,
    read_at: Option<DateTime<Utc>>,
}

impl From<MessageRow> for ChatMessage {
    fn from(row: MessageRow) -> Self {
        ChatMessage {
            id: MessageId::from_uuid(row.id),
            conversation_id: ConversationId::from_uuid(row.conversation_id),
            sender_id: UserId::from_uuid(row.sender_id),
            body: row.body,
            created_at: ts(row.created_at),
            read_at: opt_ts(row.read_at),
        }
    }
}

#[async_trait]
impl ChatRepository for PostgresChatRepository {
    async fn find_or_create(&self, candidate: &Conversation) -> Result<Conversation, DomainError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row: ConversationRow = sqlx::query_as(
            r#"
            INSERT INTO chats (id, property_id, buyer_id, owner_id, created_at, last_message_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT ON CONSTRAINT chats_property_buyer_key
                DO UPDATE SET buyer_id = EXCLUDED.buyer_id
            RETURNING id, property_id, buyer_id, owner_id, created_at, last_message_at
            "#,
        )
        .bind(candidate.id.as_uuid())
        .bind(candidate.property_id.as_uuid())
        .bind(candidate.buyer_id.as_uuid())
        .bind(candidate.owner_id.as_uuid())
        .bind(candidate.created_at.as_datetime())
        .bind(candidate.last_message_at.map(|t| *t.as_datetime()))
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to open conversation"))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, DomainError> {
        let row: Option<ConversationRow> = sqlx::query_as(
            r#"
            SELECT id, property_id, buyer_id, owner_id, created_at, last_message_at
            FROM chats WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find conversation"))?;

        Ok(row.map(Conversation::from))
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<ConversationSummary>, DomainError> {
        let rows: Vec<SummaryRow> = sqlx::query_as(
            r#"
            SELECT c.id, c.property_id, c.buyer_id, c.owner_id, c.created_at, c.last_message_at,
                   p.title AS property_title,
                   u.name AS counterpart_name,
                   last.body AS last_message,
                   unread.n AS unread_count
            FROM chats c
            LEFT JOIN properties p ON p.id = c.property_id
            LEFT JOIN users u
                ON u.id = CASE WHEN c.buyer_id = $1 THEN c.owner_id ELSE c.buyer_id END
            LEFT JOIN LATERAL (
                SELECT m.body FROM chat_messages m
                WHERE m.conversation_id = c.id
                ORDER BY m.created_at DESC
                LIMIT 1
            ) last ON TRUE
            CROSS JOIN LATERAL (
                SELECT COUNT(*) AS n FROM chat_messages m
                WHERE m.conversation_id = c.id AND m.sender_id <> $1 AND m.read_at IS NULL
            ) unread
            WHERE c.buyer_id = $1 OR c.owner_id = $1
            ORDER BY COALESCE(c.last_message_at, c.created_at) DESC
            "#,
        )
        .bind(user.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list conversations"))?;

        Ok(rows
            .into_iter()
            .map(|row| ConversationSummary {
                conversation: row.conversation.into(),
                property_title: row.property_title.unwrap_or_default(),
                counterpart_name: row.counterpart_name.unwrap_or_default(),
                last_message: row.last_message,
                unread_count: row.unread_count,
            })
            .collect())
    }

    async fn list_messages(
        &self,
        conversation: &ConversationId,
        page: PageRequest,
    ) -> Result<Page<ChatMessage>, DomainError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM chat_messages WHERE conversation_id = $1")
                .bind(conversation.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count messages"))?;

        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, conversation_id, sender_id, body, created_at, read_at
            FROM chat_messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(conversation.as_uuid())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list messages"))?;

        let messages = rows.into_iter().map(ChatMessage::from).collect();
        Ok(Page::new(messages, total(count), page))
    }

    async fn append(&self, message: &ChatMessage) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let result = sqlx::query("UPDATE chats SET last_message_at = $2 WHERE id = $1")
            .bind(message.conversation_id.as_uuid())
            .bind(message.created_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to touch conversation"))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(
                ErrorCode::ConversationNotFound,
                "Conversation",
                message.conversation_id,
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, conversation_id, sender_id, body, created_at, read_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(message.conversation_id.as_uuid())
        .bind(message.sender_id.as_uuid())
        .bind(&message.body)
        .bind(message.created_at.as_datetime())
        .bind(message.read_at.map(|t| *t.as_datetime()))
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to insert message"))?;

        tx.commit().await.map_err(db_error("Failed to commit transaction"))?;
        Ok(())
    }

    async fn mark_read(
        &self,
        conversation: &ConversationId,
        reader: &UserId,
        at: Timestamp,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE chat_messages SET read_at = $3
            WHERE conversation_id = $1 AND sender_id <> $2 AND read_at IS NULL
            "#,
        )
        .bind(conversation.as_uuid())
        .bind(reader.as_uuid())
        .bind(at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to mark messages read"))?;

        Ok(result.rows_affected())
    }
}
