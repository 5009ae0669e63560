//! # Message Repository
//!
//! Append-only chat log. Messages are never edited or deleted.
//!
//! ```text
//!   alice ──► append(msg) ──► chat_messages (conversation_id = "alice:bob")
//!   bob   ──► list_conversation("bob", "alice", 50) ──► oldest → newest
//! ```

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use storefront_core::{conversation_id, ChatMessage};

#[derive(Debug, FromRow)]
struct MessageRow {
    id: String,
    conversation_id: String,
    sender_id: String,
    recipient_id: String,
    body: String,
    sent_at: DateTime<Utc>,
}

impl From<MessageRow> for ChatMessage {
    fn from(row: MessageRow) -> Self {
        ChatMessage {
            id: row.id,
            conversation_id: row.conversation_id,
            sender_id: row.sender_id,
            recipient_id: row.recipient_id,
            body: row.body,
            sent_at: row.sent_at,
        }
    }
}

/// Repository for chat messages.
#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MessageRepository { pool }
    }

    pub async fn append(&self, message: &ChatMessage) -> DbResult<()> {
        debug!(
            conversation = %message.conversation_id,
            sender = %message.sender_id,
            "Appending chat message"
        );

        sqlx::query(
            r#"
            INSERT INTO chat_messages (
                id, conversation_id, sender_id, recipient_id, body, sent_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&message.id)
        .bind(&message.conversation_id)
        .bind(&message.sender_id)
        .bind(&message.recipient_id)
        .bind(&message.body)
        .bind(message.sent_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// The latest `limit` messages between two users, oldest first.
    pub async fn list_conversation(&self, a: &str, b: &str, limit: u32) -> DbResult<Vec<ChatMessage>> {
        let conversation = conversation_id(a, b);

        let mut rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, conversation_id, sender_id, recipient_id, body, sent_at
            FROM chat_messages
            WHERE conversation_id = ?1
            ORDER BY sent_at DESC, rowid DESC
            LIMIT ?2
            "#,
        )
        .bind(&conversation)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.reverse();
        debug!(conversation = %conversation, count = rows.len(), "Loaded conversation");
        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }

    /// Ids of everyone `user_id` has exchanged messages with, most recent first.
    pub async fn conversations_for(&self, user_id: &str) -> DbResult<Vec<String>> {
        let partners: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT CASE WHEN sender_id = ?1 THEN recipient_id ELSE sender_id END AS partner
            FROM chat_messages
            WHERE sender_id = ?1 OR recipient_id = ?1
            GROUP BY partner
            ORDER BY MAX(sent_at) DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(partners)
    }
}
