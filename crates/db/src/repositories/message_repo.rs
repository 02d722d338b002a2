//! Repository for project request messages and read cursors.

use alianza_core::types::DbId;
use sqlx::PgPool;

use crate::models::message::{MessageWithSender, UnreadCount};

/// Provides conversation operations.
pub struct MessageRepo;

impl MessageRepo {
    /// One page of a request's conversation, oldest first.
    pub async fn list_for_request(
        pool: &PgPool,
        project_request_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MessageWithSender>, sqlx::Error> {
        sqlx::query_as::<_, MessageWithSender>(
            "SELECT m.id, m.project_request_id, m.sender_user_id, u.username AS sender,
                    m.body, m.created_at
               FROM project_request_messages m
               JOIN users u ON u.id = m.sender_user_id
              WHERE m.project_request_id = $1 AND m.deleted_at IS NULL
              ORDER BY m.created_at, m.id
              LIMIT $2 OFFSET $3",
        )
        .bind(project_request_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Total live messages in a request's conversation.
    pub async fn count_for_request(
        pool: &PgPool,
        project_request_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM project_request_messages
              WHERE project_request_id = $1 AND deleted_at IS NULL",
        )
        .bind(project_request_id)
        .fetch_one(pool)
        .await
    }

    /// Post a message, returning it joined with the sender's username.
    pub async fn create(
        pool: &PgPool,
        project_request_id: DbId,
        sender_user_id: DbId,
        body: &str,
    ) -> Result<MessageWithSender, sqlx::Error> {
        sqlx::query_as::<_, MessageWithSender>(
            "WITH inserted AS (
                 INSERT INTO project_request_messages (project_request_id, sender_user_id, body)
                 VALUES ($1, $2, $3)
                 RETURNING id, project_request_id, sender_user_id, body, created_at
             )
             SELECT i.id, i.project_request_id, i.sender_user_id, u.username AS sender,
                    i.body, i.created_at
               FROM inserted i
               JOIN users u ON u.id = i.sender_user_id",
        )
        .bind(project_request_id)
        .bind(sender_user_id)
        .bind(body)
        .fetch_one(pool)
        .await
    }

    /// Move the caller's read cursor to now.
    pub async fn mark_read(
        pool: &PgPool,
        project_request_id: DbId,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO message_read_cursors (project_request_id, user_id, last_read_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (project_request_id, user_id)
             DO UPDATE SET last_read_at = NOW()",
        )
        .bind(project_request_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Messages from other senders newer than the caller's read cursor.
    pub async fn unread_count(
        pool: &PgPool,
        project_request_id: DbId,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM project_request_messages m
              WHERE m.project_request_id = $1 AND m.deleted_at IS NULL
                AND m.sender_user_id <> $2
                AND m.created_at > COALESCE(
                    (SELECT last_read_at FROM message_read_cursors
                      WHERE project_request_id = $1 AND user_id = $2),
                    'epoch'::TIMESTAMPTZ)",
        )
        .bind(project_request_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Unread counters for a set of requests in one round trip. Requests
    /// without unread messages are omitted.
    pub async fn unread_counts(
        pool: &PgPool,
        user_id: DbId,
        project_request_ids: &[DbId],
    ) -> Result<Vec<UnreadCount>, sqlx::Error> {
        sqlx::query_as::<_, UnreadCount>(
            "SELECT m.project_request_id, COUNT(*) AS unread
               FROM project_request_messages m
               LEFT JOIN message_read_cursors rc
                 ON rc.project_request_id = m.project_request_id AND rc.user_id = $1
              WHERE m.project_request_id = ANY($2)
                AND m.deleted_at IS NULL
                AND m.sender_user_id <> $1
                AND m.created_at > COALESCE(rc.last_read_at, 'epoch'::TIMESTAMPTZ)
              GROUP BY m.project_request_id",
        )
        .bind(user_id)
        .bind(project_request_ids)
        .fetch_all(pool)
        .await
    }
}
