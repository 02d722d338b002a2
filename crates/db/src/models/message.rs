//! Project request conversation models.

use alianza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A message row joined with the sender's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MessageWithSender {
    pub id: DbId,
    pub project_request_id: DbId,
    pub sender_user_id: DbId,
    pub sender: String,
    pub body: String,
    pub created_at: Timestamp,
}

/// DTO for posting a message.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMessage {
    pub body: String,
}

/// Unread-message counter for one project request.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UnreadCount {
    pub project_request_id: DbId,
    pub unread: i64,
}
