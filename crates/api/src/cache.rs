//! Process-local cache of unread message counts.
//!
//! Counting unread messages requires a join against the read cursors on
//! every poll, and clients poll the counters far more often than anyone
//! writes a message. The cache keeps the latest known count per
//! (project request, user) pair and is invalidated on the two writes that
//! can change it: marking a conversation read (one user) and posting a
//! message (every user on the request). Misses are recomputed from the
//! repository by the handler.

use std::collections::HashMap;

use alianza_core::types::DbId;
use tokio::sync::RwLock;

/// Unread counters keyed by project request, then by user.
#[derive(Debug, Default)]
pub struct UnreadCache {
    inner: RwLock<HashMap<DbId, HashMap<DbId, i64>>>,
}

impl UnreadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached count for one (request, user) pair, if known.
    pub async fn get(&self, project_request_id: DbId, user_id: DbId) -> Option<i64> {
        self.inner
            .read()
            .await
            .get(&project_request_id)
            .and_then(|by_user| by_user.get(&user_id))
            .copied()
    }

    /// Record a freshly computed count.
    pub async fn insert(&self, project_request_id: DbId, user_id: DbId, count: i64) {
        self.inner
            .write()
            .await
            .entry(project_request_id)
            .or_default()
            .insert(user_id, count);
    }

    /// Drop one user's counter after they mark the conversation read.
    pub async fn invalidate_user(&self, project_request_id: DbId, user_id: DbId) {
        let mut inner = self.inner.write().await;
        if let Some(by_user) = inner.get_mut(&project_request_id) {
            by_user.remove(&user_id);
            if by_user.is_empty() {
                inner.remove(&project_request_id);
            }
        }
    }

    /// Drop every counter for a request after a new message lands.
    pub async fn invalidate_request(&self, project_request_id: DbId) {
        self.inner.write().await.remove(&project_request_id);
    }
}
