//! Per-request discussion between staff and associate users, plus the
//! unread-counts endpoint backed by the in-process cache.

use alianza_core::error::CoreError;
use alianza_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use alianza_core::types::DbId;
use alianza_db::models::message::{CreateMessage, MessageWithSender, UnreadCount};
use alianza_db::repositories::MessageRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::project_requests::{require_request, require_request_access};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::state::AppState;

/// One page of a request's conversation, newest first.
#[derive(Debug, Serialize)]
pub struct MessagesPage {
    pub data: Vec<MessageWithSender>,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct UnreadCountsQuery {
    /// Comma-separated project request ids.
    pub project_request_ids: String,
}

/// GET /api/v1/project_requests/{id}/messages
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<MessagesPage>> {
    require_request(&state, id).await?;
    require_request_access(&state, &user, id).await?;

    let limit = clamp_limit(pagination.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(pagination.offset);
    let total = MessageRepo::count_for_request(&state.pool, id).await?;
    let data = MessageRepo::list_for_request(&state.pool, id, limit, offset).await?;
    Ok(Json(MessagesPage { data, total }))
}

/// POST /api/v1/project_requests/{id}/messages
///
/// Posting invalidates every reader's cached unread count for the request.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateMessage>,
) -> AppResult<(StatusCode, Json<MessageWithSender>)> {
    require_request(&state, id).await?;
    require_request_access(&state, &user, id).await?;

    let body = input.body.trim();
    if body.is_empty() {
        return Err(AppError::BadRequest("Message body must not be empty".into()));
    }

    let message = MessageRepo::create(&state.pool, id, user.user_id, body).await?;
    state.unread_cache.invalidate_request(id).await;
    Ok((StatusCode::CREATED, Json(message)))
}

/// POST /api/v1/project_requests/{id}/messages/read
///
/// Moves the caller's read cursor to now and drops their cached count.
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_request(&state, id).await?;
    require_request_access(&state, &user, id).await?;

    MessageRepo::mark_read(&state.pool, id, user.user_id).await?;
    state.unread_cache.invalidate_user(id, user.user_id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/messages/unread-counts?project_request_ids=1,2,3
///
/// Serves cached counts where present and recomputes the rest in one batch
/// query, caching the results. Requests with no unread messages report 0.
pub async fn unread_counts(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<UnreadCountsQuery>,
) -> AppResult<Json<Vec<UnreadCount>>> {
    let mut ids: Vec<DbId> = Vec::new();
    for part in query.project_request_ids.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id = part.parse::<DbId>().map_err(|_| {
            AppError::BadRequest(format!(
                "project_request_ids must be comma-separated integers, got '{part}'"
            ))
        })?;
        ids.push(id);
    }
    if ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "project_request_ids must name at least one project request".into(),
        )));
    }
    ids.sort_unstable();
    ids.dedup();

    let mut counts: Vec<UnreadCount> = Vec::with_capacity(ids.len());
    let mut misses: Vec<DbId> = Vec::new();
    for &request_id in &ids {
        match state.unread_cache.get(request_id, user.user_id).await {
            Some(unread) => counts.push(UnreadCount {
                project_request_id: request_id,
                unread,
            }),
            None => misses.push(request_id),
        }
    }

    if !misses.is_empty() {
        let fetched = MessageRepo::unread_counts(&state.pool, user.user_id, &misses).await?;
        // The GROUP BY only yields rows with unread messages; the rest of the
        // misses are zeroes and get cached as such.
        for miss in misses {
            let unread = fetched
                .iter()
                .find(|c| c.project_request_id == miss)
                .map(|c| c.unread)
                .unwrap_or(0);
            state.unread_cache.insert(miss, user.user_id, unread).await;
            counts.push(UnreadCount {
                project_request_id: miss,
                unread,
            });
        }
    }

    counts.sort_by_key(|c| c.project_request_id);
    Ok(Json(counts))
}
