//! Handlers for participant assignment: the per-requirement listing, the
//! multipart diff-and-sync of selected companies, and workflow status moves.

use alianza_core::error::CoreError;
use alianza_core::roles::is_staff_level;
use alianza_core::status::ParticipantStatus;
use alianza_core::types::{DbId, StatusId};
use alianza_db::models::participant::{ParticipantContext, ParticipantDetail, SyncOutcome};
use alianza_db::repositories::ParticipantRepo;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::project_requests::require_request_access;
use crate::handlers::requirements::require_requirement;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /participants/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status_id: StatusId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/project_requests/{id}/requirements/{rid}/participants
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, rid)): Path<(DbId, DbId)>,
) -> AppResult<Json<Vec<ParticipantDetail>>> {
    require_requirement(&state, id, rid).await?;
    require_request_access(&state, &user, id).await?;
    let participants = ParticipantRepo::list_by_requirement(&state.pool, rid).await?;
    Ok(Json(participants))
}

/// POST /api/v1/project_requests/{id}/requirements/{rid}/participants
///
/// Replace the requirement's selected companies. Multipart form with a
/// `selectedCompanies` field holding a JSON array of company ids. Companies
/// absent from the array are soft-deleted, already-assigned ones keep their
/// status, new ones enter at `Selected` (or `NdaSigned` when a valid NDA
/// with the client already exists).
pub async fn sync(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path((id, rid)): Path<(DbId, DbId)>,
    mut multipart: Multipart,
) -> AppResult<Json<SyncOutcome>> {
    require_requirement(&state, id, rid).await?;

    let mut selected: Option<Vec<DbId>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "selectedCompanies" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let ids: Vec<DbId> = serde_json::from_str(&text).map_err(|e| {
                    AppError::BadRequest(format!("selectedCompanies must be a JSON array: {e}"))
                })?;
                selected = Some(ids);
            }
            _ => {} // ignore unknown fields
        }
    }

    let company_ids = selected
        .ok_or_else(|| AppError::BadRequest("Missing required 'selectedCompanies' field".into()))?;

    let client_id = ParticipantRepo::client_for_requirement(&state.pool, rid)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Requirement",
            id: rid,
        }))?;

    let outcome = ParticipantRepo::sync_selection(&state.pool, rid, client_id, &company_ids).await?;
    tracing::info!(
        requirement_id = rid,
        added = outcome.added,
        removed = outcome.removed,
        kept = outcome.kept,
        "Participant selection synced"
    );
    Ok(Json(outcome))
}

/// PUT /api/v1/participants/{id}/status
///
/// Move a participant to the next workflow stage. Unknown status ids are a
/// 400; moves the state machine does not allow are a 409 and leave the row
/// untouched.
pub async fn update_status(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdateRequest>,
) -> AppResult<Json<ParticipantDetail>> {
    let target = ParticipantStatus::from_id(input.status_id).ok_or_else(|| {
        AppError::BadRequest(format!("Unknown participant status id {}", input.status_id))
    })?;

    let participant = ParticipantRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Participant",
            id,
        }))?;

    let current = ParticipantStatus::from_id(participant.status_id).ok_or_else(|| {
        AppError::InternalError(format!(
            "Participant {id} carries unknown status id {}",
            participant.status_id
        ))
    })?;

    if !current.can_transition(target) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot move participant from {current:?} to {target:?}"
        ))));
    }

    let moved =
        ParticipantRepo::update_status(&state.pool, id, current.id(), target.id()).await?;
    if !moved {
        // Another writer advanced the row between our read and the guarded
        // update.
        return Err(AppError::Core(CoreError::Conflict(
            "Participant status changed concurrently; reload and retry".into(),
        )));
    }

    let detail = ParticipantRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Participant",
            id,
        }))?;
    Ok(Json(detail))
}

/// 404 unless the participant exists; returns its resolved hierarchy
/// context (client, company, request).
pub async fn require_context(state: &AppState, id: DbId) -> AppResult<ParticipantContext> {
    ParticipantRepo::find_context(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Participant",
            id,
        }))
}

/// Reject associates acting on a participant that is not their company's.
/// Staff always pass.
pub fn require_participant_access(user: &AuthUser, context: &ParticipantContext) -> AppResult<()> {
    if is_staff_level(&user.role) {
        return Ok(());
    }
    if user.company_id == Some(context.company_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "This participant belongs to another company".into(),
        )))
    }
}
