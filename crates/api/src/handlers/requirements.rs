//! Handlers for requirements nested under a project request, including the
//! specialty/certification sync endpoints and the eligibility listing.

use alianza_core::error::CoreError;
use alianza_core::types::DbId;
use alianza_db::models::participant::EligibleCompany;
use alianza_db::models::requirement::{
    CertificationSelection, CreateRequirement, ProjectRequirement, RequirementCertification,
    RequirementSpecialty, SpecialtySelection, UpdateRequirement,
};
use alianza_db::repositories::{ParticipantRepo, RequirementRepo};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::project_requests::{require_request, require_request_access};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST .../requirements/{rid}/specialties`.
#[derive(Debug, Deserialize)]
pub struct SyncSpecialtiesRequest {
    pub selections: Vec<SpecialtySelection>,
}

/// Request body for `POST .../requirements/{rid}/certifications`.
#[derive(Debug, Deserialize)]
pub struct SyncCertificationsRequest {
    pub selections: Vec<CertificationSelection>,
}

// ---------------------------------------------------------------------------
// Requirement CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/project_requests/{id}/requirements
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<ProjectRequirement>>> {
    require_request(&state, id).await?;
    require_request_access(&state, &user, id).await?;
    let requirements = RequirementRepo::list_for_request(&state.pool, id).await?;
    Ok(Json(requirements))
}

/// POST /api/v1/project_requests/{id}/requirements
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
    Json(input): Json<CreateRequirement>,
) -> AppResult<(StatusCode, Json<ProjectRequirement>)> {
    require_request(&state, id).await?;
    let requirement = RequirementRepo::create(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(requirement)))
}

/// PUT /api/v1/project_requests/{id}/requirements/{rid}
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path((id, rid)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateRequirement>,
) -> AppResult<Json<ProjectRequirement>> {
    require_requirement(&state, id, rid).await?;
    let requirement = RequirementRepo::update(&state.pool, rid, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Requirement",
            id: rid,
        }))?;
    Ok(Json(requirement))
}

/// DELETE /api/v1/project_requests/{id}/requirements/{rid}
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path((id, rid)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_requirement(&state, id, rid).await?;
    let deleted = RequirementRepo::soft_delete(&state.pool, rid).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Requirement",
            id: rid,
        }))
    }
}

// ---------------------------------------------------------------------------
// Specialty / certification sync
// ---------------------------------------------------------------------------

/// GET /api/v1/project_requests/{id}/requirements/{rid}/specialties
pub async fn list_specialties(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, rid)): Path<(DbId, DbId)>,
) -> AppResult<Json<Vec<RequirementSpecialty>>> {
    require_requirement(&state, id, rid).await?;
    require_request_access(&state, &user, id).await?;
    let specialties = RequirementRepo::list_specialties(&state.pool, rid).await?;
    Ok(Json(specialties))
}

/// POST /api/v1/project_requests/{id}/requirements/{rid}/specialties
///
/// Diff-and-sync the requirement's specialty demands: new entries are
/// inserted, surviving ones keep their row (observations updated in place),
/// removed ones are soft-deleted.
pub async fn sync_specialties(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path((id, rid)): Path<(DbId, DbId)>,
    Json(input): Json<SyncSpecialtiesRequest>,
) -> AppResult<Json<Vec<RequirementSpecialty>>> {
    require_requirement(&state, id, rid).await?;
    RequirementRepo::sync_specialties(&state.pool, rid, &input.selections).await?;
    let specialties = RequirementRepo::list_specialties(&state.pool, rid).await?;
    Ok(Json(specialties))
}

/// GET /api/v1/project_requests/{id}/requirements/{rid}/certifications
pub async fn list_certifications(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, rid)): Path<(DbId, DbId)>,
) -> AppResult<Json<Vec<RequirementCertification>>> {
    require_requirement(&state, id, rid).await?;
    require_request_access(&state, &user, id).await?;
    let certifications = RequirementRepo::list_certifications(&state.pool, rid).await?;
    Ok(Json(certifications))
}

/// POST /api/v1/project_requests/{id}/requirements/{rid}/certifications
pub async fn sync_certifications(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path((id, rid)): Path<(DbId, DbId)>,
    Json(input): Json<SyncCertificationsRequest>,
) -> AppResult<Json<Vec<RequirementCertification>>> {
    require_requirement(&state, id, rid).await?;
    RequirementRepo::sync_certifications(&state.pool, rid, &input.selections).await?;
    let certifications = RequirementRepo::list_certifications(&state.pool, rid).await?;
    Ok(Json(certifications))
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

/// GET /api/v1/project_requests/{id}/requirements/{rid}/eligible_companies
///
/// Candidate companies ranked by catalog matches, with NDA status flags
/// against the requirement's client.
pub async fn eligible_companies(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path((id, rid)): Path<(DbId, DbId)>,
) -> AppResult<Json<Vec<EligibleCompany>>> {
    require_requirement(&state, id, rid).await?;
    let client_id = ParticipantRepo::client_for_requirement(&state.pool, rid)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Requirement",
            id: rid,
        }))?;
    let companies = ParticipantRepo::eligible_companies(&state.pool, rid, client_id).await?;
    Ok(Json(companies))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// 404 unless requirement `rid` exists under project request `id`.
pub async fn require_requirement(
    state: &AppState,
    project_request_id: DbId,
    rid: DbId,
) -> AppResult<ProjectRequirement> {
    RequirementRepo::find_by_id(&state.pool, rid)
        .await?
        .filter(|r| r.project_request_id == project_request_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Requirement",
            id: rid,
        }))
}
