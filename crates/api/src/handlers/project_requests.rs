//! Handlers for the `/project_requests` resource.
//!
//! Staff see and manage every request; associates only see the requests
//! where their company participates.

use alianza_core::error::CoreError;
use alianza_core::roles::is_staff_level;
use alianza_core::types::DbId;
use alianza_db::models::project_request::{
    CreateProjectRequest, ProjectRequest, ProjectRequestSummary, UpdateProjectRequest,
};
use alianza_db::repositories::{ParticipantRepo, ProjectRequestRepo};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;

/// POST /api/v1/project_requests
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<ProjectRequest>)> {
    let request = ProjectRequestRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/v1/project_requests
///
/// Staff get the whole register; associates get the requests their company
/// is assigned to.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<ProjectRequestSummary>>> {
    let requests = if is_staff_level(&user.role) {
        ProjectRequestRepo::list(&state.pool).await?
    } else {
        let company_id = associate_company(&user)?;
        ProjectRequestRepo::list_for_company(&state.pool, company_id).await?
    };
    Ok(Json(requests))
}

/// GET /api/v1/project_requests/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectRequest>> {
    let request = ProjectRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectRequest",
            id,
        }))?;
    require_request_access(&state, &user, id).await?;
    Ok(Json(request))
}

/// PUT /api/v1/project_requests/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectRequest>,
) -> AppResult<Json<ProjectRequest>> {
    let request = ProjectRequestRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectRequest",
            id,
        }))?;
    Ok(Json(request))
}

/// DELETE /api/v1/project_requests/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProjectRequestRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "ProjectRequest",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Shared scoping helpers
// ---------------------------------------------------------------------------

/// The company an associate acts for, or 403 when the account has none.
pub fn associate_company(user: &AuthUser) -> Result<DbId, AppError> {
    user.company_id.ok_or_else(|| {
        AppError::Core(CoreError::Forbidden(
            "Associate account is not linked to a company".into(),
        ))
    })
}

/// Reject associates whose company does not participate in the request.
/// Staff always pass.
pub async fn require_request_access(
    state: &AppState,
    user: &AuthUser,
    project_request_id: DbId,
) -> AppResult<()> {
    if is_staff_level(&user.role) {
        return Ok(());
    }
    let company_id = associate_company(user)?;
    let participates =
        ParticipantRepo::company_in_request(&state.pool, project_request_id, company_id).await?;
    if participates {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Your company is not assigned to this project request".into(),
        )))
    }
}

/// 404 unless the project request exists and is not deleted.
pub async fn require_request(state: &AppState, id: DbId) -> AppResult<ProjectRequest> {
    ProjectRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectRequest",
            id,
        }))
}
