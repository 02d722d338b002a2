//! Handlers for the `/companies` resource: the company register, its
//! catalog links, and per-company staff accounts.

use alianza_core::error::CoreError;
use alianza_core::roles::ROLE_ASSOCIATE;
use alianza_core::types::DbId;
use alianza_db::models::certification::Certification;
use alianza_db::models::company::{Company, CreateCompany, UpdateCompany};
use alianza_db::models::specialty::Specialty;
use alianza_db::models::user::{CreateUser, UpdateUser, User, UserWithRole};
use alianza_db::repositories::{CompanyRepo, RoleRepo, UserRepo};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;

const MIN_PASSWORD_LENGTH: usize = 12;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for the specialty/certification set-sync endpoints.
#[derive(Debug, Deserialize)]
pub struct SyncIdsRequest {
    pub ids: Vec<DbId>,
}

/// Request body for `POST /companies/{id}/staff`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStaffRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Request body for `PUT /companies/{id}/staff/{user_id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStaffRequest {
    #[validate(email)]
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Company CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/companies
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Json(input): Json<CreateCompany>,
) -> AppResult<(StatusCode, Json<Company>)> {
    let company = CompanyRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /api/v1/companies
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<Company>>> {
    let companies = CompanyRepo::list(&state.pool).await?;
    Ok(Json(companies))
}

/// GET /api/v1/companies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Company>> {
    let company = CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))?;
    Ok(Json(company))
}

/// PUT /api/v1/companies/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCompany>,
) -> AppResult<Json<Company>> {
    let company = CompanyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))?;
    Ok(Json(company))
}

/// DELETE /api/v1/companies/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CompanyRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Catalog links (specialties / certifications)
// ---------------------------------------------------------------------------

/// GET /api/v1/companies/{id}/specialties
pub async fn list_specialties(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Specialty>>> {
    require_company(&state, id).await?;
    let specialties = CompanyRepo::list_specialties(&state.pool, id).await?;
    Ok(Json(specialties))
}

/// POST /api/v1/companies/{id}/specialties
///
/// Replace the company's specialty set with the given ids and return the
/// resulting list.
pub async fn sync_specialties(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
    Json(input): Json<SyncIdsRequest>,
) -> AppResult<Json<Vec<Specialty>>> {
    require_company(&state, id).await?;
    CompanyRepo::set_specialties(&state.pool, id, &input.ids).await?;
    let specialties = CompanyRepo::list_specialties(&state.pool, id).await?;
    Ok(Json(specialties))
}

/// GET /api/v1/companies/{id}/certifications
pub async fn list_certifications(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Certification>>> {
    require_company(&state, id).await?;
    let certifications = CompanyRepo::list_certifications(&state.pool, id).await?;
    Ok(Json(certifications))
}

/// POST /api/v1/companies/{id}/certifications
pub async fn sync_certifications(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
    Json(input): Json<SyncIdsRequest>,
) -> AppResult<Json<Vec<Certification>>> {
    require_company(&state, id).await?;
    CompanyRepo::set_certifications(&state.pool, id, &input.ids).await?;
    let certifications = CompanyRepo::list_certifications(&state.pool, id).await?;
    Ok(Json(certifications))
}

// ---------------------------------------------------------------------------
// Per-company staff accounts
// ---------------------------------------------------------------------------

/// GET /api/v1/companies/{id}/staff
pub async fn list_staff(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<UserWithRole>>> {
    require_company(&state, id).await?;
    let staff = UserRepo::list_by_company(&state.pool, id).await?;
    Ok(Json(staff))
}

/// POST /api/v1/companies/{id}/staff
///
/// Create an associate login bound to this company.
pub async fn create_staff(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
    Json(input): Json<CreateStaffRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    require_company(&state, id).await?;

    let role = RoleRepo::find_by_name(&state.pool, ROLE_ASSOCIATE)
        .await?
        .ok_or_else(|| AppError::InternalError("Associate role is not seeded".into()))?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        username: input.username,
        email: input.email,
        password_hash: hashed,
        role_id: role.id,
        company_id: Some(id),
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/v1/companies/{id}/staff/{user_id}
pub async fn update_staff(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path((id, user_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateStaffRequest>,
) -> AppResult<Json<User>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    require_staff_member(&state, id, user_id).await?;

    let update_dto = UpdateUser {
        email: input.email,
        role_id: None,
        company_id: None,
        is_active: input.is_active,
    };

    let user = UserRepo::update(&state.pool, user_id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;
    Ok(Json(user))
}

/// DELETE /api/v1/companies/{id}/staff/{user_id}
pub async fn delete_staff(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_staff_member(&state, id, user_id).await?;

    let deleted = UserRepo::soft_delete(&state.pool, user_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// 404 unless the company exists and is not deleted.
async fn require_company(state: &AppState, id: DbId) -> AppResult<Company> {
    CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))
}

/// 404 unless `user_id` is an account belonging to company `id`.
async fn require_staff_member(state: &AppState, id: DbId, user_id: DbId) -> AppResult<User> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .filter(|u| u.company_id == Some(id))
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;
    Ok(user)
}
