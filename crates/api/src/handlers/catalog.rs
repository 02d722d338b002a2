//! Handlers for the specialty and certification catalogs.
//!
//! The catalogs are reference data shared across the whole network, so
//! mutation is admin-gated while any authenticated user may read them.

use alianza_core::error::CoreError;
use alianza_core::types::DbId;
use alianza_db::models::certification::{Certification, CreateCertification, UpdateCertification};
use alianza_db::models::specialty::{CreateSpecialty, Specialty, UpdateSpecialty};
use alianza_db::repositories::{CertificationRepo, SpecialtyRepo};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Specialties
// ---------------------------------------------------------------------------

/// GET /api/v1/specialties
pub async fn list_specialties(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<Specialty>>> {
    let specialties = SpecialtyRepo::list(&state.pool).await?;
    Ok(Json(specialties))
}

/// POST /api/v1/specialties
pub async fn create_specialty(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateSpecialty>,
) -> AppResult<(StatusCode, Json<Specialty>)> {
    let specialty = SpecialtyRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(specialty)))
}

/// PUT /api/v1/specialties/{id}
pub async fn update_specialty(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSpecialty>,
) -> AppResult<Json<Specialty>> {
    let specialty = SpecialtyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Specialty",
            id,
        }))?;
    Ok(Json(specialty))
}

/// DELETE /api/v1/specialties/{id}
pub async fn delete_specialty(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = SpecialtyRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Specialty",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Certifications
// ---------------------------------------------------------------------------

/// GET /api/v1/certifications
pub async fn list_certifications(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<Certification>>> {
    let certifications = CertificationRepo::list(&state.pool).await?;
    Ok(Json(certifications))
}

/// POST /api/v1/certifications
pub async fn create_certification(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateCertification>,
) -> AppResult<(StatusCode, Json<Certification>)> {
    let certification = CertificationRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(certification)))
}

/// PUT /api/v1/certifications/{id}
pub async fn update_certification(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCertification>,
) -> AppResult<Json<Certification>> {
    let certification = CertificationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Certification",
            id,
        }))?;
    Ok(Json(certification))
}

/// DELETE /api/v1/certifications/{id}
pub async fn delete_certification(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CertificationRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Certification",
            id,
        }))
    }
}
