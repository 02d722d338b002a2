//! Handlers for the `/clients` resource and its nested areas.
//!
//! Clients are internal organization data; every route here is staff-gated.

use alianza_core::error::CoreError;
use alianza_core::types::DbId;
use alianza_db::models::client::{
    Client, ClientArea, CreateClient, CreateClientArea, UpdateClient, UpdateClientArea,
};
use alianza_db::repositories::{ClientAreaRepo, ClientRepo};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Client CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/clients
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let client = ClientRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /api/v1/clients
pub async fn list(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
) -> AppResult<Json<Vec<Client>>> {
    let clients = ClientRepo::list(&state.pool).await?;
    Ok(Json(clients))
}

/// GET /api/v1/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<Client>> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    Ok(Json(client))
}

/// PUT /api/v1/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<Client>> {
    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    Ok(Json(client))
}

/// DELETE /api/v1/clients/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ClientRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Client areas
// ---------------------------------------------------------------------------

/// GET /api/v1/clients/{client_id}/areas
pub async fn list_areas(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(client_id): Path<DbId>,
) -> AppResult<Json<Vec<ClientArea>>> {
    require_client(&state, client_id).await?;
    let areas = ClientAreaRepo::list_for_client(&state.pool, client_id).await?;
    Ok(Json(areas))
}

/// POST /api/v1/clients/{client_id}/areas
pub async fn create_area(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(client_id): Path<DbId>,
    Json(input): Json<CreateClientArea>,
) -> AppResult<(StatusCode, Json<ClientArea>)> {
    require_client(&state, client_id).await?;
    let area = ClientAreaRepo::create(&state.pool, client_id, &input).await?;
    Ok((StatusCode::CREATED, Json(area)))
}

/// PUT /api/v1/clients/{client_id}/areas/{area_id}
pub async fn update_area(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path((client_id, area_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateClientArea>,
) -> AppResult<Json<ClientArea>> {
    require_area(&state, client_id, area_id).await?;
    let area = ClientAreaRepo::update(&state.pool, area_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ClientArea",
            id: area_id,
        }))?;
    Ok(Json(area))
}

/// DELETE /api/v1/clients/{client_id}/areas/{area_id}
pub async fn delete_area(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path((client_id, area_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_area(&state, client_id, area_id).await?;
    let deleted = ClientAreaRepo::soft_delete(&state.pool, area_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "ClientArea",
            id: area_id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn require_client(state: &AppState, id: DbId) -> AppResult<Client> {
    ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))
}

/// 404 unless the area exists under the client named in the path.
async fn require_area(state: &AppState, client_id: DbId, area_id: DbId) -> AppResult<ClientArea> {
    ClientAreaRepo::find_by_id(&state.pool, area_id)
        .await?
        .filter(|a| a.client_id == client_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ClientArea",
            id: area_id,
        }))
}
