//! Project request model and DTOs.

use alianza_core::types::{DbId, StatusId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project request row from the `project_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectRequest {
    pub id: DbId,
    pub title: String,
    pub client_area_id: DbId,
    pub status_id: StatusId,
    pub observations: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Listing row joined with status, area and client names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectRequestSummary {
    pub id: DbId,
    pub title: String,
    pub status_id: StatusId,
    pub status: String,
    pub client_area_id: DbId,
    pub client_area: String,
    pub client_id: DbId,
    pub client: String,
    pub created_at: Timestamp,
}

/// DTO for creating a project request. New requests start as Open.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub client_area_id: DbId,
    pub observations: Option<String>,
}

/// DTO for updating a project request. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub observations: Option<String>,
    pub status_id: Option<StatusId>,
}
