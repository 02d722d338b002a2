//! Specialty catalog model.

use alianza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A specialty row from the `specialties` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Specialty {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a specialty.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSpecialty {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating a specialty. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSpecialty {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
