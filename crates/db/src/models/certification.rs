//! Certification catalog model.

use alianza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A certification row from the `certifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Certification {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a certification.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCertification {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating a certification. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCertification {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
