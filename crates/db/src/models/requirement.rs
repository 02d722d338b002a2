//! Project requirement model and the specialty/certification links it carries.

use alianza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A requirement row from the `project_requirements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectRequirement {
    pub id: DbId,
    pub project_request_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a requirement. The request comes from the URL path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRequirement {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating a requirement. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequirement {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A specialty demanded by a requirement, joined with its catalog name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RequirementSpecialty {
    pub id: DbId,
    pub specialty_id: DbId,
    pub name: String,
    pub observations: Option<String>,
}

/// A certification demanded by a requirement, joined with its catalog name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RequirementCertification {
    pub id: DbId,
    pub certification_id: DbId,
    pub name: String,
    pub observations: Option<String>,
}

/// One entry in a requirement-specialty sync payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecialtySelection {
    pub specialty_id: DbId,
    pub observations: Option<String>,
}

/// One entry in a requirement-certification sync payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CertificationSelection {
    pub certification_id: DbId,
    pub observations: Option<String>,
}
