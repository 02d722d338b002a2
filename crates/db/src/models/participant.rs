//! Participant assignment model and the query rows built around it.
//!
//! A participant is one company assigned to one project requirement. Its
//! `status_id` walks the workflow defined in `alianza_core::status`.

use alianza_core::types::{DbId, StatusId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `project_request_companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Participant {
    pub id: DbId,
    pub requirement_id: DbId,
    pub company_id: DbId,
    pub status_id: StatusId,
    pub nda_id: Option<DbId>,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Participant joined with company, status and NDA columns, as shown on the
/// requirement detail screen.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParticipantDetail {
    pub id: DbId,
    pub requirement_id: DbId,
    pub company_id: DbId,
    pub company: String,
    pub status_id: StatusId,
    pub status: String,
    pub nda_id: Option<DbId>,
    pub nda_file_name: Option<String>,
    pub nda_signed: bool,
    pub quotation_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// A candidate company for a requirement, ranked by catalog matches. NDA
/// flags reflect a currently valid NDA with the requirement's client.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EligibleCompany {
    pub company_id: DbId,
    pub name: String,
    pub matching_specialties: i64,
    pub matching_certifications: i64,
    pub has_nda: bool,
    pub has_signed_nda: bool,
    pub nda_file_name: Option<String>,
    pub already_assigned: bool,
}

/// One page entry of the cross-project assignment listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignedCompanyRow {
    pub id: DbId,
    pub company_id: DbId,
    pub company: String,
    pub status_id: StatusId,
    pub status: String,
    pub requirement_id: DbId,
    pub requirement: String,
    pub project_request_id: DbId,
    pub project_request: String,
    pub client: String,
    pub nda_id: Option<DbId>,
    pub quotation_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Filters for the assignment listing. Built by the handler, never
/// deserialized directly.
#[derive(Debug, Clone, Default)]
pub struct AssignedCompaniesFilter {
    /// Restrict to one company (always set for associate callers).
    pub company_id: Option<DbId>,
    pub status_id: Option<StatusId>,
    /// Status IDs to drop from the listing, e.g. the terminal stages when
    /// the caller only wants live engagements.
    pub exclude_statuses: Option<Vec<StatusId>>,
    /// Case-insensitive match on company, requirement or request title.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Counts reported after a selection sync.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub added: usize,
    pub removed: usize,
    pub kept: usize,
}

/// Where a participant sits in the hierarchy. Resolved once by handlers that
/// need the client/company pair, e.g. the NDA endpoints.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantContext {
    pub id: DbId,
    pub requirement_id: DbId,
    pub project_request_id: DbId,
    pub client_id: DbId,
    pub company_id: DbId,
    pub status_id: StatusId,
    pub nda_id: Option<DbId>,
}
