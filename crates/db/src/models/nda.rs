//! NDA model. File bytes are kept out of the listing struct and fetched
//! separately for downloads.

use alianza_core::nda::nda_is_valid;
use alianza_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// An NDA row without its BYTEA columns.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Nda {
    pub id: DbId,
    pub client_id: DbId,
    pub company_id: DbId,
    pub file_name: String,
    pub expires_at: NaiveDate,
    pub signed_file_name: Option<String>,
    pub signed_at: Option<Timestamp>,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Nda {
    /// Whether this document still satisfies its (client, company) pair on
    /// the given date.
    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        nda_is_valid(self.is_active, self.deleted_at.is_some(), self.expires_at, today)
    }
}

/// A downloadable NDA document.
#[derive(Debug, Clone, FromRow)]
pub struct NdaFile {
    pub file_name: String,
    pub file_data: Vec<u8>,
}
