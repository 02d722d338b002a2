//! Quotation models. All money fields are integer cents.

use alianza_core::quotation::{margin_cents, total_cost_cents};
use alianza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A quotation row from the `quotations` table. One live quotation per
/// participant.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quotation {
    pub id: DbId,
    pub participant_id: DbId,
    pub material_cost_cents: i64,
    pub direct_cost_cents: i64,
    pub indirect_cost_cents: i64,
    pub price_cents: i64,
    pub notes: Option<String>,
    pub is_client_selected: bool,
    pub is_client_approved: bool,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Quotation {
    /// Material + direct + indirect.
    pub fn total_cost_cents(&self) -> i64 {
        total_cost_cents(
            self.material_cost_cents,
            self.direct_cost_cents,
            self.indirect_cost_cents,
        )
    }

    /// Price minus total cost. Negative when the participant quoted below
    /// cost.
    pub fn margin_cents(&self) -> i64 {
        margin_cents(self.price_cents, self.total_cost_cents())
    }
}

/// A delivery segment inside a quotation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuotationSegment {
    pub id: DbId,
    pub quotation_id: DbId,
    pub position: i32,
    pub description: String,
    pub delivery_days: i32,
    pub amount_cents: i64,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A quotation with its segments, as returned to the API.
#[derive(Debug, Clone, Serialize)]
pub struct QuotationWithSegments {
    #[serde(flatten)]
    pub quotation: Quotation,
    pub segments: Vec<QuotationSegment>,
}

/// One segment in a quotation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentInput {
    pub description: String,
    pub delivery_days: i32,
    pub amount_cents: i64,
}

/// DTO for saving a participant quotation. Submitting again replaces the
/// previous values and segments in place.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotationInput {
    pub material_cost_cents: i64,
    pub direct_cost_cents: i64,
    pub indirect_cost_cents: i64,
    pub price_cents: i64,
    pub notes: Option<String>,
    pub segments: Vec<SegmentInput>,
}

/// Quotation listing row for a project request, joined with the company and
/// requirement it quotes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RequestQuotationRow {
    pub id: DbId,
    pub participant_id: DbId,
    pub company_id: DbId,
    pub company: String,
    pub requirement_id: DbId,
    pub requirement: String,
    pub price_cents: i64,
    pub is_client_selected: bool,
    pub is_client_approved: bool,
    pub created_at: Timestamp,
}

/// The summary quotation presented to the client, without file bytes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClientQuotationSummary {
    pub id: DbId,
    pub project_request_id: DbId,
    pub price_cents: i64,
    pub observations: Option<String>,
    pub file_name: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A downloadable client summary document.
#[derive(Debug, Clone, FromRow)]
pub struct SummaryFile {
    pub file_name: String,
    pub file_data: Vec<u8>,
}

/// Input for saving the client summary. Assembled by the handler from the
/// multipart form.
#[derive(Debug, Clone)]
pub struct SaveClientSummary {
    /// Quotations the client picked; flagged `is_client_selected`.
    pub quotation_ids: Vec<DbId>,
    pub price_cents: i64,
    pub observations: Option<String>,
    pub file_name: Option<String>,
    pub file_data: Option<Vec<u8>>,
}
