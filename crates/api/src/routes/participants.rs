//! Route definitions for the `/participants` resource: workflow status
//! moves, the NDA document lifecycle and the participant quotation.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{ndas, participants, quotations};
use crate::state::AppState;

/// Routes mounted at `/participants`.
///
/// ```text
/// PUT    /{id}/status           -> update_status
///
/// POST   /{id}/nda              -> upload (multipart)
/// DELETE /{id}/nda              -> remove
/// POST   /{id}/nda/signed       -> upload_signed (multipart)
/// DELETE /{id}/nda/signed       -> remove_signed
/// GET    /{id}/nda/file         -> download_original
/// GET    /{id}/nda/signed_file  -> download_signed
///
/// GET    /{id}/quotation        -> get_for_participant
/// PUT    /{id}/quotation        -> upsert_for_participant
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/status", put(participants::update_status))
        .route("/{id}/nda", post(ndas::upload).delete(ndas::remove))
        .route(
            "/{id}/nda/signed",
            post(ndas::upload_signed).delete(ndas::remove_signed),
        )
        .route("/{id}/nda/file", get(ndas::download_original))
        .route("/{id}/nda/signed_file", get(ndas::download_signed))
        .route(
            "/{id}/quotation",
            get(quotations::get_for_participant).put(quotations::upsert_for_participant),
        )
}
