//! Route definitions for the `/project_requests` resource.
//!
//! Nests requirements (with their catalog links, eligible companies and
//! participants), the client quotation summary and the per-request
//! conversation under `/project_requests/{id}/...`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{messages, participants, quotations, requirements};
use crate::handlers::project_requests;
use crate::state::AppState;

/// Routes mounted at `/project_requests`.
///
/// ```text
/// GET    /                                             -> list
/// POST   /                                             -> create
/// GET    /{id}                                         -> get_by_id
/// PUT    /{id}                                         -> update
/// DELETE /{id}                                         -> delete
///
/// GET    /{id}/requirements                            -> list
/// POST   /{id}/requirements                            -> create
/// PUT    /{id}/requirements/{rid}                      -> update
/// DELETE /{id}/requirements/{rid}                      -> delete
/// GET    /{id}/requirements/{rid}/specialties          -> list_specialties
/// POST   /{id}/requirements/{rid}/specialties          -> sync_specialties
/// GET    /{id}/requirements/{rid}/certifications       -> list_certifications
/// POST   /{id}/requirements/{rid}/certifications       -> sync_certifications
/// GET    /{id}/requirements/{rid}/eligible_companies   -> eligible_companies
/// GET    /{id}/requirements/{rid}/participants         -> list
/// POST   /{id}/requirements/{rid}/participants         -> sync (multipart)
///
/// GET    /{id}/client-quotation                        -> get_client_summary
/// POST   /{id}/client-quotation                        -> save_client_summary (multipart)
/// GET    /{id}/client-quotation/file                   -> download_summary_file
///
/// GET    /{id}/messages                                -> list
/// POST   /{id}/messages                                -> create
/// POST   /{id}/messages/read                           -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    let requirement_routes = Router::new()
        .route(
            "/",
            get(requirements::list).post(requirements::create),
        )
        .route(
            "/{rid}",
            put(requirements::update).delete(requirements::delete),
        )
        .route(
            "/{rid}/specialties",
            get(requirements::list_specialties).post(requirements::sync_specialties),
        )
        .route(
            "/{rid}/certifications",
            get(requirements::list_certifications).post(requirements::sync_certifications),
        )
        .route(
            "/{rid}/eligible_companies",
            get(requirements::eligible_companies),
        )
        .route(
            "/{rid}/participants",
            get(participants::list).post(participants::sync),
        );

    Router::new()
        .route(
            "/",
            get(project_requests::list).post(project_requests::create),
        )
        .route(
            "/{id}",
            get(project_requests::get_by_id)
                .put(project_requests::update)
                .delete(project_requests::delete),
        )
        .nest("/{id}/requirements", requirement_routes)
        .route(
            "/{id}/client-quotation",
            get(quotations::get_client_summary).post(quotations::save_client_summary),
        )
        .route(
            "/{id}/client-quotation/file",
            get(quotations::download_summary_file),
        )
        .route(
            "/{id}/messages",
            get(messages::list).post(messages::create),
        )
        .route("/{id}/messages/read", post(messages::mark_read))
}
