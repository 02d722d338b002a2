//! Route definitions for the specialty and certification catalogs.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/specialties`.
///
/// ```text
/// GET    /        -> list_specialties
/// POST   /        -> create_specialty (admin)
/// PUT    /{id}    -> update_specialty (admin)
/// DELETE /{id}    -> delete_specialty (admin)
/// ```
pub fn specialty_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(catalog::list_specialties).post(catalog::create_specialty),
        )
        .route(
            "/{id}",
            put(catalog::update_specialty).delete(catalog::delete_specialty),
        )
}

/// Routes mounted at `/certifications`.
///
/// ```text
/// GET    /        -> list_certifications
/// POST   /        -> create_certification (admin)
/// PUT    /{id}    -> update_certification (admin)
/// DELETE /{id}    -> delete_certification (admin)
/// ```
pub fn certification_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(catalog::list_certifications).post(catalog::create_certification),
        )
        .route(
            "/{id}",
            put(catalog::update_certification).delete(catalog::delete_certification),
        )
}
