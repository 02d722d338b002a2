//! Route definitions for the `/companies` resource.
//!
//! Also nests staff accounts and the specialty/certification catalog links
//! under `/companies/{id}/...`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::companies;
use crate::state::AppState;

/// Routes mounted at `/companies`.
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// GET    /{id}                     -> get_by_id
/// PUT    /{id}                     -> update
/// DELETE /{id}                     -> delete
///
/// GET    /{id}/specialties         -> list_specialties
/// POST   /{id}/specialties         -> sync_specialties
/// GET    /{id}/certifications      -> list_certifications
/// POST   /{id}/certifications      -> sync_certifications
///
/// GET    /{id}/staff               -> list_staff
/// POST   /{id}/staff               -> create_staff
/// PUT    /{id}/staff/{user_id}     -> update_staff
/// DELETE /{id}/staff/{user_id}     -> delete_staff
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(companies::list).post(companies::create))
        .route(
            "/{id}",
            get(companies::get_by_id)
                .put(companies::update)
                .delete(companies::delete),
        )
        .route(
            "/{id}/specialties",
            get(companies::list_specialties).post(companies::sync_specialties),
        )
        .route(
            "/{id}/certifications",
            get(companies::list_certifications).post(companies::sync_certifications),
        )
        .route(
            "/{id}/staff",
            get(companies::list_staff).post(companies::create_staff),
        )
        .route(
            "/{id}/staff/{user_id}",
            put(companies::update_staff).delete(companies::delete_staff),
        )
}
