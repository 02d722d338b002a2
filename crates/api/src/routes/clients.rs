//! Route definitions for the `/clients` resource, including nested client
//! areas.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::clients;
use crate::state::AppState;

/// Routes mounted at `/clients`. All handlers require staff level.
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// GET    /{id}                     -> get_by_id
/// PUT    /{id}                     -> update
/// DELETE /{id}                     -> delete
///
/// GET    /{id}/areas               -> list_areas
/// POST   /{id}/areas               -> create_area
/// PUT    /{id}/areas/{area_id}     -> update_area
/// DELETE /{id}/areas/{area_id}     -> delete_area
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(clients::list).post(clients::create))
        .route(
            "/{id}",
            get(clients::get_by_id)
                .put(clients::update)
                .delete(clients::delete),
        )
        .route(
            "/{id}/areas",
            get(clients::list_areas).post(clients::create_area),
        )
        .route(
            "/{id}/areas/{area_id}",
            put(clients::update_area).delete(clients::delete_area),
        )
}
