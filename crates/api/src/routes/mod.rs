pub mod admin;
pub mod auth;
pub mod catalog;
pub mod clients;
pub mod companies;
pub mod health;
pub mod participants;
pub mod project_requests;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /admin/users                                     list, create (admin only)
/// /admin/users/{id}                                get, update, deactivate
/// /admin/users/{id}/reset-password                 reset password
///
/// /companies                                       list, create
/// /companies/{id}                                  get, update, delete
/// /companies/{id}/specialties                      list, sync
/// /companies/{id}/certifications                   list, sync
/// /companies/{id}/staff                            list, create
/// /companies/{id}/staff/{user_id}                  update, delete
///
/// /clients                                         list, create (staff)
/// /clients/{id}                                    get, update, delete
/// /clients/{id}/areas                              list, create
/// /clients/{id}/areas/{area_id}                    update, delete
///
/// /specialties                                     list, create (admin)
/// /specialties/{id}                                update, delete (admin)
/// /certifications                                  list, create (admin)
/// /certifications/{id}                             update, delete (admin)
///
/// /project_requests                                list, create
/// /project_requests/{id}                           get, update, delete
/// /project_requests/{id}/requirements              list, create
/// /project_requests/{id}/requirements/{rid}        update, delete
/// .../requirements/{rid}/specialties               list, sync
/// .../requirements/{rid}/certifications            list, sync
/// .../requirements/{rid}/eligible_companies        ranked candidates (GET)
/// .../requirements/{rid}/participants              list, diff-sync (multipart POST)
///
/// /participants/{id}/status                        workflow move (PUT)
/// /participants/{id}/nda                           upload (multipart), delete
/// /participants/{id}/nda/signed                    upload signed, delete signed
/// /participants/{id}/nda/file                      download original (GET)
/// /participants/{id}/nda/signed_file               download signed (GET)
/// /participants/{id}/quotation                     get, upsert (PUT)
///
/// /project_requests/{id}/client-quotation          get, save (multipart POST)
/// /project_requests/{id}/client-quotation/file     download (GET)
/// /project_requests/{id}/messages                  list, post
/// /project_requests/{id}/messages/read             mark read (POST)
///
/// /assigned_companies                              cross-project listing (GET)
/// /messages/unread-counts                          batch unread counts (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, refresh, logout).
        .nest("/auth", auth::router())
        // Admin routes (user management).
        .nest("/admin", admin::router())
        // Associate companies, their catalogs and staff accounts.
        .nest("/companies", companies::router())
        // Clients and their business areas.
        .nest("/clients", clients::router())
        // Specialty / certification catalogs.
        .nest("/specialties", catalog::specialty_router())
        .nest("/certifications", catalog::certification_router())
        // Project requests (nests requirements, participants, quotation
        // summary and messages).
        .nest("/project_requests", project_requests::router())
        // Participant workflow, NDA documents and quotations.
        .nest("/participants", participants::router())
        // Cross-project assignment listing.
        .route("/assigned_companies", get(handlers::assigned::list))
        // Batch unread counters for the navigation badge.
        .route(
            "/messages/unread-counts",
            get(handlers::messages::unread_counts),
        )
}
