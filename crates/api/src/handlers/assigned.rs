//! The cross-project assignment listing: every participant row across all
//! project requests, paginated and filterable. Staff see everything,
//! associates only their own company.

use alianza_core::pagination::{clamp_limit, page_to_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use alianza_core::roles::is_staff_level;
use alianza_core::status::ParticipantStatus;
use alianza_core::types::{DbId, StatusId, Timestamp};
use alianza_db::models::participant::{AssignedCompaniesFilter, AssignedCompanyRow};
use alianza_db::repositories::ParticipantRepo;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::project_requests::associate_company;
use crate::middleware::auth::AuthUser;
use crate::response::Paginated;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssignedQuery {
    /// Drop participants sitting in a terminal stage (rejected, finished,
    /// cancelled).
    #[serde(default)]
    pub only_active: bool,
    /// Return the trimmed payload.
    #[serde(default)]
    pub basic: bool,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Trimmed listing entry for dropdowns and overview widgets.
#[derive(Debug, Serialize)]
pub struct BasicAssignedRow {
    pub id: DbId,
    pub company_id: DbId,
    pub company: String,
    pub status_id: StatusId,
    pub status: String,
    pub project_request_id: DbId,
    pub project_request: String,
    pub created_at: Timestamp,
}

impl From<AssignedCompanyRow> for BasicAssignedRow {
    fn from(row: AssignedCompanyRow) -> Self {
        BasicAssignedRow {
            id: row.id,
            company_id: row.company_id,
            company: row.company,
            status_id: row.status_id,
            status: row.status,
            project_request_id: row.project_request_id,
            project_request: row.project_request,
            created_at: row.created_at,
        }
    }
}

/// GET /api/v1/assigned_companies
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AssignedQuery>,
) -> AppResult<Response> {
    let limit = clamp_limit(query.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let page = query.page.unwrap_or(1).max(1);
    let offset = page_to_offset(query.page, limit);

    // Associates are pinned to their own company regardless of what they ask
    // for.
    let company_id = if is_staff_level(&user.role) {
        None
    } else {
        Some(associate_company(&user)?)
    };

    let filter = AssignedCompaniesFilter {
        company_id,
        status_id: None,
        exclude_statuses: query
            .only_active
            .then(|| ParticipantStatus::TERMINAL_IDS.to_vec()),
        search: query.search.clone().filter(|s| !s.trim().is_empty()),
        limit,
        offset,
    };

    let total = ParticipantRepo::count_assigned(&state.pool, &filter).await?;
    let rows = ParticipantRepo::list_assigned(&state.pool, &filter).await?;

    let body = if query.basic {
        let data: Vec<BasicAssignedRow> = rows.into_iter().map(Into::into).collect();
        Json(Paginated {
            data,
            total,
            page,
            limit,
        })
        .into_response()
    } else {
        Json(Paginated {
            data: rows,
            total,
            page,
            limit,
        })
        .into_response()
    };
    Ok(body)
}
