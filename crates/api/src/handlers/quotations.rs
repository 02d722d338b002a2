//! Quotation handlers: the per-participant quotation (read/upsert) and the
//! aggregated client-facing summary per project request.

use std::collections::HashSet;

use alianza_core::error::CoreError;
use alianza_core::quotation::{summary_total_cents, validate_costs, validate_delivery_days};
use alianza_core::types::DbId;
use alianza_db::models::quotation::{
    ClientQuotationSummary, QuotationInput, QuotationWithSegments, RequestQuotationRow,
    SaveClientSummary,
};
use alianza_db::repositories::QuotationRepo;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::participants::{require_context, require_participant_access};
use crate::handlers::project_requests::require_request;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;

/// GET client-quotation payload: the stored summary (if any) together with
/// every live quotation under the request, each flagged with its selection
/// state.
#[derive(Debug, Serialize)]
pub struct ClientQuotationView {
    pub summary: Option<ClientQuotationSummary>,
    pub quotations: Vec<RequestQuotationRow>,
}

/// A quotation response with its derived figures.
#[derive(Debug, Serialize)]
pub struct QuotationView {
    #[serde(flatten)]
    pub quotation: QuotationWithSegments,
    pub total_cost_cents: i64,
    pub margin_cents: i64,
}

impl From<QuotationWithSegments> for QuotationView {
    fn from(quotation: QuotationWithSegments) -> Self {
        let total_cost_cents = quotation.quotation.total_cost_cents();
        let margin_cents = quotation.quotation.margin_cents();
        Self {
            quotation,
            total_cost_cents,
            margin_cents,
        }
    }
}

/// GET /api/v1/participants/{id}/quotation
pub async fn get_for_participant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<QuotationView>> {
    let context = require_context(&state, id).await?;
    require_participant_access(&user, &context)?;
    let quotation = QuotationRepo::find_by_participant(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Quotation",
            id,
        }))?;
    Ok(Json(quotation.into()))
}

/// PUT /api/v1/participants/{id}/quotation
///
/// Upsert the participant's single quotation. Staff or the owning associate
/// company's users; resubmitting replaces the cost fields and delivery
/// segments in place.
pub async fn upsert_for_participant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<QuotationInput>,
) -> AppResult<Json<QuotationView>> {
    let context = require_context(&state, id).await?;
    require_participant_access(&user, &context)?;

    validate_costs(
        input.material_cost_cents,
        input.direct_cost_cents,
        input.indirect_cost_cents,
        input.price_cents,
    )
    .map_err(AppError::Core)?;
    for segment in &input.segments {
        validate_delivery_days(segment.delivery_days).map_err(AppError::Core)?;
        if segment.amount_cents < 0 {
            return Err(AppError::Core(CoreError::Validation(format!(
                "segment amount must not be negative, got {}",
                segment.amount_cents
            ))));
        }
    }

    let quotation = QuotationRepo::upsert_for_participant(&state.pool, id, &input).await?;
    tracing::info!(participant_id = id, quotation_id = quotation.quotation.id, "Quotation saved");
    Ok(Json(quotation.into()))
}

/// GET /api/v1/project_requests/{id}/client-quotation
///
/// Staff only: the rows carry every participant's pricing.
pub async fn get_client_summary(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<ClientQuotationView>> {
    require_request(&state, id).await?;
    let summary = QuotationRepo::find_summary(&state.pool, id).await?;
    let quotations = QuotationRepo::list_for_request(&state.pool, id).await?;
    Ok(Json(ClientQuotationView {
        summary,
        quotations,
    }))
}

/// POST /api/v1/project_requests/{id}/client-quotation
///
/// Multipart form: `quotationIds` (JSON array of quotation ids to flag as
/// client-selected), optional `price` (integer cents; defaults to the sum of
/// the selected quotations), optional `observations`, optional `file`.
/// Saving again replaces the summary in place; omitting the file keeps the
/// stored document.
pub async fn save_client_summary(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ClientQuotationSummary>)> {
    require_request(&state, id).await?;

    let mut quotation_ids: Option<Vec<DbId>> = None;
    let mut price_cents: Option<i64> = None;
    let mut observations: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "quotationIds" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let ids: Vec<DbId> = serde_json::from_str(&text).map_err(|e| {
                    AppError::BadRequest(format!("quotationIds must be a JSON array: {e}"))
                })?;
                quotation_ids = Some(ids);
            }
            "price" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let value = text.trim().parse::<i64>().map_err(|_| {
                    AppError::BadRequest(format!("price must be integer cents, got '{text}'"))
                })?;
                price_cents = Some(value);
            }
            "observations" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !text.trim().is_empty() {
                    observations = Some(text);
                }
            }
            "file" => {
                let name = field.file_name().unwrap_or("quotation.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !data.is_empty() {
                    file_name = Some(name);
                    file_data = Some(data.to_vec());
                }
            }
            _ => {}
        }
    }

    let quotation_ids = quotation_ids
        .ok_or_else(|| AppError::BadRequest("Missing required 'quotationIds' field".into()))?;

    // Every chosen quotation must belong to this request.
    let rows = QuotationRepo::list_for_request(&state.pool, id).await?;
    let known: HashSet<DbId> = rows.iter().map(|r| r.id).collect();
    for quotation_id in &quotation_ids {
        if !known.contains(quotation_id) {
            return Err(AppError::BadRequest(format!(
                "Quotation {quotation_id} does not belong to this project request"
            )));
        }
    }

    let price_cents = match price_cents {
        Some(value) => {
            if value < 0 {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "price must not be negative, got {value}"
                ))));
            }
            value
        }
        None => {
            let selected: Vec<i64> = rows
                .iter()
                .filter(|r| quotation_ids.contains(&r.id))
                .map(|r| r.price_cents)
                .collect();
            summary_total_cents(&selected)
        }
    };

    let input = SaveClientSummary {
        quotation_ids,
        price_cents,
        observations,
        file_name,
        file_data,
    };
    let summary = QuotationRepo::save_client_summary(&state.pool, id, &input).await?;
    tracing::info!(project_request_id = id, summary_id = summary.id, "Client summary saved");
    Ok((StatusCode::CREATED, Json(summary)))
}

/// GET /api/v1/project_requests/{id}/client-quotation/file
pub async fn download_summary_file(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_request(&state, id).await?;
    let file = QuotationRepo::fetch_summary_file(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ClientQuotationSummary",
            id,
        }))?;
    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.file_data,
    ))
}
