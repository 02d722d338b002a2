//! NDA lifecycle handlers: upload the original document, attach the signed
//! copy, stream either file back, and detach or remove documents.
//!
//! NDAs live on the client/company pair, not on a single participant, so an
//! upload here can satisfy the NDA stage for the same company on other
//! requests from the same client.

use alianza_core::error::CoreError;
use alianza_core::status::ParticipantStatus;
use alianza_core::types::DbId;
use alianza_db::models::nda::Nda;
use alianza_db::repositories::{NdaRepo, ParticipantRepo};
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;

use crate::error::{AppError, AppResult};
use crate::handlers::participants::{require_context, require_participant_access};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;

/// One uploaded document from a multipart form.
struct UploadedFile {
    name: String,
    data: Vec<u8>,
}

/// POST /api/v1/participants/{id}/nda
///
/// Multipart form: `file` (the NDA document) and `expires_at` (ISO date).
/// Creates the NDA for the participant's client/company pair, links it, and
/// advances the participant from `Selected` to `NdaPending`.
pub async fn upload(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Nda>)> {
    let context = require_context(&state, id).await?;

    let mut file: Option<UploadedFile> = None;
    let mut expires_at: Option<NaiveDate> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("nda.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some(UploadedFile {
                    name: file_name,
                    data: data.to_vec(),
                });
            }
            "expires_at" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let date = text.parse::<NaiveDate>().map_err(|_| {
                    AppError::BadRequest(format!(
                        "expires_at must be an ISO date (YYYY-MM-DD), got '{text}'"
                    ))
                })?;
                expires_at = Some(date);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    let expires_at = expires_at
        .ok_or_else(|| AppError::BadRequest("Missing required 'expires_at' field".into()))?;
    if file.data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    let nda = NdaRepo::create(
        &state.pool,
        context.client_id,
        context.company_id,
        &file.name,
        &file.data,
        expires_at,
    )
    .await?;
    if !nda.is_valid_on(chrono::Utc::now().date_naive()) {
        tracing::warn!(
            participant_id = id,
            nda_id = nda.id,
            %expires_at,
            "uploaded NDA is already expired and will not satisfy future selections"
        );
    }
    ParticipantRepo::link_nda(&state.pool, id, Some(nda.id)).await?;

    // Returns false when the participant already moved past Selected, which
    // is fine: re-uploading a replacement document must not rewind the flow.
    ParticipantRepo::update_status(
        &state.pool,
        id,
        ParticipantStatus::Selected.id(),
        ParticipantStatus::NdaPending.id(),
    )
    .await?;

    tracing::info!(participant_id = id, nda_id = nda.id, "NDA uploaded");
    Ok((StatusCode::CREATED, Json(nda)))
}

/// POST /api/v1/participants/{id}/nda/signed
///
/// Multipart form: `file` (the countersigned document). Attaches it to the
/// participant's linked NDA and advances the workflow to `NdaSigned`.
pub async fn upload_signed(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<Nda>> {
    let context = require_context(&state, id).await?;
    let nda_id = context.nda_id.ok_or_else(|| {
        AppError::BadRequest("Participant has no NDA to attach a signed copy to".into())
    })?;

    let mut file: Option<UploadedFile> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("nda-signed.pdf").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file = Some(UploadedFile {
                name: file_name,
                data: data.to_vec(),
            });
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if file.data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    let nda = NdaRepo::attach_signed(&state.pool, nda_id, &file.name, &file.data)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Nda",
            id: nda_id,
        }))?;

    // NdaPending is the expected prior stage, but a participant whose NDA
    // was uploaded before a replacement selection may still sit at Selected.
    let advanced = ParticipantRepo::update_status(
        &state.pool,
        id,
        ParticipantStatus::NdaPending.id(),
        ParticipantStatus::NdaSigned.id(),
    )
    .await?;
    if !advanced {
        ParticipantRepo::update_status(
            &state.pool,
            id,
            ParticipantStatus::Selected.id(),
            ParticipantStatus::NdaSigned.id(),
        )
        .await?;
    }

    tracing::info!(participant_id = id, nda_id = nda.id, "Signed NDA attached");
    Ok(Json(nda))
}

/// GET /api/v1/participants/{id}/nda/file
pub async fn download_original(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let context = require_context(&state, id).await?;
    require_participant_access(&user, &context)?;
    let nda_id = context.nda_id.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Nda",
        id,
    }))?;
    let file = NdaRepo::fetch_original_file(&state.pool, nda_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Nda",
            id: nda_id,
        }))?;
    Ok(download_response(&file.file_name, file.file_data))
}

/// GET /api/v1/participants/{id}/nda/signed_file
pub async fn download_signed(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let context = require_context(&state, id).await?;
    require_participant_access(&user, &context)?;
    let nda_id = context.nda_id.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Nda",
        id,
    }))?;
    let file = NdaRepo::fetch_signed_file(&state.pool, nda_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Nda",
            id: nda_id,
        }))?;
    Ok(download_response(&file.file_name, file.file_data))
}

/// DELETE /api/v1/participants/{id}/nda
///
/// Soft-deletes the NDA document and unlinks it from the participant. The
/// participant's workflow status is left alone; staff can re-upload and
/// continue.
pub async fn remove(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let context = require_context(&state, id).await?;
    let nda_id = context.nda_id.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Nda",
        id,
    }))?;

    NdaRepo::soft_delete(&state.pool, nda_id).await?;
    ParticipantRepo::link_nda(&state.pool, id, None).await?;
    tracing::info!(participant_id = id, nda_id, "NDA removed");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/participants/{id}/nda/signed
///
/// Drops only the signed copy, keeping the original document in place.
pub async fn remove_signed(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let context = require_context(&state, id).await?;
    let nda_id = context.nda_id.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Nda",
        id,
    }))?;

    NdaRepo::clear_signed(&state.pool, nda_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Nda",
            id: nda_id,
        }))?;
    tracing::info!(participant_id = id, nda_id, "Signed NDA copy removed");
    Ok(StatusCode::NO_CONTENT)
}

fn download_response(file_name: &str, data: Vec<u8>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        data,
    )
}
