//! Repository for quotations, their segments and the client summary.

use alianza_core::status::ProjectRequestStatus;
use alianza_core::types::DbId;
use sqlx::PgPool;

use crate::models::quotation::{
    ClientQuotationSummary, Quotation, QuotationInput, QuotationSegment, QuotationWithSegments,
    RequestQuotationRow, SaveClientSummary, SummaryFile,
};
use crate::soft_delete::NOT_DELETED;

const COLUMNS: &str = "id, participant_id, material_cost_cents, direct_cost_cents, \
     indirect_cost_cents, price_cents, notes, is_client_selected, is_client_approved, \
     is_active, deleted_at, created_at, updated_at";

const SEGMENT_COLUMNS: &str = "id, quotation_id, position, description, delivery_days, \
     amount_cents, is_active, deleted_at, created_at, updated_at";

const SUMMARY_COLUMNS: &str = "id, project_request_id, price_cents, observations, file_name, \
     is_active, deleted_at, created_at, updated_at";

/// Provides quotation operations.
pub struct QuotationRepo;

impl QuotationRepo {
    /// Save a participant's quotation, replacing costs and segments in place
    /// when one already exists. Client selection flags are left untouched.
    pub async fn upsert_for_participant(
        pool: &PgPool,
        participant_id: DbId,
        input: &QuotationInput,
    ) -> Result<QuotationWithSegments, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO quotations
                (participant_id, material_cost_cents, direct_cost_cents, indirect_cost_cents,
                 price_cents, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (participant_id) WHERE deleted_at IS NULL
             DO UPDATE SET
                material_cost_cents = EXCLUDED.material_cost_cents,
                direct_cost_cents = EXCLUDED.direct_cost_cents,
                indirect_cost_cents = EXCLUDED.indirect_cost_cents,
                price_cents = EXCLUDED.price_cents,
                notes = EXCLUDED.notes
             RETURNING {COLUMNS}"
        );
        let quotation = sqlx::query_as::<_, Quotation>(&query)
            .bind(participant_id)
            .bind(input.material_cost_cents)
            .bind(input.direct_cost_cents)
            .bind(input.indirect_cost_cents)
            .bind(input.price_cents)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE quotation_segments SET deleted_at = NOW()
              WHERE quotation_id = $1 AND deleted_at IS NULL",
        )
        .bind(quotation.id)
        .execute(&mut *tx)
        .await?;

        let mut segments = Vec::with_capacity(input.segments.len());
        for (index, segment) in input.segments.iter().enumerate() {
            let query = format!(
                "INSERT INTO quotation_segments
                    (quotation_id, position, description, delivery_days, amount_cents)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING {SEGMENT_COLUMNS}"
            );
            let row = sqlx::query_as::<_, QuotationSegment>(&query)
                .bind(quotation.id)
                .bind(index as i32 + 1)
                .bind(&segment.description)
                .bind(segment.delivery_days)
                .bind(segment.amount_cents)
                .fetch_one(&mut *tx)
                .await?;
            segments.push(row);
        }

        tx.commit().await?;
        Ok(QuotationWithSegments {
            quotation,
            segments,
        })
    }

    /// The live quotation of a participant, with segments.
    pub async fn find_by_participant(
        pool: &PgPool,
        participant_id: DbId,
    ) -> Result<Option<QuotationWithSegments>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quotations
              WHERE participant_id = $1 AND {NOT_DELETED}"
        );
        let Some(quotation) = sqlx::query_as::<_, Quotation>(&query)
            .bind(participant_id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };
        let segments = Self::segments_for(pool, quotation.id).await?;
        Ok(Some(QuotationWithSegments {
            quotation,
            segments,
        }))
    }

    /// The live segments of a quotation in display order.
    pub async fn segments_for(
        pool: &PgPool,
        quotation_id: DbId,
    ) -> Result<Vec<QuotationSegment>, sqlx::Error> {
        let query = format!(
            "SELECT {SEGMENT_COLUMNS} FROM quotation_segments
              WHERE quotation_id = $1 AND {NOT_DELETED}
              ORDER BY position"
        );
        sqlx::query_as::<_, QuotationSegment>(&query)
            .bind(quotation_id)
            .fetch_all(pool)
            .await
    }

    /// Every live quotation under a project request, joined for display.
    pub async fn list_for_request(
        pool: &PgPool,
        project_request_id: DbId,
    ) -> Result<Vec<RequestQuotationRow>, sqlx::Error> {
        sqlx::query_as::<_, RequestQuotationRow>(
            "SELECT q.id, q.participant_id, pc.company_id, c.name AS company,
                    req.id AS requirement_id, req.name AS requirement,
                    q.price_cents, q.is_client_selected, q.is_client_approved, q.created_at
               FROM quotations q
               JOIN project_request_companies pc ON pc.id = q.participant_id
               JOIN project_requirements req ON req.id = pc.requirement_id
               JOIN companies c ON c.id = pc.company_id
              WHERE req.project_request_id = $1
                AND q.deleted_at IS NULL AND pc.deleted_at IS NULL AND req.deleted_at IS NULL
              ORDER BY req.name, c.name",
        )
        .bind(project_request_id)
        .fetch_all(pool)
        .await
    }

    /// Save the client-facing summary for a request.
    ///
    /// Re-flags the chosen quotations, upserts the summary row in place and
    /// pushes an Open request to QuotationGenerated. A missing upload keeps
    /// the previously stored document.
    pub async fn save_client_summary(
        pool: &PgPool,
        project_request_id: DbId,
        input: &SaveClientSummary,
    ) -> Result<ClientQuotationSummary, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE quotations q SET is_client_selected = FALSE
               FROM project_request_companies pc
               JOIN project_requirements req ON req.id = pc.requirement_id
              WHERE q.participant_id = pc.id
                AND req.project_request_id = $1
                AND q.deleted_at IS NULL",
        )
        .bind(project_request_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE quotations SET is_client_selected = TRUE
              WHERE id = ANY($1) AND deleted_at IS NULL
                AND participant_id IN (
                    SELECT pc.id FROM project_request_companies pc
                      JOIN project_requirements req ON req.id = pc.requirement_id
                     WHERE req.project_request_id = $2
                )",
        )
        .bind(&input.quotation_ids)
        .bind(project_request_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO client_quotation_summaries
                (project_request_id, price_cents, observations, file_name, file_data)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (project_request_id) WHERE deleted_at IS NULL
             DO UPDATE SET
                price_cents = EXCLUDED.price_cents,
                observations = EXCLUDED.observations,
                file_name = COALESCE(EXCLUDED.file_name, client_quotation_summaries.file_name),
                file_data = COALESCE(EXCLUDED.file_data, client_quotation_summaries.file_data)
             RETURNING {SUMMARY_COLUMNS}"
        );
        let summary = sqlx::query_as::<_, ClientQuotationSummary>(&query)
            .bind(project_request_id)
            .bind(input.price_cents)
            .bind(&input.observations)
            .bind(&input.file_name)
            .bind(&input.file_data)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE project_requests SET status_id = $2
              WHERE id = $1 AND status_id = $3 AND deleted_at IS NULL",
        )
        .bind(project_request_id)
        .bind(ProjectRequestStatus::QuotationGenerated.id())
        .bind(ProjectRequestStatus::Open.id())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(project_request_id, summary_id = summary.id, "saved client summary");
        Ok(summary)
    }

    /// The live summary of a request, without file bytes.
    pub async fn find_summary(
        pool: &PgPool,
        project_request_id: DbId,
    ) -> Result<Option<ClientQuotationSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM client_quotation_summaries
              WHERE project_request_id = $1 AND {NOT_DELETED}"
        );
        sqlx::query_as::<_, ClientQuotationSummary>(&query)
            .bind(project_request_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the summary document for download, if one was uploaded.
    pub async fn fetch_summary_file(
        pool: &PgPool,
        project_request_id: DbId,
    ) -> Result<Option<SummaryFile>, sqlx::Error> {
        sqlx::query_as::<_, SummaryFile>(
            "SELECT file_name, file_data FROM client_quotation_summaries
              WHERE project_request_id = $1 AND deleted_at IS NULL
                AND file_name IS NOT NULL AND file_data IS NOT NULL",
        )
        .bind(project_request_id)
        .fetch_optional(pool)
        .await
    }
}
