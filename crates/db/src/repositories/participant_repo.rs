//! Repository for participant assignments (`project_request_companies`).

use alianza_core::status::ParticipantStatus;
use alianza_core::types::{DbId, StatusId};
use sqlx::PgPool;

use crate::models::participant::{
    AssignedCompaniesFilter, AssignedCompanyRow, EligibleCompany, Participant, ParticipantContext,
    ParticipantDetail, SyncOutcome,
};
use crate::soft_delete::NOT_DELETED;

const COLUMNS: &str = "id, requirement_id, company_id, status_id, nda_id, is_active, \
     deleted_at, created_at, updated_at";

/// Shared WHERE clause of the assignment listing and its count query.
/// Parameters: $1 company, $2 status, $3 excluded statuses, $4 search term.
const ASSIGNED_FILTER: &str = "pc.deleted_at IS NULL
        AND req.deleted_at IS NULL
        AND pr.deleted_at IS NULL
        AND ($1::BIGINT IS NULL OR pc.company_id = $1)
        AND ($2::SMALLINT IS NULL OR pc.status_id = $2)
        AND ($3::SMALLINT[] IS NULL OR pc.status_id <> ALL($3))
        AND ($4::TEXT IS NULL
             OR c.name ILIKE '%' || $4 || '%'
             OR req.name ILIKE '%' || $4 || '%'
             OR pr.title ILIKE '%' || $4 || '%')";

const ASSIGNED_JOINS: &str = "FROM project_request_companies pc
       JOIN companies c ON c.id = pc.company_id
       JOIN participant_statuses ps ON ps.id = pc.status_id
       JOIN project_requirements req ON req.id = pc.requirement_id
       JOIN project_requests pr ON pr.id = req.project_request_id
       JOIN client_areas ca ON ca.id = pr.client_area_id
       JOIN clients cl ON cl.id = ca.client_id";

/// Provides assignment operations: eligibility, selection sync, workflow
/// status moves and the cross-project listing.
pub struct ParticipantRepo;

impl ParticipantRepo {
    /// Find a participant by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Participant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_request_companies WHERE id = $1 AND {NOT_DELETED}"
        );
        sqlx::query_as::<_, Participant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a participant's position in the hierarchy up to the client.
    pub async fn find_context(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ParticipantContext>, sqlx::Error> {
        sqlx::query_as::<_, ParticipantContext>(
            "SELECT pc.id, pc.requirement_id, pr.id AS project_request_id,
                    ca.client_id, pc.company_id, pc.status_id, pc.nda_id
               FROM project_request_companies pc
               JOIN project_requirements req ON req.id = pc.requirement_id
               JOIN project_requests pr ON pr.id = req.project_request_id
               JOIN client_areas ca ON ca.id = pr.client_area_id
              WHERE pc.id = $1 AND pc.deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// The client a requirement ultimately belongs to.
    pub async fn client_for_requirement(
        pool: &PgPool,
        requirement_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT ca.client_id
               FROM project_requirements req
               JOIN project_requests pr ON pr.id = req.project_request_id
               JOIN client_areas ca ON ca.id = pr.client_area_id
              WHERE req.id = $1 AND req.deleted_at IS NULL",
        )
        .bind(requirement_id)
        .fetch_optional(pool)
        .await
    }

    /// Rank every active company as a candidate for a requirement.
    ///
    /// Match counts compare the company's catalogs against what the
    /// requirement demands. NDA flags describe the newest valid NDA between
    /// the company and the requirement's client; expired, inactive or
    /// deleted NDAs do not count.
    pub async fn eligible_companies(
        pool: &PgPool,
        requirement_id: DbId,
        client_id: DbId,
    ) -> Result<Vec<EligibleCompany>, sqlx::Error> {
        sqlx::query_as::<_, EligibleCompany>(
            "SELECT c.id AS company_id,
                    c.name,
                    (SELECT COUNT(*) FROM company_specialties cs
                      WHERE cs.company_id = c.id AND cs.deleted_at IS NULL
                        AND cs.specialty_id IN
                            (SELECT specialty_id FROM requirement_specialties
                              WHERE requirement_id = $1 AND deleted_at IS NULL)
                    ) AS matching_specialties,
                    (SELECT COUNT(*) FROM company_certifications cc
                      WHERE cc.company_id = c.id AND cc.deleted_at IS NULL
                        AND cc.certification_id IN
                            (SELECT certification_id FROM requirement_certifications
                              WHERE requirement_id = $1 AND deleted_at IS NULL)
                    ) AS matching_certifications,
                    (n.id IS NOT NULL) AS has_nda,
                    (n.signed_at IS NOT NULL) AS has_signed_nda,
                    n.file_name AS nda_file_name,
                    (pc.id IS NOT NULL) AS already_assigned
               FROM companies c
               LEFT JOIN LATERAL (
                    SELECT id, signed_at, file_name FROM client_company_ndas
                     WHERE company_id = c.id AND client_id = $2
                       AND deleted_at IS NULL AND is_active AND expires_at > CURRENT_DATE
                     ORDER BY created_at DESC, id DESC
                     LIMIT 1
               ) n ON TRUE
               LEFT JOIN project_request_companies pc
                 ON pc.company_id = c.id AND pc.requirement_id = $1 AND pc.deleted_at IS NULL
              WHERE c.deleted_at IS NULL AND c.is_active
              ORDER BY matching_specialties DESC, matching_certifications DESC, c.name",
        )
        .bind(requirement_id)
        .bind(client_id)
        .fetch_all(pool)
        .await
    }

    /// Make the live assignment set of a requirement equal `company_ids`.
    ///
    /// Companies absent from the list are soft-deleted; new companies are
    /// inserted at their entry status, which is NdaSigned when the client
    /// already holds a valid NDA with them and Selected otherwise. Companies
    /// already assigned keep their current status untouched.
    pub async fn sync_selection(
        pool: &PgPool,
        requirement_id: DbId,
        client_id: DbId,
        company_ids: &[DbId],
    ) -> Result<SyncOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Vec<DbId> = sqlx::query_scalar(
            "SELECT company_id FROM project_request_companies
              WHERE requirement_id = $1 AND deleted_at IS NULL",
        )
        .bind(requirement_id)
        .fetch_all(&mut *tx)
        .await?;

        let removed = sqlx::query(
            "UPDATE project_request_companies SET deleted_at = NOW()
              WHERE requirement_id = $1 AND deleted_at IS NULL AND company_id <> ALL($2)",
        )
        .bind(requirement_id)
        .bind(company_ids)
        .execute(&mut *tx)
        .await?
        .rows_affected() as usize;

        let mut added = 0;
        for &company_id in company_ids {
            if current.contains(&company_id) {
                continue;
            }
            let nda_id: Option<DbId> = sqlx::query_scalar(
                "SELECT id FROM client_company_ndas
                  WHERE client_id = $1 AND company_id = $2
                    AND deleted_at IS NULL AND is_active AND expires_at > CURRENT_DATE
                  ORDER BY created_at DESC, id DESC
                  LIMIT 1",
            )
            .bind(client_id)
            .bind(company_id)
            .fetch_optional(&mut *tx)
            .await?;

            let entry = ParticipantStatus::entry(nda_id.is_some());
            sqlx::query(
                "INSERT INTO project_request_companies (requirement_id, company_id, status_id, nda_id)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(requirement_id)
            .bind(company_id)
            .bind(entry.id())
            .bind(nda_id)
            .execute(&mut *tx)
            .await?;
            added += 1;
        }

        tx.commit().await?;

        let kept = current
            .iter()
            .filter(|id| company_ids.contains(id))
            .count();
        tracing::debug!(requirement_id, added, removed, kept, "synced participant selection");
        Ok(SyncOutcome {
            added,
            removed,
            kept,
        })
    }

    /// List the live participants of a requirement with display columns.
    pub async fn list_by_requirement(
        pool: &PgPool,
        requirement_id: DbId,
    ) -> Result<Vec<ParticipantDetail>, sqlx::Error> {
        sqlx::query_as::<_, ParticipantDetail>(
            "SELECT pc.id, pc.requirement_id, pc.company_id, c.name AS company,
                    pc.status_id, ps.name AS status,
                    pc.nda_id, n.file_name AS nda_file_name,
                    (n.signed_at IS NOT NULL) AS nda_signed,
                    q.id AS quotation_id,
                    pc.created_at
               FROM project_request_companies pc
               JOIN companies c ON c.id = pc.company_id
               JOIN participant_statuses ps ON ps.id = pc.status_id
               LEFT JOIN client_company_ndas n ON n.id = pc.nda_id AND n.deleted_at IS NULL
               LEFT JOIN quotations q ON q.participant_id = pc.id AND q.deleted_at IS NULL
              WHERE pc.requirement_id = $1 AND pc.deleted_at IS NULL
              ORDER BY c.name",
        )
        .bind(requirement_id)
        .fetch_all(pool)
        .await
    }

    /// One participant with its display columns.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ParticipantDetail>, sqlx::Error> {
        sqlx::query_as::<_, ParticipantDetail>(
            "SELECT pc.id, pc.requirement_id, pc.company_id, c.name AS company,
                    pc.status_id, ps.name AS status,
                    pc.nda_id, n.file_name AS nda_file_name,
                    (n.signed_at IS NOT NULL) AS nda_signed,
                    q.id AS quotation_id,
                    pc.created_at
               FROM project_request_companies pc
               JOIN companies c ON c.id = pc.company_id
               JOIN participant_statuses ps ON ps.id = pc.status_id
               LEFT JOIN client_company_ndas n ON n.id = pc.nda_id AND n.deleted_at IS NULL
               LEFT JOIN quotations q ON q.participant_id = pc.id AND q.deleted_at IS NULL
              WHERE pc.id = $1 AND pc.deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Move a participant from one status to another. The `from` guard makes
    /// the update a no-op when another writer got there first.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        from: StatusId,
        to: StatusId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE project_request_companies SET status_id = $3
              WHERE id = $1 AND status_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Point a participant at an NDA, or detach it with `None`.
    pub async fn link_nda(
        pool: &PgPool,
        id: DbId,
        nda_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE project_request_companies SET nda_id = $2
              WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(nda_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a company participates anywhere in a project request.
    pub async fn company_in_request(
        pool: &PgPool,
        project_request_id: DbId,
        company_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM project_request_companies pc
                  JOIN project_requirements req ON req.id = pc.requirement_id
                 WHERE req.project_request_id = $1 AND pc.company_id = $2
                   AND pc.deleted_at IS NULL AND req.deleted_at IS NULL
             )",
        )
        .bind(project_request_id)
        .bind(company_id)
        .fetch_one(pool)
        .await
    }

    /// One page of the cross-project assignment listing.
    pub async fn list_assigned(
        pool: &PgPool,
        filter: &AssignedCompaniesFilter,
    ) -> Result<Vec<AssignedCompanyRow>, sqlx::Error> {
        let query = format!(
            "SELECT pc.id, pc.company_id, c.name AS company,
                    pc.status_id, ps.name AS status,
                    pc.requirement_id, req.name AS requirement,
                    pr.id AS project_request_id, pr.title AS project_request,
                    cl.name AS client,
                    pc.nda_id, q.id AS quotation_id, pc.created_at
               {ASSIGNED_JOINS}
               LEFT JOIN quotations q ON q.participant_id = pc.id AND q.deleted_at IS NULL
              WHERE {ASSIGNED_FILTER}
              ORDER BY pc.created_at DESC, pc.id DESC
              LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, AssignedCompanyRow>(&query)
            .bind(filter.company_id)
            .bind(filter.status_id)
            .bind(&filter.exclude_statuses)
            .bind(&filter.search)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Total rows the assignment listing would return unpaginated.
    pub async fn count_assigned(
        pool: &PgPool,
        filter: &AssignedCompaniesFilter,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) {ASSIGNED_JOINS} WHERE {ASSIGNED_FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(filter.company_id)
            .bind(filter.status_id)
            .bind(&filter.exclude_statuses)
            .bind(&filter.search)
            .fetch_one(pool)
            .await
    }
}
