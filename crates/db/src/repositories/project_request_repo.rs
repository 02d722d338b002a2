//! Repository for project requests.

use alianza_core::types::{DbId, StatusId};
use sqlx::PgPool;

use crate::models::project_request::{
    CreateProjectRequest, ProjectRequest, ProjectRequestSummary, UpdateProjectRequest,
};
use crate::soft_delete::{self, NOT_DELETED};

const COLUMNS: &str = "id, title, client_area_id, status_id, observations, is_active, \
     deleted_at, created_at, updated_at";

const SUMMARY_COLUMNS: &str = "pr.id, pr.title, pr.status_id, st.name AS status, \
     pr.client_area_id, ca.name AS client_area, cl.id AS client_id, cl.name AS client, \
     pr.created_at";

const SUMMARY_JOINS: &str = "FROM project_requests pr
       JOIN project_request_statuses st ON st.id = pr.status_id
       JOIN client_areas ca ON ca.id = pr.client_area_id
       JOIN clients cl ON cl.id = ca.client_id";

/// Provides CRUD operations for project requests.
pub struct ProjectRequestRepo;

impl ProjectRequestRepo {
    /// Insert a new request. New requests always start as Open.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProjectRequest,
    ) -> Result<ProjectRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_requests (title, client_area_id, observations)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRequest>(&query)
            .bind(&input.title)
            .bind(input.client_area_id)
            .bind(&input.observations)
            .fetch_one(pool)
            .await
    }

    /// Find a request by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectRequest>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM project_requests WHERE id = $1 AND {NOT_DELETED}");
        sqlx::query_as::<_, ProjectRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all requests joined with status, area and client names.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectRequestSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} {SUMMARY_JOINS}
              WHERE pr.deleted_at IS NULL
              ORDER BY pr.created_at DESC"
        );
        sqlx::query_as::<_, ProjectRequestSummary>(&query)
            .fetch_all(pool)
            .await
    }

    /// List the requests one company participates in.
    pub async fn list_for_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<ProjectRequestSummary>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT {SUMMARY_COLUMNS} {SUMMARY_JOINS}
               JOIN project_requirements req
                 ON req.project_request_id = pr.id AND req.deleted_at IS NULL
               JOIN project_request_companies pc
                 ON pc.requirement_id = req.id AND pc.deleted_at IS NULL
              WHERE pc.company_id = $1 AND pr.deleted_at IS NULL
              ORDER BY pr.created_at DESC"
        );
        sqlx::query_as::<_, ProjectRequestSummary>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Update a request. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProjectRequest,
    ) -> Result<Option<ProjectRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE project_requests SET
                title = COALESCE($2, title),
                observations = COALESCE($3, observations),
                status_id = COALESCE($4, status_id)
             WHERE id = $1 AND {NOT_DELETED}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRequest>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.observations)
            .bind(input.status_id)
            .fetch_optional(pool)
            .await
    }

    /// Move a request from one status to another. The `from` guard makes the
    /// update a no-op when another writer got there first.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        from: StatusId,
        to: StatusId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE project_requests SET status_id = $3
              WHERE id = $1 AND status_id = $2 AND {NOT_DELETED}"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a request. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::soft_delete_in(pool, "project_requests", id).await
    }

    /// Restore a soft-deleted request. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::restore_in(pool, "project_requests", id).await
    }
}
