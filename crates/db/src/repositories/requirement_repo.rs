//! Repository for project requirements and their catalog links.

use alianza_core::types::DbId;
use sqlx::PgPool;

use crate::models::requirement::{
    CertificationSelection, CreateRequirement, ProjectRequirement, RequirementCertification,
    RequirementSpecialty, SpecialtySelection, UpdateRequirement,
};
use crate::soft_delete::{self, NOT_DELETED};

const COLUMNS: &str = "id, project_request_id, name, description, is_active, deleted_at, \
     created_at, updated_at";

/// Provides CRUD and catalog-link operations for requirements.
pub struct RequirementRepo;

impl RequirementRepo {
    /// Insert a new requirement under a request, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_request_id: DbId,
        input: &CreateRequirement,
    ) -> Result<ProjectRequirement, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_requirements (project_request_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRequirement>(&query)
            .bind(project_request_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a requirement by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectRequirement>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM project_requirements WHERE id = $1 AND {NOT_DELETED}");
        sqlx::query_as::<_, ProjectRequirement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the live requirements of one request.
    pub async fn list_for_request(
        pool: &PgPool,
        project_request_id: DbId,
    ) -> Result<Vec<ProjectRequirement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_requirements
              WHERE project_request_id = $1 AND {NOT_DELETED}
              ORDER BY created_at"
        );
        sqlx::query_as::<_, ProjectRequirement>(&query)
            .bind(project_request_id)
            .fetch_all(pool)
            .await
    }

    /// Update a requirement. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRequirement,
    ) -> Result<Option<ProjectRequirement>, sqlx::Error> {
        let query = format!(
            "UPDATE project_requirements SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1 AND {NOT_DELETED}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRequirement>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a requirement. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::soft_delete_in(pool, "project_requirements", id).await
    }

    /// Replace the specialties demanded by a requirement.
    ///
    /// Links absent from `selections` are soft-deleted. Present ones have
    /// their observations updated in place; new ones are inserted.
    pub async fn sync_specialties(
        pool: &PgPool,
        requirement_id: DbId,
        selections: &[SpecialtySelection],
    ) -> Result<(), sqlx::Error> {
        let ids: Vec<DbId> = selections.iter().map(|s| s.specialty_id).collect();
        let mut tx = pool.begin().await?;
        sqlx::query(
            "UPDATE requirement_specialties SET deleted_at = NOW()
              WHERE requirement_id = $1 AND deleted_at IS NULL AND specialty_id <> ALL($2)",
        )
        .bind(requirement_id)
        .bind(&ids)
        .execute(&mut *tx)
        .await?;
        for selection in selections {
            sqlx::query(
                "INSERT INTO requirement_specialties (requirement_id, specialty_id, observations)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (requirement_id, specialty_id) WHERE deleted_at IS NULL
                 DO UPDATE SET observations = EXCLUDED.observations",
            )
            .bind(requirement_id)
            .bind(selection.specialty_id)
            .bind(&selection.observations)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await
    }

    /// List the specialties demanded by a requirement.
    pub async fn list_specialties(
        pool: &PgPool,
        requirement_id: DbId,
    ) -> Result<Vec<RequirementSpecialty>, sqlx::Error> {
        sqlx::query_as::<_, RequirementSpecialty>(
            "SELECT rs.id, rs.specialty_id, s.name, rs.observations
               FROM requirement_specialties rs
               JOIN specialties s ON s.id = rs.specialty_id
              WHERE rs.requirement_id = $1 AND rs.deleted_at IS NULL
              ORDER BY s.name",
        )
        .bind(requirement_id)
        .fetch_all(pool)
        .await
    }

    /// Replace the certifications demanded by a requirement.
    pub async fn sync_certifications(
        pool: &PgPool,
        requirement_id: DbId,
        selections: &[CertificationSelection],
    ) -> Result<(), sqlx::Error> {
        let ids: Vec<DbId> = selections.iter().map(|s| s.certification_id).collect();
        let mut tx = pool.begin().await?;
        sqlx::query(
            "UPDATE requirement_certifications SET deleted_at = NOW()
              WHERE requirement_id = $1 AND deleted_at IS NULL AND certification_id <> ALL($2)",
        )
        .bind(requirement_id)
        .bind(&ids)
        .execute(&mut *tx)
        .await?;
        for selection in selections {
            sqlx::query(
                "INSERT INTO requirement_certifications (requirement_id, certification_id, observations)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (requirement_id, certification_id) WHERE deleted_at IS NULL
                 DO UPDATE SET observations = EXCLUDED.observations",
            )
            .bind(requirement_id)
            .bind(selection.certification_id)
            .bind(&selection.observations)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await
    }

    /// List the certifications demanded by a requirement.
    pub async fn list_certifications(
        pool: &PgPool,
        requirement_id: DbId,
    ) -> Result<Vec<RequirementCertification>, sqlx::Error> {
        sqlx::query_as::<_, RequirementCertification>(
            "SELECT rc.id, rc.certification_id, c.name, rc.observations
               FROM requirement_certifications rc
               JOIN certifications c ON c.id = rc.certification_id
              WHERE rc.requirement_id = $1 AND rc.deleted_at IS NULL
              ORDER BY c.name",
        )
        .bind(requirement_id)
        .fetch_all(pool)
        .await
    }
}
