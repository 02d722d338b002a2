//! Repository for the specialty catalog.

use alianza_core::types::DbId;
use sqlx::PgPool;

use crate::models::specialty::{CreateSpecialty, Specialty, UpdateSpecialty};
use crate::soft_delete::{self, NOT_DELETED};

const COLUMNS: &str = "id, name, description, is_active, deleted_at, created_at, updated_at";

/// Provides CRUD operations for specialties.
pub struct SpecialtyRepo;

impl SpecialtyRepo {
    /// Insert a new specialty, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSpecialty) -> Result<Specialty, sqlx::Error> {
        let query = format!(
            "INSERT INTO specialties (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Specialty>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// List all specialties ordered by name. Excludes soft-deleted rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<Specialty>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM specialties WHERE {NOT_DELETED} ORDER BY name");
        sqlx::query_as::<_, Specialty>(&query).fetch_all(pool).await
    }

    /// Update a specialty. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSpecialty,
    ) -> Result<Option<Specialty>, sqlx::Error> {
        let query = format!(
            "UPDATE specialties SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                is_active = COALESCE($4, is_active)
             WHERE id = $1 AND {NOT_DELETED}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Specialty>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a specialty. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::soft_delete_in(pool, "specialties", id).await
    }

    /// Restore a soft-deleted specialty. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::restore_in(pool, "specialties", id).await
    }
}
