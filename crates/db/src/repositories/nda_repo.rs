//! Repository for client/company NDAs.
//!
//! BYTEA columns stay out of the shared column list; downloads fetch them
//! through the dedicated file methods.

use alianza_core::types::DbId;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::nda::{Nda, NdaFile};
use crate::soft_delete::{self, NOT_DELETED};

const COLUMNS: &str = "id, client_id, company_id, file_name, expires_at, signed_file_name, \
     signed_at, is_active, deleted_at, created_at, updated_at";

/// Provides NDA lifecycle operations.
pub struct NdaRepo;

impl NdaRepo {
    /// Store a freshly uploaded NDA document.
    pub async fn create(
        pool: &PgPool,
        client_id: DbId,
        company_id: DbId,
        file_name: &str,
        file_data: &[u8],
        expires_at: NaiveDate,
    ) -> Result<Nda, sqlx::Error> {
        let query = format!(
            "INSERT INTO client_company_ndas (client_id, company_id, file_name, file_data, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Nda>(&query)
            .bind(client_id)
            .bind(company_id)
            .bind(file_name)
            .bind(file_data)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find an NDA by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Nda>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM client_company_ndas WHERE id = $1 AND {NOT_DELETED}");
        sqlx::query_as::<_, Nda>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The newest live NDA between a client and a company, expired or not.
    pub async fn find_latest_for_pair(
        pool: &PgPool,
        client_id: DbId,
        company_id: DbId,
    ) -> Result<Option<Nda>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM client_company_ndas
              WHERE client_id = $1 AND company_id = $2 AND {NOT_DELETED}
              ORDER BY created_at DESC, id DESC
              LIMIT 1"
        );
        sqlx::query_as::<_, Nda>(&query)
            .bind(client_id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// The newest NDA between a client and a company that is still valid:
    /// active, live and unexpired.
    pub async fn find_valid_for_pair(
        pool: &PgPool,
        client_id: DbId,
        company_id: DbId,
    ) -> Result<Option<Nda>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM client_company_ndas
              WHERE client_id = $1 AND company_id = $2 AND {NOT_DELETED}
                AND is_active AND expires_at > CURRENT_DATE
              ORDER BY created_at DESC, id DESC
              LIMIT 1"
        );
        sqlx::query_as::<_, Nda>(&query)
            .bind(client_id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// List the live NDAs of one company across all clients.
    pub async fn list_for_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<Nda>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM client_company_ndas
              WHERE company_id = $1 AND {NOT_DELETED}
              ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Nda>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Attach the signed document, stamping `signed_at`.
    pub async fn attach_signed(
        pool: &PgPool,
        id: DbId,
        file_name: &str,
        file_data: &[u8],
    ) -> Result<Option<Nda>, sqlx::Error> {
        let query = format!(
            "UPDATE client_company_ndas SET
                signed_file_name = $2,
                signed_file_data = $3,
                signed_at = NOW()
             WHERE id = $1 AND {NOT_DELETED}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Nda>(&query)
            .bind(id)
            .bind(file_name)
            .bind(file_data)
            .fetch_optional(pool)
            .await
    }

    /// Drop the signed document, e.g. when the wrong file was uploaded.
    pub async fn clear_signed(pool: &PgPool, id: DbId) -> Result<Option<Nda>, sqlx::Error> {
        let query = format!(
            "UPDATE client_company_ndas SET
                signed_file_name = NULL,
                signed_file_data = NULL,
                signed_at = NULL
             WHERE id = $1 AND {NOT_DELETED}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Nda>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the original document for download.
    pub async fn fetch_original_file(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<NdaFile>, sqlx::Error> {
        sqlx::query_as::<_, NdaFile>(
            "SELECT file_name, file_data FROM client_company_ndas
              WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Fetch the signed document for download, if one was uploaded.
    pub async fn fetch_signed_file(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<NdaFile>, sqlx::Error> {
        sqlx::query_as::<_, NdaFile>(
            "SELECT signed_file_name AS file_name, signed_file_data AS file_data
               FROM client_company_ndas
              WHERE id = $1 AND deleted_at IS NULL
                AND signed_file_name IS NOT NULL AND signed_file_data IS NOT NULL",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Soft-delete an NDA. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::soft_delete_in(pool, "client_company_ndas", id).await
    }
}
