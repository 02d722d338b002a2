//! Repository for associate companies and their catalog links.

use alianza_core::types::DbId;
use sqlx::PgPool;

use crate::models::certification::Certification;
use crate::models::company::{Company, CreateCompany, UpdateCompany};
use crate::models::specialty::Specialty;
use crate::soft_delete::{self, NOT_DELETED};

const COLUMNS: &str = "id, name, legal_name, tax_id, email, phone, address, is_active, \
     deleted_at, created_at, updated_at";

/// Provides CRUD and catalog-link operations for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a new company, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (name, legal_name, tax_id, email, phone, address)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.name)
            .bind(&input.legal_name)
            .bind(&input.tax_id)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }

    /// Find a company by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1 AND {NOT_DELETED}");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all companies ordered by name. Excludes soft-deleted rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE {NOT_DELETED} ORDER BY name");
        sqlx::query_as::<_, Company>(&query).fetch_all(pool).await
    }

    /// Update a company. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCompany,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!(
            "UPDATE companies SET
                name = COALESCE($2, name),
                legal_name = COALESCE($3, legal_name),
                tax_id = COALESCE($4, tax_id),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                address = COALESCE($7, address),
                is_active = COALESCE($8, is_active)
             WHERE id = $1 AND {NOT_DELETED}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.legal_name)
            .bind(&input.tax_id)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a company. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::soft_delete_in(pool, "companies", id).await
    }

    /// Restore a soft-deleted company. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::restore_in(pool, "companies", id).await
    }

    /// Replace the company's specialty set with `specialty_ids`.
    ///
    /// Links absent from the list are soft-deleted; new ones are inserted as
    /// fresh rows. Links already live are left untouched.
    pub async fn set_specialties(
        pool: &PgPool,
        company_id: DbId,
        specialty_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query(
            "UPDATE company_specialties SET deleted_at = NOW()
              WHERE company_id = $1 AND deleted_at IS NULL AND specialty_id <> ALL($2)",
        )
        .bind(company_id)
        .bind(specialty_ids)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "INSERT INTO company_specialties (company_id, specialty_id)
             SELECT $1, sid FROM UNNEST($2::BIGINT[]) AS sid
              WHERE NOT EXISTS (
                  SELECT 1 FROM company_specialties
                   WHERE company_id = $1 AND specialty_id = sid AND deleted_at IS NULL
              )",
        )
        .bind(company_id)
        .bind(specialty_ids)
        .execute(&mut *tx)
        .await?;
        tx.commit().await
    }

    /// List the live specialties of one company.
    pub async fn list_specialties(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<Specialty>, sqlx::Error> {
        sqlx::query_as::<_, Specialty>(
            "SELECT s.id, s.name, s.description, s.is_active, s.deleted_at, s.created_at, s.updated_at
               FROM specialties s
               JOIN company_specialties cs ON cs.specialty_id = s.id AND cs.deleted_at IS NULL
              WHERE cs.company_id = $1 AND s.deleted_at IS NULL
              ORDER BY s.name",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    /// Replace the company's certification set with `certification_ids`.
    pub async fn set_certifications(
        pool: &PgPool,
        company_id: DbId,
        certification_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query(
            "UPDATE company_certifications SET deleted_at = NOW()
              WHERE company_id = $1 AND deleted_at IS NULL AND certification_id <> ALL($2)",
        )
        .bind(company_id)
        .bind(certification_ids)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "INSERT INTO company_certifications (company_id, certification_id)
             SELECT $1, cid FROM UNNEST($2::BIGINT[]) AS cid
              WHERE NOT EXISTS (
                  SELECT 1 FROM company_certifications
                   WHERE company_id = $1 AND certification_id = cid AND deleted_at IS NULL
              )",
        )
        .bind(company_id)
        .bind(certification_ids)
        .execute(&mut *tx)
        .await?;
        tx.commit().await
    }

    /// List the live certifications of one company.
    pub async fn list_certifications(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<Certification>, sqlx::Error> {
        sqlx::query_as::<_, Certification>(
            "SELECT c.id, c.name, c.description, c.is_active, c.deleted_at, c.created_at, c.updated_at
               FROM certifications c
               JOIN company_certifications cc ON cc.certification_id = c.id AND cc.deleted_at IS NULL
              WHERE cc.company_id = $1 AND c.deleted_at IS NULL
              ORDER BY c.name",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }
}
