//! Repositories for clients and their areas.

use alianza_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::{
    Client, ClientArea, CreateClient, CreateClientArea, UpdateClient, UpdateClientArea,
};
use crate::soft_delete::{self, NOT_DELETED};

const CLIENT_COLUMNS: &str =
    "id, name, tax_id, email, phone, is_active, deleted_at, created_at, updated_at";

const AREA_COLUMNS: &str = "id, client_id, name, contact_name, contact_email, is_active, \
     deleted_at, created_at, updated_at";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (name, tax_id, email, phone)
             VALUES ($1, $2, $3, $4)
             RETURNING {CLIENT_COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.tax_id)
            .bind(&input.email)
            .bind(&input.phone)
            .fetch_one(pool)
            .await
    }

    /// Find a client by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1 AND {NOT_DELETED}");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all clients ordered by name. Excludes soft-deleted rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<Client>, sqlx::Error> {
        let query =
            format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE {NOT_DELETED} ORDER BY name");
        sqlx::query_as::<_, Client>(&query).fetch_all(pool).await
    }

    /// Update a client. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = COALESCE($2, name),
                tax_id = COALESCE($3, tax_id),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                is_active = COALESCE($6, is_active)
             WHERE id = $1 AND {NOT_DELETED}
             RETURNING {CLIENT_COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.tax_id)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a client. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::soft_delete_in(pool, "clients", id).await
    }

    /// Restore a soft-deleted client. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::restore_in(pool, "clients", id).await
    }
}

/// Provides CRUD operations for client areas.
pub struct ClientAreaRepo;

impl ClientAreaRepo {
    /// Insert a new area under a client, returning the created row.
    pub async fn create(
        pool: &PgPool,
        client_id: DbId,
        input: &CreateClientArea,
    ) -> Result<ClientArea, sqlx::Error> {
        let query = format!(
            "INSERT INTO client_areas (client_id, name, contact_name, contact_email)
             VALUES ($1, $2, $3, $4)
             RETURNING {AREA_COLUMNS}"
        );
        sqlx::query_as::<_, ClientArea>(&query)
            .bind(client_id)
            .bind(&input.name)
            .bind(&input.contact_name)
            .bind(&input.contact_email)
            .fetch_one(pool)
            .await
    }

    /// Find an area by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ClientArea>, sqlx::Error> {
        let query =
            format!("SELECT {AREA_COLUMNS} FROM client_areas WHERE id = $1 AND {NOT_DELETED}");
        sqlx::query_as::<_, ClientArea>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the live areas of one client.
    pub async fn list_for_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<ClientArea>, sqlx::Error> {
        let query = format!(
            "SELECT {AREA_COLUMNS} FROM client_areas
              WHERE client_id = $1 AND {NOT_DELETED} ORDER BY name"
        );
        sqlx::query_as::<_, ClientArea>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Update an area. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClientArea,
    ) -> Result<Option<ClientArea>, sqlx::Error> {
        let query = format!(
            "UPDATE client_areas SET
                name = COALESCE($2, name),
                contact_name = COALESCE($3, contact_name),
                contact_email = COALESCE($4, contact_email),
                is_active = COALESCE($5, is_active)
             WHERE id = $1 AND {NOT_DELETED}
             RETURNING {AREA_COLUMNS}"
        );
        sqlx::query_as::<_, ClientArea>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.contact_name)
            .bind(&input.contact_email)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an area. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::soft_delete_in(pool, "client_areas", id).await
    }
}
