//! Repository for the `users` table.

use alianza_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{AuthContext, CreateUser, UpdateUser, User, UserWithRole};
use crate::soft_delete::{self, NOT_DELETED};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, role_id, company_id, \
     failed_login_count, locked_until, last_login_at, is_active, deleted_at, \
     created_at, updated_at";

const WITH_ROLE_COLUMNS: &str = "u.id, u.username, u.email, r.name AS role, u.company_id, \
     c.name AS company_name, u.is_active, u.last_login_at, u.created_at";

/// Provides account operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, role_id, company_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .bind(input.company_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND {NOT_DELETED}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username. Excludes soft-deleted rows.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1 AND {NOT_DELETED}");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Load the per-request authentication slice: user plus role name.
    pub async fn auth_context(pool: &PgPool, id: DbId) -> Result<Option<AuthContext>, sqlx::Error> {
        sqlx::query_as::<_, AuthContext>(
            "SELECT u.id, u.username, r.name AS role, u.company_id, u.is_active
               FROM users u
               JOIN roles r ON r.id = u.role_id
              WHERE u.id = $1 AND u.deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List all users with their role and company names.
    pub async fn list_with_roles(pool: &PgPool) -> Result<Vec<UserWithRole>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_ROLE_COLUMNS}
               FROM users u
               JOIN roles r ON r.id = u.role_id
               LEFT JOIN companies c ON c.id = u.company_id
              WHERE u.deleted_at IS NULL
              ORDER BY u.username"
        );
        sqlx::query_as::<_, UserWithRole>(&query)
            .fetch_all(pool)
            .await
    }

    /// List the users attached to one company (its staff accounts).
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<UserWithRole>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_ROLE_COLUMNS}
               FROM users u
               JOIN roles r ON r.id = u.role_id
               LEFT JOIN companies c ON c.id = u.company_id
              WHERE u.company_id = $1 AND u.deleted_at IS NULL
              ORDER BY u.username"
        );
        sqlx::query_as::<_, UserWithRole>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                role_id = COALESCE($3, role_id),
                company_id = COALESCE($4, company_id),
                is_active = COALESCE($5, is_active)
             WHERE id = $1 AND {NOT_DELETED}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(input.role_id)
            .bind(input.company_id)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Replace the stored password hash. Returns `true` if a row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("UPDATE users SET password_hash = $2 WHERE id = $1 AND {NOT_DELETED}");
        let result = sqlx::query(&query)
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bump the failed-login counter, returning the new value.
    pub async fn record_failed_attempt(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE users SET failed_login_count = failed_login_count + 1
              WHERE id = $1 AND deleted_at IS NULL
              RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Lock the account until the given time.
    pub async fn lock_account(pool: &PgPool, id: DbId, until: Timestamp) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2 WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reset the lockout state and record a successful login.
    pub async fn clear_login_state(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET failed_login_count = 0, locked_until = NULL, last_login_at = NOW()
              WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Soft-delete a user. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::soft_delete_in(pool, "users", id).await
    }
}
