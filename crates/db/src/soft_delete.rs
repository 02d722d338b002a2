//! Centralized soft-deletion helpers.
//!
//! Every entity table carries `deleted_at TIMESTAMPTZ` where NULL means the
//! row is live. Repositories compose read queries with [`NOT_DELETED`] and
//! route deletions through [`soft_delete_in`] so no table ever issues a hard
//! `DELETE`.

use alianza_core::types::DbId;
use sqlx::PgPool;

/// SQL fragment selecting only live rows.
pub(crate) const NOT_DELETED: &str = "deleted_at IS NULL";

/// Mark one live row as deleted. Returns `true` if a row was affected.
pub(crate) async fn soft_delete_in(
    pool: &PgPool,
    table: &str,
    id: DbId,
) -> Result<bool, sqlx::Error> {
    let query = format!("UPDATE {table} SET deleted_at = NOW() WHERE id = $1 AND {NOT_DELETED}");
    let result = sqlx::query(&query).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Bring a soft-deleted row back. Returns `true` if a row was affected.
pub(crate) async fn restore_in(pool: &PgPool, table: &str, id: DbId) -> Result<bool, sqlx::Error> {
    let query = format!("UPDATE {table} SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL");
    let result = sqlx::query(&query).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
