//! User account model and DTOs.

use alianza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role_id: DbId,
    /// Set for associate accounts; scopes what they can see.
    pub company_id: Option<DbId>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// User joined with its role name, as listed in the admin panel.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserWithRole {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub company_id: Option<DbId>,
    pub company_name: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// The slice of a user loaded on every authenticated request.
#[derive(Debug, Clone, FromRow)]
pub struct AuthContext {
    pub id: DbId,
    pub username: String,
    pub role: String,
    pub company_id: Option<DbId>,
    pub is_active: bool,
}

/// DTO for inserting a user. The password hash is computed by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub company_id: Option<DbId>,
}

/// DTO for updating a user. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub role_id: Option<DbId>,
    pub company_id: Option<DbId>,
    pub is_active: Option<bool>,
}
