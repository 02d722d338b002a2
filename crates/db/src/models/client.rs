//! Client organization and client area models.

use alianza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A client row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// DTO for updating a client. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

/// An organizational area inside a client, the unit that raises project
/// requests.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClientArea {
    pub id: DbId,
    pub client_id: DbId,
    pub name: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a client area. The client comes from the URL path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClientArea {
    pub name: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
}

/// DTO for updating a client area. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClientArea {
    pub name: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: Option<bool>,
}
