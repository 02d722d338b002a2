//! Well-known role name constants.
//!
//! These must match the seed data in
//! `20260305000001_create_roles_and_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_ASSOCIATE: &str = "associate";

/// Roles acting on behalf of the organization rather than one associate
/// company. Staff-level callers may see and mutate any record; associates
/// are scoped to their own company.
pub fn is_staff_level(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_STAFF
}
