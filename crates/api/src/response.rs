//! Shared response envelope types for API handlers.

use serde::Serialize;

/// Paginated listing envelope: one page of rows plus the unfiltered total.
///
/// `page` is 1-based; `limit` is the page size actually applied after
/// clamping, which may differ from what the caller asked for.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}
