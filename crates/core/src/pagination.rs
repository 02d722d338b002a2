//! Pagination constants and clamps shared by repository list queries.
//!
//! Lives in `core` (zero internal deps) so both the API layer and the
//! repositories agree on page bounds.

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of rows per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Convert a 1-based page number into a row offset. Page numbers below 1
/// are treated as page 1.
pub fn page_to_offset(page: Option<i64>, limit: i64) -> i64 {
    (page.unwrap_or(1).max(1) - 1) * limit
}
