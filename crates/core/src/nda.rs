//! NDA validity rules.
//!
//! An NDA satisfies a participant only while it is active, not
//! soft-deleted, and unexpired. Repository queries apply the same
//! predicate in SQL for eligibility flags, the entry-status decision on
//! participant creation, and the linkable-NDA lookup; this function is
//! the in-process form, used when a fetched row has to be judged without
//! another round trip. Expiration is compared against a caller-supplied
//! date to keep the rule clock-free.

use chrono::NaiveDate;

/// Whether an NDA document currently satisfies the (client, company) pair.
///
/// An NDA expiring today no longer counts: `expires_at` must be strictly
/// in the future.
pub fn nda_is_valid(
    is_active: bool,
    is_deleted: bool,
    expires_at: NaiveDate,
    today: NaiveDate,
) -> bool {
    is_active && !is_deleted && expires_at > today
}
