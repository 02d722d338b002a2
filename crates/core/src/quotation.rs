//! Quotation cost arithmetic and validation.
//!
//! All money amounts are integer cents (BIGINT in the database); the API
//! never handles floating-point currency.

use crate::error::CoreError;

/// Total cost of a quotation: material + direct + indirect.
pub fn total_cost_cents(material: i64, direct: i64, indirect: i64) -> i64 {
    material + direct + indirect
}

/// Margin between the quoted price and the total cost. Negative when the
/// participant quoted below cost.
pub fn margin_cents(price: i64, total_cost: i64) -> i64 {
    price - total_cost
}

/// Sum of the selected participant quotations, used to prefill the client
/// summary price.
pub fn summary_total_cents(prices: &[i64]) -> i64 {
    prices.iter().sum()
}

/// Reject negative cost or price figures.
pub fn validate_costs(
    material: i64,
    direct: i64,
    indirect: i64,
    price: i64,
) -> Result<(), CoreError> {
    for (label, value) in [
        ("material_cost", material),
        ("direct_cost", direct),
        ("indirect_cost", indirect),
        ("price", price),
    ] {
        if value < 0 {
            return Err(CoreError::Validation(format!(
                "{label} must not be negative, got {value}"
            )));
        }
    }
    Ok(())
}

/// Delivery segments describe partial deliveries; each must take at least
/// one day.
pub fn validate_delivery_days(days: i32) -> Result<(), CoreError> {
    if days < 1 {
        return Err(CoreError::Validation(format!(
            "delivery_days must be at least 1, got {days}"
        )));
    }
    Ok(())
}
