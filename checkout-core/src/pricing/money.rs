//! Money calculation utilities using rust_decimal for precision
//!
//! Monetary values are `f64` at model and API boundaries; every
//! calculation runs on `Decimal` and is rounded back to 2 decimal
//! places, half away from zero.

use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert f64 to Decimal for calculation.
///
/// NaN, infinities and out-of-range values convert to zero, so
/// malformed inputs degrade to "no contribution" instead of panicking.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Check if payment covers the required amount (within 0.01 tolerance)
pub fn is_payment_sufficient(tendered: f64, required: f64) -> bool {
    to_decimal(tendered) >= to_decimal(required) - MONEY_TOLERANCE
}

/// Loyalty points earned by a sale: floor(total / 10).
///
/// Negative or malformed totals earn nothing.
pub fn loyalty_points_earned(total: f64) -> i64 {
    let total = to_decimal(total);
    if total <= Decimal::ZERO {
        return 0;
    }
    (total / Decimal::TEN).floor().to_i64().unwrap_or(0)
}
