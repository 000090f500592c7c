//! Pricing & discount engine
//!
//! Pure arithmetic over the cart: no I/O, no clock access (the caller
//! passes `now`), deterministic for a given input.

pub mod engine;
pub mod money;

pub use engine::{compute_totals, Totals};
pub use money::{is_payment_sufficient, loyalty_points_earned, to_decimal, to_f64};
