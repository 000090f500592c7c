//! Discount Rule Model

use serde::{Deserialize, Serialize};

/// Discount kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountKind {
    #[serde(rename = "percentage")]
    Percentage,
    #[serde(rename = "fixed")]
    Fixed,
}

/// Discount rule entity
///
/// A rule applies to a cart only if it is active, the current time is
/// inside its validity window (when one is set) and the cart subtotal
/// reaches `minimum_purchase`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountRule {
    pub id: Option<String>,
    pub name: String,
    pub kind: DiscountKind,
    /// Percent (0-100) for `Percentage`, absolute amount for `Fixed`
    pub value: f64,
    /// Subtotal threshold below which the rule never applies
    #[serde(default)]
    pub minimum_purchase: f64,
    /// Cap on the computed discount; only meaningful for `Percentage`
    pub maximum_discount_amount: Option<f64>,
    pub is_active: bool,
    /// Validity window start (UTC millis), open-ended when `None`
    pub valid_from: Option<i64>,
    /// Validity window end (UTC millis), open-ended when `None`
    pub valid_until: Option<i64>,
    /// Times this rule has been applied to a completed sale
    #[serde(default)]
    pub usage_count: i64,
}

impl DiscountRule {
    /// Applicability filter: active, inside window, threshold reached
    pub fn applies(&self, subtotal: f64, now_ms: i64) -> bool {
        if !self.is_active {
            return false;
        }
        if let Some(from) = self.valid_from {
            if now_ms < from {
                return false;
            }
        }
        if let Some(until) = self.valid_until {
            if now_ms > until {
                return false;
            }
        }
        subtotal >= self.minimum_purchase
    }
}
