//! Sale Models
//!
//! Rows written during checkout: the sale record, its line items and
//! the stock movements for catalog lines. Ad-hoc lines persist with a
//! `None` product reference and never generate a stock movement.

use serde::{Deserialize, Serialize};

use crate::cart::CartLine;

/// Payment method for a sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    /// Operator-entered split between cash and card; the sum is
    /// validated against the sale total before completion
    Split { cash: f64, card: f64 },
}

impl PaymentMethod {
    /// Total tendered. Single methods cover the sale by definition,
    /// so only `Split` carries explicit amounts.
    pub fn tendered(&self, total: f64) -> f64 {
        match self {
            Self::Split { cash, card } => cash + card,
            _ => total,
        }
    }

    /// Stable label stored on the sale row
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Transfer => "transfer",
            Self::Split { .. } => "split",
        }
    }
}

/// Sale status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleStatus {
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "voided")]
    Voided,
}

/// Sale row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Option<String>,
    pub customer_id: Option<String>,
    pub register_id: Option<String>,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub applied_rule_id: Option<String>,
    pub total: f64,
    /// Payment method label, see [`PaymentMethod::label`]
    pub payment_method: String,
    pub status: SaleStatus,
    pub created_at: i64,
}

/// Sale line item row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: Option<String>,
    pub sale_id: String,
    /// `None` for ad-hoc lines entered by name/price at the till
    pub product_id: Option<String>,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub line_total: f64,
}

/// Stock movement row (sale decrements)
///
/// `previous_stock` is the snapshot value captured when the line was
/// added to the cart, not a live read. Replaying a queued sale keeps
/// exactly the before/after the offline UI displayed; concurrent
/// changes from other terminals are not reconciled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Option<String>,
    pub product_id: String,
    pub sale_id: String,
    /// Units removed (positive)
    pub quantity: u32,
    pub previous_stock: i64,
    pub new_stock: i64,
    pub reason: String,
    pub created_at: i64,
}

/// Receipt handed back to the caller after `submit_sale`.
///
/// For offline sales `sale_id` is the client-generated local ID and
/// `offline` is true; no server-assigned ID exists yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub sale_id: String,
    pub offline: bool,
    pub lines: Vec<CartLine>,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub total: f64,
    pub payment_method: PaymentMethod,
    pub created_at: i64,
}
