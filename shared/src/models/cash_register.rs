//! Cash Register Model

use serde::{Deserialize, Serialize};

/// Register session status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegisterStatus {
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "CLOSED")]
    Closed,
}

impl Default for RegisterStatus {
    fn default() -> Self {
        Self::Open
    }
}

/// Cash register session - operator-scoped running totals by payment
/// method, opened and closed explicitly.
///
/// Totals are updated by read-modify-write during checkout with no
/// optimistic concurrency control; two terminals selling against the
/// same register can lose an update. Known limitation carried over
/// from the system this replaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashRegister {
    pub id: Option<String>,
    pub name: String,
    pub operator_id: Option<String>,
    pub status: RegisterStatus,
    /// Starting cash amount
    pub opening_amount: f64,
    pub cash_total: f64,
    pub card_total: f64,
    pub transfer_total: f64,
    pub transaction_count: i64,
    pub opened_at: i64,
    pub closed_at: Option<i64>,
}

impl CashRegister {
    pub fn is_open(&self) -> bool {
        self.status == RegisterStatus::Open
    }

    /// Fold one sale into the running totals. Split payments update
    /// both the cash and card columns by their respective amounts.
    pub fn record_sale(&mut self, method: &crate::models::PaymentMethod, total: f64) {
        use crate::models::PaymentMethod;
        match method {
            PaymentMethod::Cash => self.cash_total += total,
            PaymentMethod::Card => self.card_total += total,
            PaymentMethod::Transfer => self.transfer_total += total,
            PaymentMethod::Split { cash, card } => {
                self.cash_total += cash;
                self.card_total += card;
            }
        }
        self.transaction_count += 1;
    }
}
