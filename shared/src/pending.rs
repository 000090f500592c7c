//! Pending sale queue entry

use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::models::PaymentMethod;

/// A sale completed while offline, queued for replay.
///
/// Persisted durably before the success receipt is shown, removed only
/// after the full remote write sequence (sale + line items + stock
/// movements) has succeeded. From the client's perspective a pending
/// sale is never half-applied: it is either fully replayed or still
/// queued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingSale {
    /// Client-generated, globally unique, never reused; see
    /// [`crate::util::local_sale_id`]
    pub local_id: String,
    pub lines: Vec<CartLine>,
    pub customer_id: Option<String>,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub payment_method: PaymentMethod,
    pub total: f64,
    /// Enqueue timestamp (UTC millis); replay order is FIFO on this
    pub enqueued_at: i64,
}
