//! Error types for the checkout core
//!
//! One taxonomy for the whole pipeline:
//!
//! | Variant | Phase | Caller behavior |
//! |---------|-------|-----------------|
//! | `EmptyCart` / `InsufficientPayment` / `NoOpenRegister` / `Validation` | before any I/O | block the action inline |
//! | `RemoteWrite` | online write sequence | recoverable, cart preserved for retry |
//! | `Sync` | queue replay | sale stays queued, retried on next reconcile |
//! | `Storage` | local cache | logged and degraded, never fatal |

use thiserror::Error;

pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Checkout pipeline errors
#[derive(Debug, Error)]
pub enum CheckoutError {
    // ========== Validation (no I/O attempted) ==========
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Insufficient payment: tendered {tendered:.2}, required {required:.2}")]
    InsufficientPayment { tendered: f64, required: f64 },

    #[error("No open cash register selected")]
    NoOpenRegister,

    #[error("Validation failed: {0}")]
    Validation(String),

    // ========== Remote ==========
    /// A step of the online write sequence failed. Earlier steps are
    /// not rolled back; the cart is preserved so the operator can retry.
    #[error("Remote write failed at {step}: {message}")]
    RemoteWrite { step: &'static str, message: String },

    /// A queued sale failed to replay. The sale stays queued and
    /// reconciliation of later sales is halted for this run.
    #[error("Sync failed for queued sale {local_id}: {message}")]
    Sync { local_id: String, message: String },

    // ========== Local storage ==========
    #[error("Local storage error: {0}")]
    Storage(String),
}

impl CheckoutError {
    pub fn remote(step: &'static str, message: impl Into<String>) -> Self {
        Self::RemoteWrite {
            step,
            message: message.into(),
        }
    }

    pub fn sync(local_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sync {
            local_id: local_id.into(),
            message: message.into(),
        }
    }

    /// True for errors the operator can retry without losing the sale
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RemoteWrite { .. } | Self::Sync { .. })
    }
}
