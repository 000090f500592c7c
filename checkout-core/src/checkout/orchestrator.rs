//! Checkout orchestrator
//!
//! Decides, per sale, whether to submit directly to the remote store
//! or enqueue locally. Holds no persistent state of its own across
//! calls beyond reading the connectivity monitor; everything durable
//! lives in the offline store or the remote store.
//!
//! Per-sale flow:
//!
//! ```text
//! IDLE -> VALIDATING -> { ONLINE_SUBMIT | OFFLINE_ENQUEUE } -> COMPLETED
//! ```

use std::sync::Arc;

use shared::models::{CashRegister, Customer, PaymentMethod, Sale, SaleReceipt, SaleStatus};
use shared::util::{local_sale_id, now_millis};
use shared::{Cart, CheckoutError, CheckoutResult, PendingSale};

use crate::pricing::{is_payment_sufficient, loyalty_points_earned, Totals};
use crate::store::{OfflineStore, RemoteWriter};
use crate::sync::ConnectivityMonitor;

/// Everything a completed till interaction hands to `submit_sale`.
///
/// `totals` comes from [`crate::pricing::compute_totals`] over the same
/// cart, so receipt arithmetic matches what the operator saw.
#[derive(Debug, Clone)]
pub struct SaleRequest {
    pub cart: Cart,
    pub totals: Totals,
    pub customer: Option<Customer>,
    pub register: Option<CashRegister>,
    pub payment_method: PaymentMethod,
}

/// Per-sale decision point between the online write sequence and the
/// offline queue
pub struct CheckoutOrchestrator {
    remote: RemoteWriter,
    offline: Arc<OfflineStore>,
    connectivity: ConnectivityMonitor,
}

impl CheckoutOrchestrator {
    pub fn new(
        remote: RemoteWriter,
        offline: Arc<OfflineStore>,
        connectivity: ConnectivityMonitor,
    ) -> Self {
        Self {
            remote,
            offline,
            connectivity,
        }
    }

    /// Complete a sale.
    ///
    /// Validation failures return before any I/O. Online, the remote
    /// write sequence runs step by step; a mid-sequence failure
    /// surfaces as a recoverable error with the cart untouched - the
    /// sale is NOT silently re-routed to the offline queue. Offline,
    /// the sale is durably enqueued before the receipt is returned.
    pub async fn submit_sale(&self, request: &SaleRequest) -> CheckoutResult<SaleReceipt> {
        self.validate(request)?;

        if self.connectivity.is_online() {
            self.submit_online(request).await
        } else {
            self.enqueue_offline(request)
        }
    }

    /// Blocking preconditions, checked before any I/O
    fn validate(&self, request: &SaleRequest) -> CheckoutResult<()> {
        if request.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let required = request.totals.total;
        let tendered = request.payment_method.tendered(required);
        if !is_payment_sufficient(tendered, required) {
            return Err(CheckoutError::InsufficientPayment { tendered, required });
        }

        match &request.register {
            Some(register) if register.is_open() => Ok(()),
            _ => Err(CheckoutError::NoOpenRegister),
        }
    }

    async fn submit_online(&self, request: &SaleRequest) -> CheckoutResult<SaleReceipt> {
        let totals = &request.totals;
        let created_at = now_millis();
        let register_id = request
            .register
            .as_ref()
            .and_then(|r| r.id.clone());

        let sale = Sale {
            id: None,
            customer_id: request.customer.as_ref().and_then(|c| c.id.clone()),
            register_id: register_id.clone(),
            subtotal: totals.subtotal,
            discount_amount: totals.discount_amount,
            applied_rule_id: totals.applied_rule.as_ref().and_then(|r| r.id.clone()),
            total: totals.total,
            payment_method: request.payment_method.label().to_string(),
            status: SaleStatus::Completed,
            created_at,
        };

        // Best-effort sequential writes; no compensation if a later
        // step fails (the sale row stays behind and the caller retries)
        let sale_id = self
            .remote
            .write_sale_sequence(&sale, request.cart.lines())
            .await
            .map_err(|e| CheckoutError::remote(e.step, e.source.to_string()))?;

        if let Some(register_id) = register_id.as_deref() {
            self.remote
                .record_register_sale(register_id, &request.payment_method, totals.total)
                .await
                .map_err(|e| CheckoutError::remote(e.step, e.source.to_string()))?;
        }

        if let Some(rule_id) = totals.applied_rule.as_ref().and_then(|r| r.id.as_deref()) {
            self.remote
                .increment_rule_usage(rule_id)
                .await
                .map_err(|e| CheckoutError::remote(e.step, e.source.to_string()))?;
        }

        if let Some(customer) = &request.customer {
            let points = loyalty_points_earned(totals.total);
            self.remote
                .update_customer_loyalty(customer, points, totals.total)
                .await
                .map_err(|e| CheckoutError::remote(e.step, e.source.to_string()))?;
        }

        tracing::info!(sale_id = %sale_id, total = totals.total, "Sale completed online");

        Ok(SaleReceipt {
            sale_id,
            offline: false,
            lines: request.cart.lines().to_vec(),
            subtotal: totals.subtotal,
            discount_amount: totals.discount_amount,
            total: totals.total,
            payment_method: request.payment_method.clone(),
            created_at,
        })
    }

    fn enqueue_offline(&self, request: &SaleRequest) -> CheckoutResult<SaleReceipt> {
        let totals = &request.totals;
        let enqueued_at = now_millis();
        let pending = PendingSale {
            local_id: local_sale_id(),
            lines: request.cart.lines().to_vec(),
            customer_id: request.customer.as_ref().and_then(|c| c.id.clone()),
            subtotal: totals.subtotal,
            discount_amount: totals.discount_amount,
            payment_method: request.payment_method.clone(),
            total: totals.total,
            enqueued_at,
        };

        // Storage failures are logged and swallowed: the cache layer is
        // best-effort by contract, which makes this the one scenario
        // where an offline sale can be lost. Known limitation.
        if let Err(e) = self.offline.enqueue_pending(&pending) {
            tracing::error!(local_id = %pending.local_id, "Failed to enqueue offline sale: {e}");
        } else {
            tracing::info!(
                local_id = %pending.local_id,
                total = totals.total,
                "Sale queued offline"
            );
        }

        // Receipt built entirely from local data; the local id stands
        // in until the sale is replayed
        Ok(SaleReceipt {
            sale_id: pending.local_id,
            offline: true,
            lines: request.cart.lines().to_vec(),
            subtotal: totals.subtotal,
            discount_amount: totals.discount_amount,
            total: totals.total,
            payment_method: request.payment_method.clone(),
            created_at: enqueued_at,
        })
    }

    /// Refresh the offline catalog snapshots from a successful live
    /// fetch. Callers fall back to `OfflineStore::cached_*` when this
    /// fails while offline.
    pub async fn refresh_catalog(&self) -> CheckoutResult<()> {
        let products = self
            .remote
            .fetch_products()
            .await
            .map_err(|e| CheckoutError::remote("fetch_products", e.to_string()))?;
        let customers = self
            .remote
            .fetch_customers()
            .await
            .map_err(|e| CheckoutError::remote("fetch_customers", e.to_string()))?;

        self.offline.cache_products(&products);
        self.offline.cache_customers(&customers);
        Ok(())
    }
}
