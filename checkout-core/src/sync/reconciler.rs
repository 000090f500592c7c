//! Queue reconciliation
//!
//! Replays queued offline sales against the remote store in strict
//! FIFO order. Each sale is removed from the queue only after its full
//! write sequence succeeded, so a sale is synced at most once; a
//! failure halts the run and leaves the failed sale and everything
//! after it queued for the next attempt.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

use shared::models::{Sale, SaleStatus};
use shared::util::now_millis;
use shared::{CheckoutError, CheckoutResult, PendingSale};

use crate::store::{OfflineStore, RemoteWriter};

/// Progress notifications for subscribers (UI badges, logs)
#[derive(Debug, Clone)]
pub enum SyncEvent {
    Started { queued: usize },
    SaleSynced { local_id: String, remote_id: String },
    SaleFailed { local_id: String, message: String },
    Finished { synced: usize, remaining: usize },
}

/// Outcome of one `reconcile` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub remaining: usize,
    /// True when another run was already in flight and this call did
    /// nothing
    pub skipped: bool,
}

/// Drains the pending-sale queue when connectivity allows
pub struct SyncReconciler {
    remote: RemoteWriter,
    offline: Arc<OfflineStore>,
    in_flight: AtomicBool,
    events: broadcast::Sender<SyncEvent>,
}

impl SyncReconciler {
    pub fn new(remote: RemoteWriter, offline: Arc<OfflineStore>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            remote,
            offline,
            in_flight: AtomicBool::new(false),
            events,
        }
    }

    /// Subscribe to sync progress events
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: SyncEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Replay the queue, oldest sale first.
    ///
    /// Safe to call redundantly: an empty queue is a no-op and at most
    /// one run executes at a time - a call made while another run is in
    /// flight returns immediately with `skipped` set.
    pub async fn reconcile(&self) -> CheckoutResult<SyncReport> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Ok(SyncReport {
                skipped: true,
                ..Default::default()
            });
        }

        let result = self.drain_queue().await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn drain_queue(&self) -> CheckoutResult<SyncReport> {
        let queue = self
            .offline
            .pending_sales()
            .map_err(|e| CheckoutError::Storage(e.to_string()))?;
        if queue.is_empty() {
            return Ok(SyncReport::default());
        }

        tracing::info!(queued = queue.len(), "Reconciling offline sale queue");
        self.emit(SyncEvent::Started {
            queued: queue.len(),
        });

        let total = queue.len();
        let mut synced = 0usize;

        for sale in queue {
            match self.replay(&sale).await {
                Ok(remote_id) => {
                    // Dequeue only after the full write sequence landed
                    self.offline
                        .remove_pending(&sale)
                        .map_err(|e| CheckoutError::Storage(e.to_string()))?;
                    synced += 1;
                    tracing::info!(
                        local_id = %sale.local_id,
                        remote_id = %remote_id,
                        "Offline sale synced"
                    );
                    self.emit(SyncEvent::SaleSynced {
                        local_id: sale.local_id.clone(),
                        remote_id,
                    });
                }
                Err(e) => {
                    // Stop, do not skip ahead: later sales wait for the
                    // next run so chronological order holds remotely
                    let remaining = total - synced;
                    tracing::warn!(
                        local_id = %sale.local_id,
                        remaining,
                        "Sync halted: {e}"
                    );
                    self.emit(SyncEvent::SaleFailed {
                        local_id: sale.local_id.clone(),
                        message: e.to_string(),
                    });
                    self.emit(SyncEvent::Finished { synced, remaining });
                    return Err(CheckoutError::sync(sale.local_id.clone(), e.to_string()));
                }
            }
        }

        self.offline.set_last_sync(now_millis());
        self.emit(SyncEvent::Finished {
            synced,
            remaining: 0,
        });
        Ok(SyncReport {
            synced,
            remaining: 0,
            skipped: false,
        })
    }

    /// Replay one queued sale: sale record, line items, stock
    /// movements from the add-time snapshots.
    async fn replay(&self, pending: &PendingSale) -> Result<String, crate::store::WriteStepError> {
        let sale = Sale {
            id: None,
            customer_id: pending.customer_id.clone(),
            register_id: None,
            subtotal: pending.subtotal,
            discount_amount: pending.discount_amount,
            applied_rule_id: None,
            total: pending.total,
            payment_method: pending.payment_method.label().to_string(),
            status: SaleStatus::Completed,
            created_at: pending.enqueued_at,
        };
        self.remote.write_sale_sequence(&sale, &pending.lines).await
    }
}
