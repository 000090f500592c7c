//! SyncWorker - background task that reconciles on reconnect
//!
//! Subscribes to the connectivity monitor and invokes the reconciler
//! on every transition to online. Reconcile is idempotent, so signal
//! flapping at worst triggers redundant no-ops.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::connectivity::ConnectivityMonitor;
use super::reconciler::SyncReconciler;

pub struct SyncWorker {
    connectivity: ConnectivityMonitor,
    reconciler: Arc<SyncReconciler>,
    shutdown: CancellationToken,
}

impl SyncWorker {
    pub fn new(
        connectivity: ConnectivityMonitor,
        reconciler: Arc<SyncReconciler>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            connectivity,
            reconciler,
            shutdown,
        }
    }

    /// Run the sync worker
    ///
    /// 1. Attempt a reconcile on startup if already online (the queue
    ///    may hold sales from a previous process run)
    /// 2. Reconcile on every offline -> online transition
    pub async fn run(self) {
        tracing::info!("SyncWorker started");

        let mut connectivity_rx = self.connectivity.subscribe();

        if self.connectivity.is_online() {
            self.try_reconcile().await;
        }

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("SyncWorker shutting down");
                    break;
                }

                changed = connectivity_rx.changed() => {
                    if changed.is_err() {
                        tracing::info!("Connectivity channel closed, SyncWorker stopping");
                        break;
                    }
                    let online = *connectivity_rx.borrow_and_update();
                    if online {
                        self.try_reconcile().await;
                    }
                }
            }
        }

        tracing::info!("SyncWorker stopped");
    }

    async fn try_reconcile(&self) {
        if let Err(e) = self.reconciler.reconcile().await {
            // The failed sale and everything after it stay queued;
            // the next transition to online retries them
            tracing::warn!("Reconciliation incomplete: {e}");
        }
    }
}
