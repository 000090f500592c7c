//! Connectivity monitor
//!
//! A thin wrapper over a watch channel. The host runtime feeds its
//! native online/offline signal into `set_online`; the orchestrator
//! reads the current value, the sync worker subscribes to changes.
//! State is never persisted - it is re-derived from the live signal at
//! process start.

use std::sync::Arc;
use tokio::sync::watch;

/// Current connectivity plus change notifications
#[derive(Clone)]
pub struct ConnectivityMonitor {
    tx: Arc<watch::Sender<bool>>,
}

impl ConnectivityMonitor {
    /// Create a monitor seeded with the runtime's current signal
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self { tx: Arc::new(tx) }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Report a signal change. Duplicate reports are dropped, so rapid
    /// flapping collapses to the transitions that actually happened.
    pub fn set_online(&self, online: bool) {
        self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                tracing::info!(online, "Connectivity changed");
                *current = online;
                true
            }
        });
    }

    /// Subscribe to connectivity changes
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_reports_do_not_notify() {
        let monitor = ConnectivityMonitor::new(true);
        let mut rx = monitor.subscribe();

        monitor.set_online(true);
        assert!(!rx.has_changed().unwrap());

        monitor.set_online(false);
        assert!(rx.has_changed().unwrap());
        assert!(!*rx.borrow_and_update());
    }

    #[tokio::test]
    async fn test_flapping_settles_on_last_value() {
        let monitor = ConnectivityMonitor::new(false);
        monitor.set_online(true);
        monitor.set_online(false);
        monitor.set_online(true);
        assert!(monitor.is_online());
    }
}
