//! Connectivity and queue reconciliation
//!
//! [`ConnectivityMonitor`] mirrors the runtime's online/offline signal;
//! [`SyncReconciler`] drains the pending-sale queue against the remote
//! store; [`SyncWorker`] wires the two together as a background task.

pub mod connectivity;
pub mod reconciler;
pub mod worker;

pub use connectivity::ConnectivityMonitor;
pub use reconciler::{SyncEvent, SyncReconciler, SyncReport};
pub use worker::SyncWorker;
