//! Offline-capable checkout core
//!
//! The consistency mechanism that lets point-of-sale operation continue
//! without network connectivity: sales completed offline are queued
//! durably on the terminal and replayed against the remote store
//! exactly once each when connectivity returns, while cart pricing,
//! discount selection and payment-split arithmetic stay consistent in
//! both modes.
//!
//! # Components
//!
//! | Module | Role |
//! |--------|------|
//! | [`pricing`] | pure subtotal / best-discount / total computation |
//! | [`checkout`] | per-sale orchestration: validate, then submit online or enqueue offline |
//! | [`sync`] | connectivity monitor, queue reconciler and background worker |
//! | [`store`] | durable local cache (redb) and the remote row-store client |

pub mod checkout;
pub mod config;
pub mod pricing;
pub mod store;
pub mod sync;
pub mod utils;

// Re-exports
pub use checkout::{CheckoutOrchestrator, SaleRequest};
pub use config::Config;
pub use pricing::{compute_totals, Totals};
pub use store::{HttpRemoteStore, MemoryRemoteStore, OfflineStore, RemoteStore, RemoteWriter};
pub use sync::{ConnectivityMonitor, SyncEvent, SyncReconciler, SyncReport, SyncWorker};
