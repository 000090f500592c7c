//! Storage layer
//!
//! Two sides:
//! - [`offline`]: the durable local cache (redb) holding catalog
//!   snapshots and the pending-sale queue
//! - [`remote`]: the remote row-store contract plus the typed write
//!   sequence shared by checkout and reconciliation
//!
//! [`http`] is the production remote implementation, [`memory`] the
//! in-memory double used by tests and demos.

pub mod http;
pub mod memory;
pub mod offline;
pub mod remote;

pub use http::HttpRemoteStore;
pub use memory::MemoryRemoteStore;
pub use offline::{OfflineStore, StoreError, StoreResult};
pub use remote::{tables, RemoteError, RemoteStore, RemoteWriter, WriteStepError};
