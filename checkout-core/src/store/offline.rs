//! redb-based offline store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `cache` | namespaced `&str` | JSON bytes | catalog/customer snapshots, last-sync timestamp |
//! | `pending_sales` | `(enqueued_at, local_id)` | JSON `PendingSale` | offline sale queue (FIFO by key order) |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate`: once `commit()` returns
//! the pending sale survives power loss, which is what lets the success
//! receipt be shown before the network ever comes back.
//!
//! # Error policy
//!
//! The queue methods return `StoreResult` so callers can log failures
//! with context. The snapshot-cache methods are best-effort: failures
//! are logged here and swallowed, because the cache is an accelerator,
//! not the system of record.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use shared::models::{Customer, Product};
use shared::PendingSale;
use thiserror::Error;

/// Namespaced cache keys
const KEY_PRODUCTS: &str = "catalog:products";
const KEY_CUSTOMERS: &str = "catalog:customers";
const KEY_LAST_SYNC: &str = "sync:last_sync";

/// Snapshot cache: key = namespaced name, value = JSON bytes
const CACHE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("cache");

/// Pending sale queue: key = (enqueued_at millis, local_id), value =
/// JSON-serialized PendingSale. Tuple key order gives FIFO iteration;
/// the local_id component keeps same-millisecond enqueues distinct.
const PENDING_TABLE: TableDefinition<(i64, &str), &[u8]> = TableDefinition::new("pending_sales");

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable local cache backing offline operation
#[derive(Clone)]
pub struct OfflineStore {
    db: Arc<Database>,
}

impl OfflineStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CACHE_TABLE)?;
            let _ = write_txn.open_table(PENDING_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CACHE_TABLE)?;
            let _ = write_txn.open_table(PENDING_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Pending sale queue ==========

    /// Durably enqueue a sale completed while offline.
    ///
    /// Must succeed before the success receipt is shown; a failure here
    /// is the one scenario where an offline sale can be lost.
    pub fn enqueue_pending(&self, sale: &PendingSale) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PENDING_TABLE)?;
            let value = serde_json::to_vec(sale)?;
            table.insert((sale.enqueued_at, sale.local_id.as_str()), value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// All queued sales in enqueue order (oldest first)
    pub fn pending_sales(&self) -> StoreResult<Vec<PendingSale>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PENDING_TABLE)?;

        let mut sales = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let sale: PendingSale = serde_json::from_slice(value.value())?;
            sales.push(sale);
        }
        Ok(sales)
    }

    /// Number of queued sales
    pub fn pending_count(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PENDING_TABLE)?;
        Ok(table.len()?)
    }

    /// Remove a sale from the queue after its full remote write
    /// sequence succeeded
    pub fn remove_pending(&self, sale: &PendingSale) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PENDING_TABLE)?;
            table.remove((sale.enqueued_at, sale.local_id.as_str()))?;
        }
        write_txn.commit()?;
        Ok(())
    }

    // ========== Snapshot cache (best-effort) ==========

    /// Cache the product catalog after a successful live fetch
    pub fn cache_products(&self, products: &[Product]) {
        if let Err(e) = self.kv_set(KEY_PRODUCTS, products) {
            tracing::error!("Failed to cache product snapshot: {e}");
        }
    }

    /// Last-known product catalog, if one was ever cached. Staleness
    /// is unbounded; sale totals never depend on it because cart lines
    /// snapshot prices at add time.
    pub fn cached_products(&self) -> Option<Vec<Product>> {
        self.kv_get(KEY_PRODUCTS)
    }

    /// Cache the customer list after a successful live fetch
    pub fn cache_customers(&self, customers: &[Customer]) {
        if let Err(e) = self.kv_set(KEY_CUSTOMERS, customers) {
            tracing::error!("Failed to cache customer snapshot: {e}");
        }
    }

    /// Last-known customer list, if one was ever cached
    pub fn cached_customers(&self) -> Option<Vec<Customer>> {
        self.kv_get(KEY_CUSTOMERS)
    }

    /// Record when the queue last fully drained
    pub fn set_last_sync(&self, timestamp_ms: i64) {
        if let Err(e) = self.kv_set(KEY_LAST_SYNC, &timestamp_ms) {
            tracing::error!("Failed to record last-sync timestamp: {e}");
        }
    }

    pub fn last_sync(&self) -> Option<i64> {
        self.kv_get(KEY_LAST_SYNC)
    }

    fn kv_set<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CACHE_TABLE)?;
            let bytes = serde_json::to_vec(value)?;
            table.insert(key, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn kv_get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let result: StoreResult<Option<T>> = (|| {
            let read_txn = self.db.begin_read()?;
            let table = read_txn.open_table(CACHE_TABLE)?;
            match table.get(key)? {
                Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
                None => Ok(None),
            }
        })();

        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to read cache key {key}: {e}");
                None
            }
        }
    }
}
