//! In-memory remote store double
//!
//! Used by tests and demos. Generates sequential row ids and supports
//! two failure injections: drop the whole connection (`set_reachable`)
//! or fail creates on one table once it holds a given number of rows,
//! which is how the replay tests break the queue at a chosen sale.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use super::remote::{RemoteError, RemoteStore};

#[derive(Default)]
pub struct MemoryRemoteStore {
    rows: Mutex<HashMap<String, Vec<Value>>>,
    next_id: AtomicU64,
    unreachable: AtomicBool,
    /// Fail creates on `table` while it already holds `rows` rows
    fail_create_at: Mutex<Option<(String, usize)>>,
    /// Per-call artificial latency, for tests that need interleaving
    latency: Mutex<Option<std::time::Duration>>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add artificial latency to every call
    pub fn set_latency(&self, latency: Option<std::time::Duration>) {
        *self.latency.lock().unwrap() = latency;
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    /// Simulate the network dropping (every call fails)
    pub fn set_reachable(&self, reachable: bool) {
        self.unreachable.store(!reachable, Ordering::SeqCst);
    }

    /// Arrange for the next create on `table` to fail once the table
    /// holds `existing_rows` rows; `None` clears the injection.
    pub fn fail_create_when(&self, injection: Option<(&str, usize)>) {
        *self.fail_create_at.lock().unwrap() =
            injection.map(|(table, rows)| (table.to_string(), rows));
    }

    /// All rows currently in a table
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.rows
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, table: &str) -> usize {
        self.rows(table).len()
    }

    fn check_reachable(&self) -> Result<(), RemoteError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(RemoteError::Request("connection refused".to_string()));
        }
        Ok(())
    }

    fn check_create(&self, table: &str) -> Result<(), RemoteError> {
        let guard = self.fail_create_at.lock().unwrap();
        if let Some((failing_table, at_rows)) = guard.as_ref() {
            if failing_table == table && self.count(table) >= *at_rows {
                return Err(RemoteError::Request(format!(
                    "injected create failure on {table}"
                )));
            }
        }
        Ok(())
    }

    fn insert(&self, table: &str, mut row: Value) -> Value {
        if row.get("id").is_none() {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            row.as_object_mut()
                .expect("rows are JSON objects")
                .insert("id".to_string(), Value::from(format!("row-{id}")));
        }
        self.rows
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        row
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn create(&self, table: &str, row: Value) -> Result<Value, RemoteError> {
        self.simulate_latency().await;
        self.check_reachable()?;
        self.check_create(table)?;
        Ok(self.insert(table, row))
    }

    async fn create_many(&self, table: &str, rows: Vec<Value>) -> Result<(), RemoteError> {
        self.simulate_latency().await;
        self.check_reachable()?;
        self.check_create(table)?;
        for row in rows {
            self.insert(table, row);
        }
        Ok(())
    }

    async fn update(&self, table: &str, id: &str, fields: Value) -> Result<(), RemoteError> {
        self.simulate_latency().await;
        self.check_reachable()?;
        let mut guard = self.rows.lock().unwrap();
        let rows = guard
            .get_mut(table)
            .ok_or_else(|| RemoteError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            })?;
        let row = rows
            .iter_mut()
            .find(|r| r.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| RemoteError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            })?;
        if let (Some(target), Some(patch)) = (row.as_object_mut(), fields.as_object()) {
            for (key, value) in patch {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn read(&self, table: &str, filters: &[(&str, Value)]) -> Result<Vec<Value>, RemoteError> {
        self.simulate_latency().await;
        self.check_reachable()?;
        Ok(self
            .rows(table)
            .into_iter()
            .filter(|row| {
                filters
                    .iter()
                    .all(|(column, value)| row.get(*column) == Some(value))
            })
            .collect())
    }
}
