//! Remote row-store contract and the typed write sequence
//!
//! The remote store is an external collaborator reached over the
//! network: simple create / createMany / update / read calls keyed by
//! id, authenticated by the active session. [`RemoteStore`] captures
//! that surface; [`RemoteWriter`] layers the checkout-specific write
//! sequence on top so the online path and queue replay share one
//! implementation.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use shared::models::{CashRegister, Customer, DiscountRule, PaymentMethod, Product, Sale,
    SaleItem, StockMovement};
use shared::util::now_millis;
use shared::CartLine;

/// Remote table names
pub mod tables {
    pub const PRODUCTS: &str = "products";
    pub const CUSTOMERS: &str = "customers";
    pub const DISCOUNT_RULES: &str = "discount_rules";
    pub const SALES: &str = "sales";
    pub const SALE_ITEMS: &str = "sale_items";
    pub const STOCK_MOVEMENTS: &str = "stock_movements";
    pub const CASH_REGISTERS: &str = "cash_registers";
}

/// Remote store errors
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Remote returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Created row is missing an id")]
    MissingId,

    #[error("Row not found in {table}: {id}")]
    NotFound { table: String, id: String },
}

/// The generic row-store surface the core consumes.
///
/// Row payloads are JSON objects; `create` returns the stored row with
/// its server-generated id.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn create(&self, table: &str, row: Value) -> Result<Value, RemoteError>;

    async fn create_many(&self, table: &str, rows: Vec<Value>) -> Result<(), RemoteError>;

    async fn update(&self, table: &str, id: &str, fields: Value) -> Result<(), RemoteError>;

    /// Read rows matching all equality filters (empty filter = all rows)
    async fn read(&self, table: &str, filters: &[(&str, Value)]) -> Result<Vec<Value>, RemoteError>;
}

/// A failure at a named step of a write sequence
#[derive(Debug, Error)]
#[error("{step}: {source}")]
pub struct WriteStepError {
    pub step: &'static str,
    #[source]
    pub source: RemoteError,
}

fn step(step: &'static str) -> impl FnOnce(RemoteError) -> WriteStepError {
    move |source| WriteStepError { step, source }
}

/// Serialize a row, dropping a null `id` so the server assigns one
fn row<T: serde::Serialize>(value: &T) -> Result<Value, RemoteError> {
    let mut json = serde_json::to_value(value)?;
    if let Some(obj) = json.as_object_mut() {
        if obj.get("id").is_some_and(Value::is_null) {
            obj.remove("id");
        }
    }
    Ok(json)
}

/// Typed operations over a [`RemoteStore`]
#[derive(Clone)]
pub struct RemoteWriter {
    store: Arc<dyn RemoteStore>,
}

impl RemoteWriter {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }

    // ========== Sale write sequence ==========

    /// The per-sale write sequence shared by online checkout and queue
    /// replay: sale record, line items (batch), one stock movement per
    /// catalog line. Strictly sequential; each step awaited before the
    /// next; no compensation on mid-sequence failure.
    ///
    /// Stock movements use the cart line's snapshot stock as
    /// `previous_stock`, so a replayed sale records exactly the
    /// before/after the offline UI displayed.
    pub async fn write_sale_sequence(
        &self,
        sale: &Sale,
        lines: &[CartLine],
    ) -> Result<String, WriteStepError> {
        let created = self
            .store
            .create(tables::SALES, row(sale).map_err(step("create_sale"))?)
            .await
            .map_err(step("create_sale"))?;
        let sale_id = created
            .get("id")
            .and_then(Value::as_str)
            .ok_or(WriteStepError {
                step: "create_sale",
                source: RemoteError::MissingId,
            })?
            .to_string();

        let items: Result<Vec<Value>, RemoteError> = lines
            .iter()
            .map(|line| {
                row(&SaleItem {
                    id: None,
                    sale_id: sale_id.clone(),
                    product_id: line.product.catalog_id().map(str::to_string),
                    name: line.product.name().to_string(),
                    unit_price: line.product.unit_price(),
                    quantity: line.quantity,
                    line_total: line.line_total(),
                })
            })
            .collect();
        self.store
            .create_many(tables::SALE_ITEMS, items.map_err(step("create_sale_items"))?)
            .await
            .map_err(step("create_sale_items"))?;

        for line in lines {
            // Ad-hoc lines have no catalog row and never move stock
            let snapshot = match &line.product {
                shared::CartProduct::Catalog(snapshot) => snapshot,
                shared::CartProduct::AdHoc { .. } => continue,
            };
            let movement = StockMovement {
                id: None,
                product_id: snapshot.product_id.clone(),
                sale_id: sale_id.clone(),
                quantity: line.quantity,
                previous_stock: snapshot.stock,
                new_stock: snapshot.stock - line.quantity as i64,
                reason: "sale".to_string(),
                created_at: now_millis(),
            };
            self.store
                .create(
                    tables::STOCK_MOVEMENTS,
                    row(&movement).map_err(step("create_stock_movement"))?,
                )
                .await
                .map_err(step("create_stock_movement"))?;
        }

        Ok(sale_id)
    }

    // ========== Aggregate updates (online path only) ==========

    /// Fold a sale into the register's running totals.
    ///
    /// Read-modify-write with no optimistic locking: two terminals
    /// selling against the same register can lose an update. Kept as-is
    /// rather than silently upgraded; see DESIGN.md.
    pub async fn record_register_sale(
        &self,
        register_id: &str,
        method: &PaymentMethod,
        total: f64,
    ) -> Result<(), WriteStepError> {
        let rows = self
            .store
            .read(tables::CASH_REGISTERS, &[("id", Value::from(register_id))])
            .await
            .map_err(step("update_register"))?;
        let mut register: CashRegister = match rows.into_iter().next() {
            Some(row) => serde_json::from_value(row).map_err(|e| WriteStepError {
                step: "update_register",
                source: RemoteError::Decode(e),
            })?,
            None => {
                return Err(WriteStepError {
                    step: "update_register",
                    source: RemoteError::NotFound {
                        table: tables::CASH_REGISTERS.to_string(),
                        id: register_id.to_string(),
                    },
                })
            }
        };

        register.record_sale(method, total);
        self.store
            .update(
                tables::CASH_REGISTERS,
                register_id,
                serde_json::json!({
                    "cash_total": register.cash_total,
                    "card_total": register.card_total,
                    "transfer_total": register.transfer_total,
                    "transaction_count": register.transaction_count,
                }),
            )
            .await
            .map_err(step("update_register"))
    }

    /// Bump a rule's applied-sale counter (read-modify-write)
    pub async fn increment_rule_usage(&self, rule_id: &str) -> Result<(), WriteStepError> {
        let rows = self
            .store
            .read(tables::DISCOUNT_RULES, &[("id", Value::from(rule_id))])
            .await
            .map_err(step("update_rule_usage"))?;
        let usage = rows
            .first()
            .and_then(|r| r.get("usage_count"))
            .and_then(Value::as_i64)
            .unwrap_or(0);

        self.store
            .update(
                tables::DISCOUNT_RULES,
                rule_id,
                serde_json::json!({ "usage_count": usage + 1 }),
            )
            .await
            .map_err(step("update_rule_usage"))
    }

    /// Apply earned loyalty points and lifetime spend to a customer
    pub async fn update_customer_loyalty(
        &self,
        customer: &Customer,
        points_earned: i64,
        total: f64,
    ) -> Result<(), WriteStepError> {
        let id = match customer.id.as_deref() {
            Some(id) => id,
            None => return Ok(()),
        };
        self.store
            .update(
                tables::CUSTOMERS,
                id,
                serde_json::json!({
                    "loyalty_points": customer.loyalty_points + points_earned,
                    "total_spent": customer.total_spent + total,
                }),
            )
            .await
            .map_err(step("update_customer"))
    }

    // ========== Catalog reads ==========

    pub async fn fetch_products(&self) -> Result<Vec<Product>, RemoteError> {
        let rows = self
            .store
            .read(tables::PRODUCTS, &[("is_active", Value::from(true))])
            .await?;
        rows.into_iter()
            .map(|r| serde_json::from_value(r).map_err(RemoteError::from))
            .collect()
    }

    pub async fn fetch_customers(&self) -> Result<Vec<Customer>, RemoteError> {
        let rows = self
            .store
            .read(tables::CUSTOMERS, &[("is_active", Value::from(true))])
            .await?;
        rows.into_iter()
            .map(|r| serde_json::from_value(r).map_err(RemoteError::from))
            .collect()
    }

    pub async fn fetch_active_rules(&self) -> Result<Vec<DiscountRule>, RemoteError> {
        let rows = self
            .store
            .read(tables::DISCOUNT_RULES, &[("is_active", Value::from(true))])
            .await?;
        rows.into_iter()
            .map(|r| serde_json::from_value(r).map_err(RemoteError::from))
            .collect()
    }
}
