//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity (catalog row)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<String>,
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Units on hand
    pub stock: i64,
    pub category: Option<String>,
    pub barcode: Option<String>,
    pub is_active: bool,
}

/// Immutable copy of the catalog fields a cart line needs.
///
/// Taken at the moment the line is added and never re-fetched, so a
/// sale total stays reproducible even if the catalog changes
/// mid-transaction. `stock` is the on-hand count *at add time*; the
/// replayed stock movement uses it as `previous_stock`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

impl ProductSnapshot {
    pub fn of(product: &Product) -> Option<Self> {
        Some(Self {
            product_id: product.id.clone()?,
            name: product.name.clone(),
            price: product.price,
            stock: product.stock,
        })
    }
}
