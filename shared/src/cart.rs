//! Cart types
//!
//! The cart is plain data owned by the caller; all pricing happens in
//! the core's pricing engine. Ad-hoc ("quick") products are a proper
//! tagged variant rather than a sentinel-prefixed ID, so the type
//! system tracks which lines can generate stock movements.

use serde::{Deserialize, Serialize};

use crate::models::ProductSnapshot;

/// What a cart line points at: a snapshotted catalog product, or an
/// ad-hoc entry typed in by name and price at the till.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartProduct {
    Catalog(ProductSnapshot),
    AdHoc { name: String, price: f64 },
}

impl CartProduct {
    pub fn name(&self) -> &str {
        match self {
            Self::Catalog(snap) => &snap.name,
            Self::AdHoc { name, .. } => name,
        }
    }

    pub fn unit_price(&self) -> f64 {
        match self {
            Self::Catalog(snap) => snap.price,
            Self::AdHoc { price, .. } => *price,
        }
    }

    /// Catalog row ID, `None` for ad-hoc lines
    pub fn catalog_id(&self) -> Option<&str> {
        match self {
            Self::Catalog(snap) => Some(&snap.product_id),
            Self::AdHoc { .. } => None,
        }
    }

    pub fn is_ad_hoc(&self) -> bool {
        matches!(self, Self::AdHoc { .. })
    }
}

/// One cart line. Invariant: `quantity > 0`; a line whose quantity
/// drops to zero is removed from the cart, never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: CartProduct,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        self.product.unit_price() * self.quantity as f64
    }
}

/// The operator's cart.
///
/// `manual_discount` suppresses automatic rule selection for the
/// current contents. Any line mutation clears it so automatic
/// evaluation resumes - which may silently replace the manual value.
/// That mirrors the behavior operators already rely on; see DESIGN.md.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    manual_discount: Option<f64>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn manual_discount(&self) -> Option<f64> {
        self.manual_discount
    }

    /// Operator-entered discount override; stays in force until the
    /// cart contents next change.
    pub fn set_manual_discount(&mut self, amount: f64) {
        self.manual_discount = Some(amount);
    }

    pub fn clear_manual_discount(&mut self) {
        self.manual_discount = None;
    }

    /// Add a line. Catalog lines merge with an existing line for the
    /// same product; ad-hoc lines are always appended. Quantity 0 is
    /// ignored.
    pub fn add_line(&mut self, product: CartProduct, quantity: u32) {
        if quantity == 0 {
            return;
        }
        self.manual_discount = None;

        if let Some(id) = product.catalog_id() {
            if let Some(line) = self
                .lines
                .iter_mut()
                .find(|l| l.product.catalog_id() == Some(id))
            {
                line.quantity = line.quantity.saturating_add(quantity);
                return;
            }
        }
        self.lines.push(CartLine { product, quantity });
    }

    /// Set a line's quantity by index; 0 removes the line.
    /// Out-of-range indexes are ignored.
    pub fn set_quantity(&mut self, index: usize, quantity: u32) {
        if index >= self.lines.len() {
            return;
        }
        self.manual_discount = None;
        if quantity == 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = quantity;
        }
    }

    /// Remove a line by index. Out-of-range indexes are ignored.
    pub fn remove_line(&mut self, index: usize) {
        if index >= self.lines.len() {
            return;
        }
        self.manual_discount = None;
        self.lines.remove(index);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.manual_discount = None;
    }

    /// Consume the cart into its lines (for enqueueing a pending sale)
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(id: &str, price: f64) -> CartProduct {
        CartProduct::Catalog(ProductSnapshot {
            product_id: id.to_string(),
            name: format!("Product {id}"),
            price,
            stock: 10,
        })
    }

    #[test]
    fn test_catalog_lines_merge_by_product() {
        let mut cart = Cart::new();
        cart.add_line(snap("p1", 2.50), 1);
        cart.add_line(snap("p1", 2.50), 2);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_ad_hoc_lines_never_merge() {
        let mut cart = Cart::new();
        let ad_hoc = CartProduct::AdHoc {
            name: "Gift wrap".to_string(),
            price: 1.0,
        };
        cart.add_line(ad_hoc.clone(), 1);
        cart.add_line(ad_hoc, 1);
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_merge_saturates_instead_of_overflowing() {
        let mut cart = Cart::new();
        cart.add_line(snap("p1", 2.50), u32::MAX);
        cart.add_line(snap("p1", 2.50), 1);
        assert_eq!(cart.lines()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_zero_quantity_removes_line() {
        let mut cart = Cart::new();
        cart.add_line(snap("p1", 2.50), 2);
        cart.set_quantity(0, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_mutation_clears_manual_discount() {
        let mut cart = Cart::new();
        cart.add_line(snap("p1", 10.0), 1);
        cart.set_manual_discount(2.0);
        assert_eq!(cart.manual_discount(), Some(2.0));

        cart.add_line(snap("p2", 5.0), 1);
        assert_eq!(cart.manual_discount(), None);

        cart.set_manual_discount(1.0);
        cart.set_quantity(1, 3);
        assert_eq!(cart.manual_discount(), None);

        cart.set_manual_discount(1.0);
        cart.remove_line(0);
        assert_eq!(cart.manual_discount(), None);
    }

    #[test]
    fn test_add_zero_quantity_is_ignored() {
        let mut cart = Cart::new();
        cart.set_manual_discount(2.0);
        cart.add_line(snap("p1", 10.0), 0);
        assert!(cart.is_empty());
        // no-op add keeps the override in force
        assert_eq!(cart.manual_discount(), Some(2.0));
    }
}
