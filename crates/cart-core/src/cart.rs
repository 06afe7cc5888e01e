//! # Cart Types
//!
//! The buyer's pending order intent: line items keyed by product id,
//! merge-on-add semantics, and derived totals computed from add-time
//! price snapshots.

use crate::product::Product;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A line item in the cart.
///
/// Holds a full product snapshot taken when the item was added; a later
/// price change in the catalog does not affect this line's total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Identity — equals `product.id`, unique within a cart
    pub id: String,

    /// Product snapshot at add time
    pub product: Product,

    /// Quantity, always >= 1 while the item exists
    pub quantity: u32,

    /// When the item was first added (informational only)
    pub added_at: DateTime<Utc>,
}

impl CartLineItem {
    /// Create a line item from a product snapshot
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            product: product.clone(),
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Total for this line, in the smallest currency unit
    pub fn line_total(&self) -> i64 {
        self.product.price.amount * self.quantity as i64
    }
}

/// The shopping cart.
///
/// Insertion order is preserved for display; correctness only depends
/// on the one-line-item-per-product-id invariant. `is_open` is a
/// transient UI flag and is never persisted.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartLineItem>,

    #[serde(skip)]
    is_open: bool,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from previously stored line items.
    /// Visibility always starts closed on a fresh load.
    pub fn with_items(items: Vec<CartLineItem>) -> Self {
        Self {
            items,
            is_open: false,
        }
    }

    /// The current line items, in insertion order
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// True if the cart holds no line items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a product to the cart.
    ///
    /// If a line item for the same product id already exists its
    /// quantity is incremented; otherwise a new line item is appended.
    /// A zero quantity is ignored.
    pub fn add_item(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(existing) => existing.quantity += quantity,
            None => self.items.push(CartLineItem::from_product(product, quantity)),
        }
    }

    /// Remove a line item. Absent product ids are a no-op.
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|item| item.id != product_id);
    }

    /// Replace a line item's quantity. Zero removes the line item;
    /// absent product ids are a no-op.
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product_id) {
            item.quantity = quantity;
        }
    }

    /// Empty the cart unconditionally
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities across all line items
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of `price * quantity` using the add-time price snapshots,
    /// in the smallest currency unit. Zero for an empty cart.
    pub fn total_price(&self) -> i64 {
        self.items.iter().map(|item| item.line_total()).sum()
    }

    /// Quantity for a product id, or 0 if absent
    pub fn item_quantity(&self, product_id: &str) -> u32 {
        self.items
            .iter()
            .find(|item| item.id == product_id)
            .map(|item| item.quantity)
            .unwrap_or(0)
    }

    /// Transient visibility flag
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Flip the visibility flag. No effect on items.
    pub fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Set the visibility flag. No effect on items.
    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{Currency, Price};

    fn phone(id: &str, amount: i64) -> Product {
        Product::new(id, format!("Phone {id}"), Price::from_minor(amount, Currency::XAF))
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        let p = phone("p1", 50_000);

        cart.add_item(&p, 2);
        cart.add_item(&p, 3);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_quantity("p1"), 5);
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_one_line_item_per_product_id() {
        let mut cart = Cart::new();
        let a = phone("a", 10_000);
        let b = phone("b", 20_000);

        cart.add_item(&a, 1);
        cart.add_item(&b, 1);
        cart.add_item(&a, 4);
        cart.update_quantity("b", 2);
        cart.remove_item("a");
        cart.add_item(&a, 1);

        let mut seen: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), cart.items().len());
    }

    #[test]
    fn test_update_quantity_replaces() {
        let mut cart = Cart::new();
        cart.add_item(&phone("p1", 10_000), 4);

        cart.update_quantity("p1", 2);
        assert_eq!(cart.item_quantity("p1"), 2);

        // absent ids are a no-op
        cart.update_quantity("ghost", 7);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_update_to_zero_removes() {
        let mut cart = Cart::new();
        cart.add_item(&phone("p1", 10_000), 2);

        cart.update_quantity("p1", 0);
        assert!(cart.is_empty());
        assert_eq!(cart.item_quantity("p1"), 0);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&phone("p1", 10_000), 1);
        cart.remove_item("nope");
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), 0);

        cart.add_item(&phone("p1", 50_000), 2);
        cart.add_item(&phone("p2", 30_000), 1);

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), 130_000);
    }

    #[test]
    fn test_snapshot_isolation() {
        let mut cart = Cart::new();
        let mut p = phone("p1", 50_000);
        cart.add_item(&p, 2);

        // live catalog price changes do not touch the cart snapshot
        p.price = Price::from_minor(99_000, Currency::XAF);

        assert_eq!(cart.total_price(), 100_000);
    }

    #[test]
    fn test_zero_quantity_add_is_ignored() {
        let mut cart = Cart::new();
        cart.add_item(&phone("p1", 10_000), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_visibility_flag_is_independent() {
        let mut cart = Cart::new();
        cart.add_item(&phone("p1", 10_000), 1);

        assert!(!cart.is_open());
        cart.toggle_open();
        assert!(cart.is_open());
        cart.set_open(false);
        assert!(!cart.is_open());
        assert_eq!(cart.items().len(), 1);
    }
}
