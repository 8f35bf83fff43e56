//! # Cart Types
//!
//! Cart contents and the cart collaborator consumed by the checkout wizard.

use crate::amount::OrderAmount;
use crate::catalog::Product;
use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Most units of one product a single cart line may hold
pub const MAX_LINE_QUANTITY: u32 = 999;

/// A line in a cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product ID
    pub id: String,

    /// Product name (denormalized for display)
    pub name: String,

    /// Unit price in francs CFA
    pub price: i64,

    pub quantity: u32,
}

impl CartItem {
    /// Create a cart item from a product
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity,
        }
    }

    /// Line total; saturates instead of wrapping
    pub fn total(&self) -> i64 {
        self.price.saturating_mul(i64::from(self.quantity))
    }
}

/// A customer's cart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item, merging quantities for a product already in the cart.
    ///
    /// The merged line quantity must stay within `1..=MAX_LINE_QUANTITY`;
    /// otherwise the cart is left unchanged.
    pub fn add_item(&mut self, item: CartItem) -> CheckoutResult<()> {
        let existing = self.items.iter().position(|i| i.id == item.id);
        let current = existing.map_or(0, |idx| self.items[idx].quantity);

        let quantity = current
            .checked_add(item.quantity)
            .filter(|q| item.quantity > 0 && *q <= MAX_LINE_QUANTITY)
            .ok_or(CheckoutError::InvalidQuantity {
                quantity: u64::from(current) + u64::from(item.quantity),
                max: MAX_LINE_QUANTITY,
            })?;

        match existing {
            Some(idx) => self.items[idx].quantity = quantity,
            None => self.items.push(item),
        }
        Ok(())
    }

    pub fn add_product(&mut self, product: &Product, quantity: u32) -> CheckoutResult<()> {
        self.add_item(CartItem::from_product(product, quantity))
    }

    pub fn total(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |sum, item| sum.saturating_add(item.total()))
    }

    /// Amount to charge, or `EmptyCart` when there is nothing to pay
    pub fn order_amount(&self) -> CheckoutResult<OrderAmount> {
        if self.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        OrderAmount::new(self.total())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Cart collaborator seen by the checkout wizard.
///
/// The wizard reads the items and total when it opens and clears the
/// cart once payment succeeds.
pub trait CartCollaborator: Send + Sync {
    fn items(&self) -> Vec<CartItem>;

    fn total(&self) -> i64;

    fn clear_cart(&self);
}

/// In-memory carts keyed by cart id
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    carts: Arc<RwLock<HashMap<String, Cart>>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Cart>> {
        self.carts.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Cart>> {
        self.carts.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of a cart; unknown ids read as empty
    pub fn get(&self, cart_id: &str) -> Cart {
        self.read().get(cart_id).cloned().unwrap_or_default()
    }

    pub fn add_product(
        &self,
        cart_id: &str,
        product: &Product,
        quantity: u32,
    ) -> CheckoutResult<Cart> {
        let mut carts = self.write();
        let cart = carts.entry(cart_id.to_string()).or_default();
        cart.add_product(product, quantity)?;
        Ok(cart.clone())
    }

    pub fn clear(&self, cart_id: &str) {
        self.write().remove(cart_id);
    }

    /// Collaborator bound to one cart
    pub fn handle(&self, cart_id: impl Into<String>) -> CartHandle {
        CartHandle {
            store: self.clone(),
            cart_id: cart_id.into(),
        }
    }
}

/// A `CartStore` entry exposed as a `CartCollaborator`
#[derive(Debug, Clone)]
pub struct CartHandle {
    store: CartStore,
    cart_id: String,
}

impl CartHandle {
    pub fn cart_id(&self) -> &str {
        &self.cart_id
    }

    pub fn cart(&self) -> Cart {
        self.store.get(&self.cart_id)
    }
}

impl CartCollaborator for CartHandle {
    fn items(&self) -> Vec<CartItem> {
        self.cart().items
    }

    fn total(&self) -> i64 {
        self.cart().total()
    }

    fn clear_cart(&self) {
        tracing::debug!(cart_id = %self.cart_id, "Clearing cart");
        self.store.clear(&self.cart_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bissap() -> Product {
        Product::new("bissap", "Bissap", "mama-juice", 1500)
    }

    fn baobab() -> Product {
        Product::new("baobab", "Jus de Baobab", "mama-juice", 2000)
    }

    #[test]
    fn test_cart_total() {
        let mut cart = Cart::new();
        cart.add_product(&bissap(), 2).unwrap(); // 3000
        cart.add_product(&baobab(), 1).unwrap(); // 2000

        assert_eq!(cart.total(), 5000);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.order_amount().unwrap().value(), 5000);
    }

    #[test]
    fn test_same_product_merges() {
        let mut cart = Cart::new();
        cart.add_product(&bissap(), 1).unwrap();
        cart.add_product(&bissap(), 2).unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
    }

    #[test]
    fn test_empty_cart_has_no_amount() {
        assert_eq!(Cart::new().order_amount(), Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn test_store_handle_clears_cart() {
        let store = CartStore::new();
        store.add_product("c1", &bissap(), 2).unwrap();
        store.add_product("c2", &baobab(), 1).unwrap();

        let handle = store.handle("c1");
        assert_eq!(handle.total(), 3000);
        assert_eq!(handle.items().len(), 1);

        handle.clear_cart();
        assert!(store.get("c1").is_empty());
        assert_eq!(store.get("c2").total(), 2000);
    }

    #[test]
    fn test_quantity_limits() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_product(&bissap(), 0),
            Err(CheckoutError::InvalidQuantity { quantity: 0, .. })
        ));
        assert!(cart.add_product(&bissap(), MAX_LINE_QUANTITY + 1).is_err());
        assert!(cart.is_empty());

        cart.add_product(&bissap(), MAX_LINE_QUANTITY).unwrap();
        assert!(cart.add_product(&bissap(), 1).is_err());
        assert_eq!(cart.items[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_store_rejects_overflowing_merge() {
        let store = CartStore::new();
        assert!(store.add_product("c1", &bissap(), u32::MAX).is_err());

        store.add_product("c1", &bissap(), 2).unwrap();
        let err = store.add_product("c1", &bissap(), u32::MAX).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::InvalidQuantity {
                quantity: 2 + u64::from(u32::MAX),
                max: MAX_LINE_QUANTITY,
            }
        );
        assert_eq!(err.status_code(), 400);
        assert_eq!(store.get("c1").items[0].quantity, 2);
        assert_eq!(store.get("c1").total(), 3000);
    }

    #[test]
    fn test_totals_saturate() {
        let item = CartItem {
            id: "gold".into(),
            name: "Golden juice".into(),
            price: i64::MAX / 2,
            quantity: 3,
        };
        assert_eq!(item.total(), i64::MAX);

        let cart = Cart {
            items: vec![item.clone(), item],
        };
        assert_eq!(cart.total(), i64::MAX);
    }
}
