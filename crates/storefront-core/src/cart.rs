//! # Cart
//!
//! The shopping cart and its aggregate totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Shopper Action           Cart Method            Line Change            │
//! │  ──────────────           ───────────            ───────────            │
//! │                                                                         │
//! │  Click "Add" ────────────► add() ───────────────► qty += 1 or push      │
//! │                                                                         │
//! │  Change Quantity ────────► update_quantity() ───► qty = n (n <= 0 drops)│
//! │                                                                         │
//! │  Click Remove ───────────► remove() ────────────► line dropped          │
//! │                                                                         │
//! │  Click Clear ────────────► clear() ─────────────► no lines              │
//! │                                                                         │
//! │  Render ─────────────────► totals() ────────────► (derived, not stored) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by product id (adding again bumps the quantity)
//! - Every line has quantity >= 1
//! - There is no upper bound and no stock check
//!
//! Totals are re-derived on every call. Carts hold tens of lines at most.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::pricing::{effective_price, promo_price};
use crate::types::{Product, PromoCode};

/// One product-quantity pair in the cart.
///
/// `product` is a frozen snapshot taken when the line was created. Later
/// catalog edits do not reach lines that are already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Creates a line with quantity 1.
    pub fn new(product: &Product) -> Self {
        CartItem {
            product: product.clone(),
            quantity: 1,
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    /// Effective unit price × quantity.
    pub fn line_total(&self) -> Money {
        effective_price(&self.product).multiply_quantity(self.quantity)
    }

    /// Base price × quantity, before any discount.
    pub fn line_subtotal(&self) -> Money {
        self.product.price.multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// Serializes as a bare JSON array of `{ "product": ..., "quantity": n }`,
/// which is exactly the payload kept in the storage slot. Deserializing goes
/// through [`Cart::from_lines`], so a stored payload cannot break the line
/// invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl From<Vec<CartItem>> for Cart {
    fn from(lines: Vec<CartItem>) -> Self {
        Cart::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from raw lines.
    ///
    /// Zero-quantity lines are dropped. Lines repeating a product id are
    /// merged into the first one (its snapshot wins, quantities add up).
    pub fn from_lines(lines: Vec<CartItem>) -> Self {
        let mut cart = Cart::new();
        for line in lines.into_iter().filter(|l| l.quantity > 0) {
            match cart.items.iter_mut().find(|i| i.product.id == line.product.id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
                None => cart.items.push(line),
            }
        }
        cart
    }

    /// Adds one unit of `product`.
    ///
    /// ## Behavior
    /// - If product already in cart: quantity + 1 (snapshot is kept as-is)
    /// - If product not in cart: appends a new line with quantity 1
    pub fn add(&mut self, product: &Product) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return;
        }
        self.items.push(CartItem::new(product));
    }

    /// Removes the line for `product_id`. Unknown ids are ignored.
    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|i| i.product.id != product_id);
    }

    /// Sets the quantity of the line for `product_id`.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: same as [`Cart::remove`]
    /// - `quantity > u32::MAX`: stored as `u32::MAX` (callers reject this earlier)
    /// - Unknown product id: nothing happens
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = quantity;
        }
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.get(product_id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across all lines.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of effective unit price × quantity.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Every aggregate the cart view shows.
    pub fn totals(&self) -> CartTotals {
        let subtotal: Money = self.items.iter().map(CartItem::line_subtotal).sum();
        let total = self.total_price();
        CartTotals {
            line_count: self.line_count(),
            total_items: self.total_items(),
            subtotal,
            discount: subtotal - total,
            total,
        }
    }

    /// Aggregates with a shopper-entered promo code applied where eligible.
    pub fn totals_with_promo(&self, promo: &PromoCode, now: DateTime<Utc>) -> CartTotals {
        let subtotal: Money = self.items.iter().map(CartItem::line_subtotal).sum();
        let total: Money = self
            .items
            .iter()
            .map(|i| promo_price(&i.product, Some(promo), now).multiply_quantity(i.quantity))
            .sum();
        CartTotals {
            line_count: self.line_count(),
            total_items: self.total_items(),
            subtotal,
            discount: subtotal - total,
            total,
        }
    }
}

/// Cart totals summary for responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub line_count: usize,
    #[ts(type = "number")]
    pub total_items: u64,
    /// Base prices × quantities.
    pub subtotal: Money,
    /// `subtotal - total`.
    pub discount: Money,
    /// What the shopper pays.
    pub total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::new_id;

    fn test_product(name: &str, price_cents: i64) -> Product {
        Product::new(name, Money::from_cents(price_cents))
    }

    fn discounted(price_cents: i64, pct: u8) -> Product {
        let mut p = test_product("Discounted", price_cents);
        p.promo_active = true;
        p.has_public_discount = true;
        p.discount_percentage = Some(pct);
        p
    }

    fn quantities(cart: &Cart) -> Vec<(String, u32)> {
        cart.items()
            .iter()
            .map(|i| (i.product.name.clone(), i.quantity))
            .collect()
    }

    #[test]
    fn test_add_same_product_twice_is_one_line() {
        let mut cart = Cart::new();
        let product = test_product("A", 1000);

        cart.add(&product);
        cart.add(&product);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.get(&product.id).map(|i| i.quantity), Some(2));
    }

    #[test]
    fn test_scenario_two_products() {
        let mut cart = Cart::new();
        let a = test_product("A", 1000);
        let b = test_product("B", 500);

        cart.add(&a);
        cart.add(&a);
        cart.add(&b);

        assert_eq!(
            quantities(&cart),
            vec![("A".to_string(), 2), ("B".to_string(), 1)]
        );
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Money::from_cents(2500));
    }

    #[test]
    fn test_update_quantity_to_zero_removes_line() {
        let mut cart = Cart::new();
        let a = test_product("A", 1000);
        cart.add(&a);
        cart.add(&a);

        cart.update_quantity(&a.id, 0);

        assert!(cart.is_empty());
        assert!(!cart.contains(&a.id));
    }

    #[test]
    fn test_update_quantity_negative_removes_line() {
        let mut cart = Cart::new();
        let a = test_product("A", 1000);
        cart.add(&a);

        cart.update_quantity(&a.id, -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_sets_value_without_upper_bound() {
        let mut cart = Cart::new();
        let a = test_product("A", 100);
        cart.add(&a);

        cart.update_quantity(&a.id, 5000);
        assert_eq!(cart.total_items(), 5000);
        assert_eq!(cart.total_price().cents(), 500_000);
    }

    #[test]
    fn test_update_unknown_product_is_noop() {
        let mut cart = Cart::new();
        cart.add(&test_product("A", 100));
        let before = cart.clone();

        cart.update_quantity(&new_id(), 4);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        let a = test_product("A", 100);
        cart.add(&a);

        cart.remove("not-in-cart");
        assert_eq!(cart.line_count(), 1);

        cart.remove(&a.id);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&test_product("A", 100));
        cart.add(&test_product("B", 200));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Money::zero());
    }

    #[test]
    fn test_total_items_tracks_operation_sequence() {
        let products: Vec<Product> = (0..4).map(|i| test_product(&format!("P{i}"), 100)).collect();
        let mut cart = Cart::new();

        let ops: &[(usize, i64)] = &[(0, 1), (1, 1), (0, 1), (2, 7), (1, 0), (3, 1), (2, 2), (3, -1), (0, 1)];
        for &(idx, op) in ops {
            let product = &products[idx];
            match op {
                1 => cart.add(product),
                -1 => cart.remove(&product.id),
                n => cart.update_quantity(&product.id, n),
            }
            let expected: u64 = cart.items().iter().map(|i| u64::from(i.quantity)).sum();
            assert_eq!(cart.total_items(), expected);
            assert!(cart.items().iter().all(|i| i.quantity >= 1));
        }
    }

    #[test]
    fn test_snapshot_is_not_live() {
        let mut cart = Cart::new();
        let mut product = test_product("A", 1000);
        cart.add(&product);

        product.price = Money::from_cents(9999);
        cart.add(&product);

        let line = cart.get(&product.id).unwrap();
        assert_eq!(line.product.price.cents(), 1000);
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_totals_with_public_discount() {
        let mut cart = Cart::new();
        let a = discounted(10_000, 20);
        let b = test_product("B", 500);
        cart.add(&a);
        cart.add(&b);
        cart.add(&b);

        let totals = cart.totals();
        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.total_items, 3);
        assert_eq!(totals.subtotal.cents(), 11_000);
        assert_eq!(totals.total.cents(), 9_000);
        assert_eq!(totals.discount.cents(), 2_000);
    }

    #[test]
    fn test_totals_with_promo_code() {
        let now = Utc::now();
        let mut cart = Cart::new();
        let a = test_product("A", 1000);
        let b = discounted(1000, 50);
        cart.add(&a);
        cart.add(&b);

        let promo = PromoCode {
            id: new_id(),
            code: "TEN".to_string(),
            discount_percentage: 10,
            product_id: None,
            is_active: true,
            expires_at: None,
            created_at: now,
            updated_at: now,
        };

        let totals = cart.totals_with_promo(&promo, now);
        // A gets the code (900), B keeps its public discount (500)
        assert_eq!(totals.total.cents(), 1_400);
        assert_eq!(totals.discount.cents(), 600);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut cart = Cart::new();
        cart.add(&discounted(10_000, 20));
        let b = test_product("B", 500);
        cart.add(&b);
        cart.update_quantity(&b.id, 3);

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, cart);
    }

    #[test]
    fn test_deserialize_normalizes_lines() {
        let a = test_product("A", 100);
        let b = test_product("B", 200);
        let lines = vec![
            CartItem { product: a.clone(), quantity: 2 },
            CartItem { product: b.clone(), quantity: 0 },
            CartItem { product: a.clone(), quantity: 3 },
        ];
        let json = serde_json::to_string(&lines).unwrap();

        let cart: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.get(&a.id).unwrap().quantity, 5);
        assert!(!cart.contains(&b.id));
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_zero_quantity_payload_is_empty() {
        let lines = vec![CartItem { product: test_product("A", 100), quantity: 0 }];
        let json = serde_json::to_string(&lines).unwrap();

        let cart: Cart = serde_json::from_str(&json).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_huge_line_total_saturates() {
        let mut cart = Cart::new();
        let pricey = test_product("A", 3_000_000_000);
        cart.add(&pricey);
        cart.update_quantity(&pricey.id, 4_000_000_000);

        assert_eq!(cart.total_price().cents(), i64::MAX);
        assert_eq!(cart.totals().discount.cents(), 0);
    }

    #[test]
    fn test_serializes_as_array_of_lines() {
        let mut cart = Cart::new();
        cart.add(&test_product("A", 100));

        let value = serde_json::to_value(&cart).unwrap();
        let lines = value.as_array().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["quantity"], 1);
        assert_eq!(lines[0]["product"]["name"], "A");
    }
}
