//! # Cart Store
//!
//! Owns the shopper's cart, mirrors it into the storage slot after every
//! mutation and publishes each new snapshot to subscribers.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Command                    Store method           Side effects         │
//! │  ───────                    ────────────           ────────────         │
//! │                                                                         │
//! │  add_to_cart ──────────────► add_to_cart() ─────┐                       │
//! │  update_cart_item ─────────► update_quantity() ─┤  1. mutate under lock │
//! │  remove_from_cart ─────────► remove_from_cart() ┤  2. write slot        │
//! │  clear_cart ───────────────► clear_cart() ──────┘  3. publish snapshot  │
//! │                                                                         │
//! │  get_cart ─────────────────► snapshot() / totals()   (read only)        │
//! │                                                                         │
//! │  Startup ──────────────────► open() ──► read slot ──► parse or empty    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//! - Unreadable or corrupted slot on startup: `warn!` and start empty
//! - Failed write after a mutation: `error!`; the in-memory change stands
//!
//! No cart operation ever fails toward the caller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::storage::CartStorage;
use storefront_core::{Cart, CartItem, CartTotals, Money, Product};

/// The persisted, observable cart.
///
/// ## Thread Safety
/// The cart sits behind a `Mutex` and the slot write happens while the lock
/// is held, so the slot always receives snapshots in mutation order.
#[derive(Debug)]
pub struct CartStore {
    key: String,
    storage: Arc<dyn CartStorage>,
    cart: Mutex<Cart>,
    updates: watch::Sender<Cart>,
}

impl CartStore {
    /// Rehydrates the cart stored under `key`, or starts empty.
    pub fn open(storage: Arc<dyn CartStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = rehydrate(storage.as_ref(), &key);
        info!(key = %key, lines = cart.line_count(), "Cart store opened");

        let (updates, _) = watch::channel(cart.clone());
        CartStore {
            key,
            storage,
            cart: Mutex::new(cart),
            updates,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `product`, or a new line with quantity 1.
    pub fn add_to_cart(&self, product: &Product) -> Cart {
        debug!(product_id = %product.id, "add_to_cart");
        self.mutate(|cart| cart.add(product))
    }

    /// Drops the line for `product_id` if there is one.
    pub fn remove_from_cart(&self, product_id: &str) -> Cart {
        debug!(product_id = %product_id, "remove_from_cart");
        self.mutate(|cart| cart.remove(product_id))
    }

    /// Sets a line's quantity; zero or below removes the line.
    pub fn update_quantity(&self, product_id: &str, quantity: i64) -> Cart {
        debug!(product_id = %product_id, quantity, "update_quantity");
        if quantity > i64::from(u32::MAX) {
            warn!(product_id = %product_id, quantity, max = u32::MAX, "Quantity clamped");
        }
        self.mutate(|cart| cart.update_quantity(product_id, quantity))
    }

    pub fn clear_cart(&self) -> Cart {
        debug!("clear_cart");
        self.mutate(Cart::clear)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// A copy of the current cart. Later mutations do not reach it.
    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    /// Aggregates, derived fresh from the current lines.
    pub fn totals(&self) -> CartTotals {
        self.lock().totals()
    }

    pub fn total_items(&self) -> u64 {
        self.lock().total_items()
    }

    pub fn total_price(&self) -> Money {
        self.lock().total_price()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A receiver that sees the snapshot after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.updates.subscribe()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate(&self, op: impl FnOnce(&mut Cart)) -> Cart {
        let mut cart = self.lock();
        op(&mut cart);
        let snapshot = cart.clone();

        self.persist(&snapshot);
        drop(cart);

        self.updates.send_replace(snapshot.clone());
        snapshot
    }

    fn persist(&self, cart: &Cart) {
        let payload = match serde_json::to_string(cart) {
            Ok(payload) => payload,
            Err(e) => {
                error!(key = %self.key, error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.storage.write(&self.key, &payload) {
            error!(key = %self.key, error = %e, "Failed to persist cart");
        }
    }
}

/// Reads and parses the slot, falling back to an empty cart.
fn rehydrate(storage: &dyn CartStorage, key: &str) -> Cart {
    let payload = match storage.read(key) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            debug!(key = %key, "No stored cart");
            return Cart::new();
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Stored cart unreadable, starting empty");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Vec<CartItem>>(&payload) {
        Ok(lines) => {
            let stored = lines.len();
            let cart = Cart::from_lines(lines);
            if cart.line_count() != stored {
                warn!(
                    key = %key,
                    stored,
                    kept = cart.line_count(),
                    "Stored cart had empty or repeated lines, normalized"
                );
            }
            cart
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Stored cart corrupted, starting empty");
            Cart::new()
        }
    }
}
