//! Persisted Cart

use tracing::{debug, warn};

use crate::cart::{CART_SNAPSHOT_VERSION, Cart, CartItem, CartItemKey, CartSnapshot, CartStore};

/// A [`Cart`] that writes itself to a [`CartStore`] after every change.
///
/// Persistence is best-effort: store failures are logged and never surface to
/// the caller, so the in-memory cart stays authoritative for the session.
#[derive(Debug)]
pub struct PersistedCart<S> {
    cart: Cart,
    store: S,
}

impl<S: CartStore> PersistedCart<S> {
    /// Load the cart from `store`.
    ///
    /// Missing, unreadable or wrong-version snapshots yield an empty cart.
    pub fn load(store: S) -> Self {
        let cart = match store.read() {
            Ok(Some(snapshot)) if snapshot.version == CART_SNAPSHOT_VERSION => {
                Cart::with_items(snapshot.items)
            }
            Ok(Some(snapshot)) => {
                debug!(
                    version = snapshot.version,
                    expected = CART_SNAPSHOT_VERSION,
                    "discarding cart snapshot with unknown version"
                );

                Cart::new()
            }
            Ok(None) => Cart::new(),
            Err(error) => {
                warn!(%error, "failed to load cart, starting empty");

                Cart::new()
            }
        };

        Self { cart, store }
    }

    /// Add an item, persisting if the cart changed.
    pub fn add_item(&mut self, item: CartItem) -> bool {
        let added = self.cart.add_item(item);

        if added {
            self.persist();
        }

        added
    }

    /// Remove the item identified by `key`, persisting if the cart changed.
    pub fn remove_item(&mut self, key: &CartItemKey) -> Option<CartItem> {
        let removed = self.cart.remove_item(key);

        if removed.is_some() {
            self.persist();
        }

        removed
    }

    /// Empty the cart and persist.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// Sum of item prices in minor units, `None` on overflow.
    pub fn total(&self) -> Option<u64> {
        self.cart.total()
    }

    /// The in-memory cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Consume the wrapper, returning the cart and its store.
    pub fn into_parts(self) -> (Cart, S) {
        (self.cart, self.store)
    }

    fn persist(&self) {
        let snapshot = CartSnapshot::new(self.cart.items().to_vec());

        if let Err(error) = self.store.write(&snapshot) {
            warn!(%error, items = snapshot.items.len(), "failed to persist cart");
        }
    }
}
