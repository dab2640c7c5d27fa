//! Cart

mod item;
mod persisted;
mod store;

pub use item::{CartItem, CartItemKey, CartItemKeyError};
pub use persisted::PersistedCart;
pub use store::{
    CART_SNAPSHOT_VERSION, CartSnapshot, CartStore, CartStoreError, FileCartStore,
    MemoryCartStore,
};

/// The buyer's current selection of font licenses.
///
/// Items keep insertion order and no two items share a [`CartItemKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart from the given items, keeping the first of any duplicates.
    pub fn with_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();

        for item in items {
            cart.add_item(item);
        }

        cart
    }

    /// Add an item unless an item with the same key is already present.
    ///
    /// Returns `true` when the item was added.
    pub fn add_item(&mut self, item: CartItem) -> bool {
        if self.items.iter().any(|existing| existing.same_selection(&item)) {
            return false;
        }

        self.items.push(item);

        true
    }

    /// Remove the item identified by `key`, returning it if it was present.
    pub fn remove_item(&mut self, key: &CartItemKey) -> Option<CartItem> {
        let position = self.items.iter().position(|item| item.matches(key))?;

        Some(self.items.remove(position))
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of item prices in minor units. The empty cart totals zero.
    ///
    /// Returns `None` when the sum does not fit in a `u64`.
    pub fn total(&self) -> Option<u64> {
        self.items
            .iter()
            .try_fold(0_u64, |total, item| total.checked_add(item.price))
    }

    /// Returns true if an item with `key` is in the cart.
    pub fn contains(&self, key: &CartItemKey) -> bool {
        self.items.iter().any(|item| item.matches(key))
    }

    /// Iterate over the items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// The items as a slice.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Get the number of items in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}
