//! Foundry prelude

pub use crate::{
    cart::{
        Cart, CartItem, CartItemKey, CartSnapshot, CartStore, CartStoreError, FileCartStore,
        MemoryCartStore, PersistedCart,
    },
    orders::{
        DownloadToken, EmailAddress, NewOrder, Order, OrderId, OrderItem, OrderStatus,
        PaymentEvent, ValidationErrors,
    },
    pricing::format_minor,
};
