//! Checkout models.

use foundry::orders::OrderItem;

/// A buyer's request to turn their selection into an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub user_id: String,

    /// Unvalidated buyer address
    pub email: String,

    /// Selected licenses; repeated selections collapse to the first
    pub lines: Vec<OrderItem>,

    /// Also subscribe the buyer to the newsletter
    pub subscribe: bool,
}
