//! Payment events.

use serde::{Deserialize, Serialize};

use crate::orders::{OrderId, OrderStatus};

/// A payment provider notification about one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEvent {
    /// Provider event identifier, unique per notification
    pub event_id: String,

    /// Order the payment belongs to
    pub order_id: OrderId,

    /// Resulting order status
    pub status: OrderStatus,

    /// Provider checkout session reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Provider payment intent reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
}
