//! Order models.

use foundry::orders::{Order, OrderStatus};

pub use foundry::orders::{NewOrder, OrderId, PaymentEvent};

/// Operator or provider driven status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: OrderStatus,

    /// Attached when given, otherwise the stored value is kept
    pub session_id: Option<String>,

    /// Attached when given, otherwise the stored value is kept
    pub payment_intent_id: Option<String>,
}

impl StatusUpdate {
    #[must_use]
    pub fn new(status: OrderStatus) -> Self {
        Self {
            status,
            session_id: None,
            payment_intent_id: None,
        }
    }
}

impl From<&PaymentEvent> for StatusUpdate {
    fn from(event: &PaymentEvent) -> Self {
        Self {
            status: event.status,
            session_id: event.session_id.clone(),
            payment_intent_id: event.payment_intent_id.clone(),
        }
    }
}

/// Result of applying a payment event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The order was updated.
    Applied { order: Order, previous: OrderStatus },

    /// The event id was seen before; nothing changed.
    Duplicate,

    /// The transition is not allowed from the stored status; nothing changed.
    Ignored { order: Order },
}

impl PaymentOutcome {
    /// Returns the order when this event moved it into `paid`.
    #[must_use]
    pub fn newly_paid(&self) -> Option<&Order> {
        match self {
            Self::Applied { order, previous }
                if order.status == OrderStatus::Paid && *previous != OrderStatus::Paid =>
            {
                Some(order)
            }
            Self::Applied { .. } | Self::Duplicate | Self::Ignored { .. } => None,
        }
    }
}
