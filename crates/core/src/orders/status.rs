//! Order Status

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payment state of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created, awaiting payment confirmation
    #[default]
    Pending,

    /// Payment confirmed
    Paid,

    /// Payment failed or the session expired
    Failed,
}

/// Error returned when a status string is not one of the known values.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status `{0}`, expected one of pending, paid, failed")]
pub struct OrderStatusError(pub String);

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [OrderStatus; 3] = [Self::Pending, Self::Paid, Self::Failed];

    /// The persisted string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }

    /// Whether a payment notification may move an order from `self` to `next`.
    ///
    /// Re-applying the current status is allowed. A paid order never moves
    /// again and nothing returns to pending.
    #[must_use]
    pub const fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, _) | (Self::Failed, Self::Failed | Self::Paid) | (Self::Paid, Self::Paid)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            other => Err(OrderStatusError(other.to_string())),
        }
    }
}
