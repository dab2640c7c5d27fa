//! Order Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    cart::{CartItem, CartItemKey},
    orders::{DownloadToken, EmailAddress, OrderId, OrderStatus},
};

/// A purchased font license frozen into an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Font identifier
    pub font_id: String,

    /// Display name of the typeface
    pub typeface_name: String,

    /// Typeface slug
    pub typeface_slug: String,

    /// Selling studio identifier
    pub studio_id: String,

    /// Selling studio slug
    pub studio_slug: String,

    /// Display name of the font style
    pub font_name: String,

    /// Full display name, typeface and style
    pub full_name: String,

    /// Price in minor currency units
    pub price: u64,

    /// Downloadable files; empty until the studio attaches them
    #[serde(default)]
    pub sales_file_urls: Vec<String>,
}

impl OrderItem {
    /// The cart selection this item was bought as.
    pub fn cart_item(&self) -> CartItem {
        CartItem {
            font_id: self.font_id.clone(),
            typeface_slug: self.typeface_slug.clone(),
            studio_id: self.studio_id.clone(),
            studio_slug: self.studio_slug.clone(),
            price: self.price,
        }
    }

    /// Identity key shared with the cart.
    pub fn key(&self) -> CartItemKey {
        CartItemKey::new(
            self.font_id.as_str(),
            self.typeface_slug.as_str(),
            self.studio_id.as_str(),
            self.studio_slug.as_str(),
        )
    }
}

/// The authoritative purchase record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier
    pub id: OrderId,

    /// Buyer identifier
    pub user_id: String,

    /// Buyer email address
    pub email: EmailAddress,

    /// Purchased items
    pub items: Vec<OrderItem>,

    /// Total charge in minor currency units
    pub total_cents: u64,

    /// Payment status
    pub status: OrderStatus,

    /// Payment provider intent reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_payment_intent_id: Option<String>,

    /// Payment provider checkout session reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_session_id: Option<String>,

    /// Capability token for downloading the purchased files
    pub download_token: DownloadToken,

    /// Creation time
    pub created_at: Timestamp,
}

impl Order {
    /// Returns true once payment has been confirmed.
    pub fn is_paid(&self) -> bool {
        self.status == OrderStatus::Paid
    }
}

/// An order that has not been persisted yet.
///
/// `created_at` is assigned at creation time when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Unique order identifier
    pub id: OrderId,

    /// Buyer identifier
    pub user_id: String,

    /// Buyer email address
    pub email: EmailAddress,

    /// Purchased items
    pub items: Vec<OrderItem>,

    /// Total charge in minor currency units
    pub total_cents: u64,

    /// Initial payment status
    #[serde(default)]
    pub status: OrderStatus,

    /// Payment provider intent reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_payment_intent_id: Option<String>,

    /// Payment provider checkout session reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_session_id: Option<String>,

    /// Capability token for downloading the purchased files
    pub download_token: DownloadToken,

    /// Creation time, if already known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl NewOrder {
    /// Finish the record, stamping `now` when no creation time was given.
    #[must_use]
    pub fn into_order(self, now: Timestamp) -> Order {
        Order {
            id: self.id,
            user_id: self.user_id,
            email: self.email,
            items: self.items,
            total_cents: self.total_cents,
            status: self.status,
            stripe_payment_intent_id: self.stripe_payment_intent_id,
            stripe_session_id: self.stripe_session_id,
            download_token: self.download_token,
            created_at: self.created_at.unwrap_or(now),
        }
    }
}
