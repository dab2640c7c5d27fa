//! Order response models shared by the order, checkout and download routes.

use foundry::{
    orders::{Order, OrderItem},
    pricing::{PricingError, format_minor},
};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemResponse {
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

    /// Full display name
    pub full_name: String,

    /// Price in minor currency units
    pub price: u64,

    /// Downloadable files
    pub sales_file_urls: Vec<String>,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            font_id: item.font_id,
            typeface_name: item.typeface_name,
            typeface_slug: item.typeface_slug,
            studio_id: item.studio_id,
            studio_slug: item.studio_slug,
            font_name: item.font_name,
            full_name: item.full_name,
            price: item.price,
            sales_file_urls: item.sales_file_urls,
        }
    }
}

/// Order Response
///
/// The download token and payment references are never echoed back.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    /// Order identifier
    pub id: String,

    /// Buyer identifier
    pub user_id: String,

    /// Buyer email address
    pub email: String,

    /// Payment status (pending, paid, failed)
    pub status: String,

    /// Purchased items
    pub items: Vec<OrderItemResponse>,

    /// Total in minor currency units
    pub total_cents: u64,

    /// Total formatted for display
    pub formatted_total: String,

    /// The date and time the order was created
    pub created_at: String,
}

impl OrderResponse {
    pub(crate) fn new(order: Order, currency: &str) -> Result<Self, PricingError> {
        Ok(Self {
            formatted_total: format_minor(order.total_cents, currency)?,
            id: order.id.into_string(),
            user_id: order.user_id,
            email: order.email.to_string(),
            status: order.status.to_string(),
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            total_cents: order.total_cents,
            created_at: order.created_at.to_string(),
        })
    }
}
