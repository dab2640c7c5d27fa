//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use foundry::{
    cart::Cart,
    orders::{
        DownloadToken, EmailAddress, FieldErrorKind, MAX_STORED_AMOUNT, NewOrder, Order, OrderId,
        OrderItem, OrderStatus, PaymentEvent, ValidationErrors,
    },
};
use mockall::automock;
use tracing::{info, warn};

use crate::{
    domain::{
        checkout::{errors::CheckoutError, models::CheckoutRequest},
        orders::{OrdersService, OrdersServiceError, models::PaymentOutcome},
    },
    integrations::{Mailer, MailingList},
};

#[derive(Clone)]
pub struct OrderCheckoutService {
    orders: Arc<dyn OrdersService>,
    mailer: Arc<dyn Mailer>,
    mailing_list: Arc<dyn MailingList>,
}

impl OrderCheckoutService {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersService>,
        mailer: Arc<dyn Mailer>,
        mailing_list: Arc<dyn MailingList>,
    ) -> Self {
        Self {
            orders,
            mailer,
            mailing_list,
        }
    }
}

/// Collapse repeated selections through the cart, keeping the first of each.
///
/// The total is `None` when it overflows.
fn aggregate(lines: Vec<OrderItem>) -> (Vec<OrderItem>, Option<u64>) {
    let mut cart = Cart::new();
    let mut items = Vec::with_capacity(lines.len());

    for line in lines {
        if cart.add_item(line.cart_item()) {
            items.push(line);
        }
    }

    (items, cart.total())
}

#[async_trait]
impl CheckoutService for OrderCheckoutService {
    async fn place_order(&self, request: CheckoutRequest) -> Result<Order, CheckoutError> {
        let email = EmailAddress::parse(request.email)
            .map_err(|_invalid| ValidationErrors::field("email", FieldErrorKind::InvalidEmail))?;

        let (items, total_cents) = aggregate(request.lines);

        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let total_cents = total_cents
            .filter(|total| *total <= MAX_STORED_AMOUNT)
            .ok_or_else(|| ValidationErrors::field("totalCents", FieldErrorKind::OutOfRange))?;

        let order = self
            .orders
            .create_order(NewOrder {
                id: OrderId::generate(),
                user_id: request.user_id,
                email: email.clone(),
                items,
                total_cents,
                status: OrderStatus::Pending,
                stripe_payment_intent_id: None,
                stripe_session_id: None,
                download_token: DownloadToken::generate(),
                created_at: None,
            })
            .await?;

        if request.subscribe
            && let Err(error) = self.mailing_list.subscribe(email, None).await
        {
            warn!(order = %order.id, %error, "newsletter subscription failed");
        }

        Ok(order)
    }

    async fn confirm_payment(
        &self,
        event: PaymentEvent,
    ) -> Result<PaymentOutcome, OrdersServiceError> {
        let outcome = self.orders.apply_payment_event(event).await?;

        if let Some(order) = outcome.newly_paid() {
            match self
                .mailer
                .send_download_link(
                    order.email.clone(),
                    order.id.clone(),
                    order.download_token.clone(),
                )
                .await
            {
                Ok(()) => info!(order = %order.id, "download link sent"),
                Err(error) => warn!(order = %order.id, %error, "download link mail failed"),
            }
        }

        Ok(outcome)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Freeze the selection into a pending order with a fresh download token.
    async fn place_order(&self, request: CheckoutRequest) -> Result<Order, CheckoutError>;

    /// Apply a payment notification and mail the download link once paid.
    async fn confirm_payment(
        &self,
        event: PaymentEvent,
    ) -> Result<PaymentOutcome, OrdersServiceError>;
}
