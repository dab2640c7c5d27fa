//! Download access gate.

use std::sync::Arc;

use async_trait::async_trait;
use foundry::orders::{Order, OrderId};
use mockall::automock;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::orders::OrdersService;

/// Uniform denial for every failed download lookup.
///
/// Unknown orders, wrong tokens and storage failures are indistinguishable to
/// the caller so order ids cannot be enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("order not found or link expired")]
pub struct DownloadDenied;

#[derive(Clone)]
pub struct OrderDownloadsService {
    orders: Arc<dyn OrdersService>,
}

impl OrderDownloadsService {
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersService>) -> Self {
        Self { orders }
    }
}

#[async_trait]
impl DownloadsService for OrderDownloadsService {
    async fn resolve(&self, order: OrderId, token: String) -> Result<Order, DownloadDenied> {
        let found = match self.orders.get_order(order.clone()).await {
            Ok(found) => found,
            Err(error) => {
                warn!(%order, %error, "download lookup failed");

                return Err(DownloadDenied);
            }
        };

        let Some(found) = found else {
            debug!(%order, "download denied: unknown order");

            return Err(DownloadDenied);
        };

        if !found.download_token.matches(&token) {
            debug!(%order, "download denied: token mismatch");

            return Err(DownloadDenied);
        }

        Ok(found)
    }
}

#[automock]
#[async_trait]
pub trait DownloadsService: Send + Sync {
    /// Exchange an order id and presented token for the order.
    ///
    /// Access rests on the token alone; the order's payment status is not
    /// consulted.
    async fn resolve(&self, order: OrderId, token: String) -> Result<Order, DownloadDenied>;
}

#[cfg(test)]
mod tests {
    use foundry::orders::{DownloadToken, EmailAddress, OrderStatus};
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::domain::orders::{MockOrdersService, OrdersServiceError};

    use super::*;

    fn order(id: &str, token: &str, status: OrderStatus) -> TestResult<Order> {
        Ok(Order {
            id: OrderId::new(id),
            user_id: "user-1".to_string(),
            email: EmailAddress::parse("buyer@example.com")?,
            items: Vec::new(),
            total_cents: 0,
            status,
            stripe_payment_intent_id: None,
            stripe_session_id: None,
            download_token: DownloadToken::new(token),
            created_at: Timestamp::from_second(1_700_000_000)?,
        })
    }

    fn gate(orders: MockOrdersService) -> OrderDownloadsService {
        OrderDownloadsService::new(Arc::new(orders))
    }

    fn store_with(found: Order) -> MockOrdersService {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(|id| id.as_str() == "ord-1")
            .return_once(move |_| Ok(Some(found)));

        orders
    }

    #[tokio::test]
    async fn matching_token_grants_the_order() -> TestResult {
        let expected = order("ord-1", "tok-1", OrderStatus::Paid)?;

        let resolved = gate(store_with(expected.clone()))
            .resolve(OrderId::new("ord-1"), "tok-1".to_string())
            .await?;

        assert_eq!(resolved, expected);

        Ok(())
    }

    #[tokio::test]
    async fn unpaid_order_is_granted_with_its_token() -> TestResult {
        let pending = order("ord-1", "tok-1", OrderStatus::Pending)?;

        let resolved = gate(store_with(pending))
            .resolve(OrderId::new("ord-1"), "tok-1".to_string())
            .await?;

        assert_eq!(resolved.status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn wrong_token_is_denied() -> TestResult {
        let found = order("ord-1", "tok-1", OrderStatus::Paid)?;

        let result = gate(store_with(found))
            .resolve(OrderId::new("ord-1"), "tok-2".to_string())
            .await;

        assert_eq!(result, Err(DownloadDenied));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_order_is_denied() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_| Ok(None));

        let result = gate(orders)
            .resolve(OrderId::new("missing"), "tok-1".to_string())
            .await;

        assert_eq!(result, Err(DownloadDenied));
    }

    #[tokio::test]
    async fn storage_failure_is_denied() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let result = gate(orders)
            .resolve(OrderId::new("ord-1"), "tok-1".to_string())
            .await;

        assert_eq!(result, Err(DownloadDenied));
    }

    #[test]
    fn denial_message_is_generic() {
        assert_eq!(DownloadDenied.to_string(), "order not found or link expired");
    }
}
