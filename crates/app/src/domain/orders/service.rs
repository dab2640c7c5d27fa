//! Orders service.

use async_trait::async_trait;
use foundry::orders::{NewOrder, Order, OrderId, PaymentEvent, check};
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::orders::{
        errors::OrdersServiceError,
        models::{PaymentOutcome, StatusUpdate},
        repository::PgOrdersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        check(&order)?;

        let order = order.into_order(Timestamp::now());

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_order(&mut tx, &order).await?;

        tx.commit().await?;

        info!(order = %created.id, total_cents = created.total_cents, "order created");

        Ok(created)
    }

    async fn get_order(&self, order: OrderId) -> Result<Option<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.repository.get_order(&mut tx, &order).await?;

        tx.commit().await?;

        Ok(found)
    }

    async fn list_paid_orders(&self, user_id: String) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.repository.list_paid_orders(&mut tx, &user_id).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn update_status(
        &self,
        order: OrderId,
        update: StatusUpdate,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_status(&mut tx, &order, &update)
            .await?;

        tx.commit().await?;

        info!(order = %updated.id, status = %updated.status, "order status updated");

        Ok(updated)
    }

    async fn apply_payment_event(
        &self,
        event: PaymentEvent,
    ) -> Result<PaymentOutcome, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.repository.lock_order(&mut tx, &event.order_id).await?;

        if !self.repository.record_payment_event(&mut tx, &event).await? {
            debug!(event = %event.event_id, order = %event.order_id, "duplicate payment event");

            return Ok(PaymentOutcome::Duplicate);
        }

        if !current.status.can_transition_to(event.status) {
            tx.commit().await?;

            info!(
                event = %event.event_id,
                order = %current.id,
                from = %current.status,
                to = %event.status,
                "payment event ignored"
            );

            return Ok(PaymentOutcome::Ignored { order: current });
        }

        let updated = self
            .repository
            .update_status(&mut tx, &event.order_id, &StatusUpdate::from(&event))
            .await?;

        tx.commit().await?;

        info!(
            event = %event.event_id,
            order = %updated.id,
            from = %current.status,
            to = %updated.status,
            "payment event applied"
        );

        Ok(PaymentOutcome::Applied {
            order: updated,
            previous: current.status,
        })
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Validate and persist a new order, stamping `created_at` when absent.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;

    /// Fetch an order by id; a missing order is `None`, not an error.
    async fn get_order(&self, order: OrderId) -> Result<Option<Order>, OrdersServiceError>;

    /// Paid orders for a user, newest first.
    async fn list_paid_orders(&self, user_id: String) -> Result<Vec<Order>, OrdersServiceError>;

    /// Set the status and attach any given payment references. Last write wins.
    async fn update_status(
        &self,
        order: OrderId,
        update: StatusUpdate,
    ) -> Result<Order, OrdersServiceError>;

    /// Apply a payment notification at most once per event id.
    async fn apply_payment_event(
        &self,
        event: PaymentEvent,
    ) -> Result<PaymentOutcome, OrdersServiceError>;
}
