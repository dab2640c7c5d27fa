//! Orders Repository

use foundry::orders::{
    DownloadToken, EmailAddress, Order, OrderId, OrderItem, OrderStatus, PaymentEvent,
};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json};

use crate::domain::orders::models::StatusUpdate;

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const LIST_PAID_ORDERS_SQL: &str = include_str!("sql/list_paid_orders.sql");
const UPDATE_STATUS_SQL: &str = include_str!("sql/update_status.sql");
const RECORD_PAYMENT_EVENT_SQL: &str = include_str!("sql/record_payment_event.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<Order, sqlx::Error> {
        let total_cents = i64::try_from(order.total_cents).map_err(|e| sqlx::Error::ColumnDecode {
            index: "total_cents".to_string(),
            source: Box::new(e),
        })?;

        let row = query_as::<Postgres, OrderRow>(CREATE_ORDER_SQL)
            .bind(order.id.as_str())
            .bind(&order.user_id)
            .bind(order.email.as_str())
            .bind(Json(&order.items))
            .bind(total_cents)
            .bind(order.status.as_str())
            .bind(order.stripe_payment_intent_id.as_deref())
            .bind(order.stripe_session_id.as_deref())
            .bind(order.download_token.as_str())
            .bind(SqlxTimestamp::from(order.created_at))
            .fetch_one(&mut **tx)
            .await?;

        Ok(row.0)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let row = query_as::<Postgres, OrderRow>(GET_ORDER_SQL)
            .bind(order.as_str())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(|row| row.0))
    }

    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderId,
    ) -> Result<Order, sqlx::Error> {
        let row = query_as::<Postgres, OrderRow>(LOCK_ORDER_SQL)
            .bind(order.as_str())
            .fetch_one(&mut **tx)
            .await?;

        Ok(row.0)
    }

    pub(crate) async fn list_paid_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: &str,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let rows = query_as::<Postgres, OrderRow>(LIST_PAID_ORDERS_SQL)
            .bind(user_id)
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderId,
        update: &StatusUpdate,
    ) -> Result<Order, sqlx::Error> {
        let row = query_as::<Postgres, OrderRow>(UPDATE_STATUS_SQL)
            .bind(order.as_str())
            .bind(update.status.as_str())
            .bind(update.session_id.as_deref())
            .bind(update.payment_intent_id.as_deref())
            .fetch_one(&mut **tx)
            .await?;

        Ok(row.0)
    }

    /// Returns false when the event id was already recorded.
    pub(crate) async fn record_payment_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: &PaymentEvent,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(RECORD_PAYMENT_EVENT_SQL)
            .bind(&event.event_id)
            .bind(event.order_id.as_str())
            .bind(event.status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}

struct OrderRow(Order);

fn decode_error(
    column: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let total_cents_i64: i64 = row.try_get("total_cents")?;
        let total_cents =
            u64::try_from(total_cents_i64).map_err(|e| decode_error("total_cents", e))?;

        let email = EmailAddress::parse(row.try_get::<String, _>("email")?)
            .map_err(|e| decode_error("email", e))?;

        let status = row
            .try_get::<String, _>("status")?
            .parse::<OrderStatus>()
            .map_err(|e| decode_error("status", e))?;

        let Json(items) = row.try_get::<Json<Vec<OrderItem>>, _>("items")?;

        Ok(Self(Order {
            id: OrderId::new(row.try_get::<String, _>("id")?),
            user_id: row.try_get("user_id")?,
            email,
            items,
            total_cents,
            status,
            stripe_payment_intent_id: row.try_get("stripe_payment_intent_id")?,
            stripe_session_id: row.try_get("stripe_session_id")?,
            download_token: DownloadToken::new(row.try_get::<String, _>("download_token")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        }))
    }
}
