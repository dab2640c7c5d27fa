use clap::Args;
use foundry::orders::{OrderId, OrderStatus};
use foundry_app::domain::orders::{OrdersService, PgOrdersService, models::StatusUpdate};

#[derive(Debug, Args)]
pub(crate) struct SetStatusArgs {
    /// Order id
    #[arg(long)]
    id: String,

    /// New status: pending, paid or failed
    #[arg(long)]
    status: OrderStatus,

    /// Payment provider session id to attach
    #[arg(long)]
    session_id: Option<String>,

    /// Payment provider payment intent id to attach
    #[arg(long)]
    payment_intent_id: Option<String>,
}

pub(crate) async fn run(service: &PgOrdersService, args: SetStatusArgs) -> Result<(), String> {
    let order = service
        .update_status(
            OrderId::new(args.id),
            StatusUpdate {
                status: args.status,
                session_id: args.session_id,
                payment_intent_id: args.payment_intent_id,
            },
        )
        .await
        .map_err(|error| format!("failed to update order status: {error}"))?;

    println!("order_id: {}", order.id);
    println!("status: {}", order.status);

    Ok(())
}
