use clap::Args;
use foundry_app::domain::orders::{OrdersService, PgOrdersService};

use super::print_order;

#[derive(Debug, Args)]
pub(crate) struct ListOrdersArgs {
    /// Buyer id
    #[arg(long)]
    user_id: String,
}

pub(crate) async fn run(
    service: &PgOrdersService,
    args: ListOrdersArgs,
    currency: &str,
) -> Result<(), String> {
    let orders = service
        .list_paid_orders(args.user_id.clone())
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    if orders.is_empty() {
        println!("no paid orders found for user {}", args.user_id);
        return Ok(());
    }

    for order in orders {
        print_order(&order, currency);
        println!();
    }

    Ok(())
}
