use clap::Args;
use foundry::orders::OrderId;
use foundry_app::domain::orders::{OrdersService, PgOrdersService};

use super::print_order;

#[derive(Debug, Args)]
pub(crate) struct ShowOrderArgs {
    /// Order id
    #[arg(long)]
    id: String,
}

pub(crate) async fn run(
    service: &PgOrdersService,
    args: ShowOrderArgs,
    currency: &str,
) -> Result<(), String> {
    let order = service
        .get_order(OrderId::new(args.id.as_str()))
        .await
        .map_err(|error| format!("failed to load order: {error}"))?
        .ok_or_else(|| format!("order {} not found", args.id))?;

    print_order(&order, currency);

    Ok(())
}
