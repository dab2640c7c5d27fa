use clap::{Args, Subcommand};
use foundry::{orders::Order, pricing::format_minor};
use foundry_app::{database, database::Db, domain::orders::PgOrdersService};

mod list;
mod set_status;
mod show;

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    /// PostgreSQL connection string
    #[arg(long, global = true, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Currency used when printing totals
    #[arg(long, global = true, default_value = "USD")]
    currency: String,

    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Print a single order
    Show(show::ShowOrderArgs),

    /// List a user's paid orders, newest first
    List(list::ListOrdersArgs),

    /// Overwrite an order's status
    SetStatus(set_status::SetStatusArgs),
}

pub(crate) async fn run(command: OrderCommand) -> Result<(), String> {
    let database_url = command
        .database_url
        .ok_or_else(|| "--database-url or DATABASE_URL is required".to_string())?;

    let pool = database::connect(&database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgOrdersService::new(Db::new(pool));

    match command.command {
        OrderSubcommand::Show(args) => show::run(&service, args, &command.currency).await,
        OrderSubcommand::List(args) => list::run(&service, args, &command.currency).await,
        OrderSubcommand::SetStatus(args) => set_status::run(&service, args).await,
    }
}

fn print_order(order: &Order, currency: &str) {
    let total = format_minor(order.total_cents, currency)
        .unwrap_or_else(|_| format!("{} minor units", order.total_cents));

    println!("order_id: {}", order.id);
    println!("user_id: {}", order.user_id);
    println!("email: {}", order.email);
    println!("status: {}", order.status);
    println!("total: {total}");
    println!("created_at: {}", order.created_at);
    println!(
        "stripe_session_id: {}",
        order.stripe_session_id.as_deref().unwrap_or("none")
    );
    println!(
        "stripe_payment_intent_id: {}",
        order.stripe_payment_intent_id.as_deref().unwrap_or("none")
    );

    for item in &order.items {
        println!(
            "  - {} ({}) {} files",
            item.full_name,
            item.studio_slug,
            item.sales_file_urls.len()
        );
    }
}
