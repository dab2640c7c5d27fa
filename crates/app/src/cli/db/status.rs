use clap::Args;
use foundry_app::database;

#[derive(Debug, Args)]
pub(crate) struct StatusArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: StatusArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let states = database::migration_status(&pool)
        .await
        .map_err(|error| format!("failed to read migration state: {error}"))?;

    for state in &states {
        let marker = if state.applied { "applied" } else { "pending" };

        println!("{} {marker} {}", state.version, state.description);
    }

    let pending = states.iter().filter(|state| !state.applied).count();

    println!("{pending} pending of {}", states.len());

    Ok(())
}
