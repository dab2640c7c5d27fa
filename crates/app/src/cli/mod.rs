use clap::{Parser, Subcommand};

mod cart;
mod db;
mod order;

#[derive(Debug, Parser)]
#[command(name = "foundry-app", about = "Foundry operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Order(order::OrderCommand),
    Cart(cart::CartCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Order(command) => order::run(command).await,
            Commands::Cart(command) => cart::run(command),
        }
    }
}
