use std::path::PathBuf;

use clap::{Args, Subcommand};
use foundry::{
    cart::{CartItem, CartItemKey, FileCartStore, PersistedCart},
    pricing::format_minor,
};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    /// Cart snapshot file
    #[arg(
        long,
        global = true,
        env = "FOUNDRY_CART_FILE",
        default_value = "foundry-cart.json"
    )]
    cart_file: PathBuf,

    /// Currency used when printing totals
    #[arg(long, global = true, default_value = "USD")]
    currency: String,

    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add a font license unless it is already in the cart
    Add(AddArgs),

    /// Remove a font license by key (studioId:studioSlug:typefaceSlug:fontId)
    Remove(RemoveArgs),

    /// Empty the cart
    Clear,

    /// Print items and total
    Show,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    font_id: String,

    #[arg(long)]
    typeface_slug: String,

    #[arg(long)]
    studio_id: String,

    #[arg(long)]
    studio_slug: String,

    /// Price in minor units
    #[arg(long)]
    price: u64,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    #[arg(long)]
    key: CartItemKey,
}

pub(crate) fn run(command: CartCommand) -> Result<(), String> {
    let mut cart = PersistedCart::load(FileCartStore::new(command.cart_file));

    match command.command {
        CartSubcommand::Add(args) => {
            let item = CartItem {
                font_id: args.font_id,
                typeface_slug: args.typeface_slug,
                studio_id: args.studio_id,
                studio_slug: args.studio_slug,
                price: args.price,
            };
            let key = item.key();

            if cart.add_item(item) {
                println!("added {key}");
            } else {
                println!("{key} is already in the cart");
            }
        }
        CartSubcommand::Remove(args) => match cart.remove_item(&args.key) {
            Some(_) => println!("removed {}", args.key),
            None => println!("{} is not in the cart", args.key),
        },
        CartSubcommand::Clear => {
            cart.clear();
            println!("cart cleared");
        }
        CartSubcommand::Show => {
            for item in cart.cart().iter() {
                println!("{} {}", item.key(), item.price);
            }
        }
    }

    let total_cents = cart
        .total()
        .ok_or_else(|| "cart total overflows".to_string())?;

    let total = format_minor(total_cents, &command.currency)
        .map_err(|error| format!("failed to format total: {error}"))?;

    println!("items: {}", cart.cart().len());
    println!("total: {total}");

    Ok(())
}
