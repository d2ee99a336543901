use std::{collections::BTreeMap, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    menu::group_by_category, CartStore, CheckoutFlow, CheckoutOutcome, FocusProbe, MenuClient,
    Navigator, Platform,
};
use shared::domain::CartItem;
use storage::FileStore;

/// Table-side ordering kiosk: browse the menu, keep a cart per table, and
/// raise the call-waiter deep link.
#[derive(Parser, Debug)]
struct Args {
    /// Table identifier, overriding whatever the kiosk remembered.
    #[arg(long)]
    table: Option<String>,
    #[arg(long, default_value = "./data/kiosk")]
    data_dir: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the menu, grouped by category.
    Menu,
    /// Show the cart and its totals.
    Show,
    /// Add an item to the cart.
    Add {
        id: String,
        name: String,
        price: String,
        #[arg(default_value_t = 1)]
        quantity: u32,
        /// Variant options as key=value pairs.
        #[arg(long)]
        option: Vec<String>,
    },
    /// Empty the cart and delete its persisted record.
    Clear,
    /// Produce the call-waiter deep link and run the fallback flow.
    Call,
}

struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn open(&self, uri: &str) -> Result<()> {
        println!("open: {uri}");
        Ok(())
    }
}

/// A terminal session never loses focus to a wallet app.
struct AlwaysFocused;

impl FocusProbe for AlwaysFocused {
    fn has_focus(&self) -> bool {
        true
    }
}

fn parse_options(pairs: &[String]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .filter_map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();
    let settings = client_core::load_settings();

    let store = Arc::new(FileStore::new(&args.data_dir)?);
    let mut cart = CartStore::open(store, &settings, args.table.as_deref());

    match args.command {
        Command::Menu => {
            let client = MenuClient::new(&settings.menu_base_url)?;
            let dishes = client.fetch_dishes().await?;
            for (category, dishes) in group_by_category(&dishes) {
                println!("{category}");
                for dish in dishes {
                    println!("  {} - {}", dish.name, dish.price);
                }
            }
            for drink in client.fetch_drinks().await? {
                for size in &drink.available_sizes {
                    println!("{} ({}) - {}", drink.name, size.label, size.price);
                }
            }
        }
        Command::Show => {
            println!("Table {}", cart.table());
            for item in cart.items() {
                println!("  {} × {} - {} each", item.quantity, item.name, item.price);
            }
            println!(
                "{} item(s), total {}",
                cart.total_items(),
                cart.total_price()
            );
        }
        Command::Add {
            id,
            name,
            price,
            quantity,
            option,
        } => {
            let mut item = CartItem::new(id, name, price, quantity);
            item.options = parse_options(&option);
            cart.add_item(item);
            println!("{} item(s) in cart", cart.total_items());
        }
        Command::Clear => {
            cart.clear();
            println!("cart cleared");
        }
        Command::Call => {
            let flow = CheckoutFlow::new(
                settings,
                Arc::new(StdoutNavigator),
                Arc::new(AlwaysFocused),
                Platform::Desktop,
            );
            match flow.call_waiter(&mut cart, None).await? {
                CheckoutOutcome::HandedOff => println!("wallet opened"),
                CheckoutOutcome::StoreRedirect { listing_url } => {
                    println!("wallet missing, store listing: {listing_url}")
                }
                CheckoutOutcome::InstallPrompt => {
                    println!("wallet missing, install the Keychain extension to sign")
                }
            }
        }
    }

    Ok(())
}
