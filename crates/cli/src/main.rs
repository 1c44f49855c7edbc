//! Voltshop CLI - Browse the catalog and manage a cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List promoted smartphones
//! vs-cli catalog list --category smartphones --promotions
//!
//! # Put two adapters in the cart and look at it
//! vs-cli cart add starlink -q 2
//! vs-cli cart show
//!
//! # Price after a 15% discount, in 10 installments
//! vs-cli price discount 11999.90 --percent 15 --installments 10
//! ```
//!
//! # Commands
//!
//! - `catalog` - List and inspect products
//! - `cart` - Add, remove, update, show, and clear the persisted cart
//! - `price` - Discount and installment arithmetic
//!
//! The cart is stored under `STOREFRONT_DATA_DIR` and survives between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voltshop_storefront::{AppError, StorefrontConfig};

mod commands;

#[derive(Parser)]
#[command(name = "vs-cli")]
#[command(author, version, about = "Voltshop storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Price calculations
    Price {
        #[command(subcommand)]
        action: PriceAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products, optionally filtered
    List {
        /// Category slug or name (repeatable)
        #[arg(short, long)]
        category: Vec<String>,

        /// Brand name (repeatable)
        #[arg(short, long)]
        brand: Vec<String>,

        /// Text to search in name, brand, and description
        #[arg(short, long)]
        query: Option<String>,

        /// Only products on sale
        #[arg(short, long)]
        promotions: bool,
    },
    /// Show one product
    Show {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a catalog product
    Add {
        /// Product ID
        id: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product
    Remove {
        /// Product ID
        id: String,
    },
    /// Set a product's quantity (0 removes it)
    Update {
        /// Product ID
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Show cart contents and totals
    Show,
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum PriceAction {
    /// Apply a percentage discount
    Discount {
        /// Base price
        base: Decimal,

        /// Discount percentage (0-100)
        #[arg(short, long)]
        percent: Option<Decimal>,

        /// Also split the result into this many installments
        #[arg(short, long)]
        installments: Option<u32>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[allow(clippy::print_stdout, clippy::print_stderr)]
fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "voltshop_storefront=info,vs_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    match run(cli, &config) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            e.report();
            eprintln!("error: {}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli, config: &StorefrontConfig) -> Result<String, AppError> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                category,
                brand,
                query,
                promotions,
            } => commands::catalog::list(config, &category, &brand, query, promotions),
            CatalogAction::Show { id } => commands::catalog::show(config, &id),
        },
        Commands::Cart { action } => {
            let mut cart = commands::cart::open(config);
            match action {
                CartAction::Add { id, quantity } => commands::cart::add(&mut cart, config, &id, quantity),
                CartAction::Remove { id } => Ok(commands::cart::remove(&mut cart, &id)),
                CartAction::Update { id, quantity } => {
                    commands::cart::update(&mut cart, config, &id, quantity)
                }
                CartAction::Show => Ok(commands::cart::show(&cart, config)),
                CartAction::Clear => Ok(commands::cart::clear(&mut cart)),
            }
        }
        Commands::Price { action } => match action {
            PriceAction::Discount {
                base,
                percent,
                installments,
            } => commands::price::discount(config, base, percent, installments),
        },
    }
}
