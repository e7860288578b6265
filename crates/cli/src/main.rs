//! Cool Cat CLI - Database migrations and store administration.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! cc-cli migrate
//!
//! # Insert or refresh the sample tee shirts
//! cc-cli seed catalog
//!
//! # Move an order through fulfillment
//! cc-cli order set-status 12 shipped
//! ```
//!
//! All commands read `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`) from the
//! environment or a `.env` file.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cc-cli")]
#[command(author, version, about = "Cool Cat CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Administer orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert or refresh the sample catalog
    Catalog,
}

#[derive(Subcommand)]
enum OrderAction {
    /// Set an order's status
    SetStatus {
        /// Order ID
        order_id: i64,

        /// New status (e.g. `paid`, `shipped`, `delivered`)
        status: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Catalog => commands::seed::catalog().await?,
        },
        Commands::Order { action } => match action {
            OrderAction::SetStatus { order_id, status } => {
                commands::order::set_status(order_id, &status).await?;
            }
        },
    }
    Ok(())
}
