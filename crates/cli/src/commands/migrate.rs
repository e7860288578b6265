//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! cc-cli migrate
//! ```
//!
//! Migrations are embedded from `crates/storefront/migrations/`. The
//! storefront binary also applies them at startup.

use super::{CommandError, connect};
use coolcat_storefront::db::MIGRATOR;

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database cannot be opened or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running storefront migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
