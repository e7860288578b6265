//! CLI command implementations.

pub mod migrate;
pub mod order;
pub mod seed;

use sqlx::SqlitePool;
use thiserror::Error;

use coolcat_storefront::config::{ConfigError, StorefrontConfig};
use coolcat_storefront::db::{self, RepositoryError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Invalid command argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Connect to the storefront database named by the environment.
///
/// Uses the same variables as the storefront binary
/// (`STOREFRONT_DATABASE_URL`, falling back to `DATABASE_URL`).
async fn connect() -> Result<SqlitePool, CommandError> {
    let config = StorefrontConfig::from_env()?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    Ok(pool)
}
