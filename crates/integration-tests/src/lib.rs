//! Integration tests for the Cool Cat storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p coolcat-integration-tests
//! ```
//!
//! Every test opens its own in-memory `SQLite` database through
//! [`TestStore`], so tests need no running server or database and never
//! share state. Tests that need several connections racing each other use
//! [`TestStore::on_disk`], a WAL database file in the temp directory.
//!
//! # Test Categories
//!
//! - `accounts` - Signup, login and stored credentials
//! - `cart` - Cart merging and removal
//! - `checkout` - Order placement, atomicity and order history

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::path::PathBuf;

use secrecy::SecretString;
use sqlx::SqlitePool;

use coolcat_core::{CustomerId, Price, VariantId};
use coolcat_storefront::db::{CatalogRepository, MIGRATOR, create_memory_pool, create_pool};
use coolcat_storefront::models::{Customer, NewProduct, NewVariant};
use coolcat_storefront::services::AccountService;

/// A migrated in-memory store with fixture helpers.
pub struct TestStore {
    pub pool: SqlitePool,
    file: Option<PathBuf>,
}

impl TestStore {
    /// Open a fresh store with all migrations applied.
    pub async fn new() -> Self {
        let pool = create_memory_pool()
            .await
            .expect("Failed to create in-memory database");
        Self { pool, file: None }
    }

    /// Open a fresh file-backed store with `max_connections` pooled connections.
    ///
    /// The database file is deleted when the store is dropped.
    pub async fn on_disk(max_connections: u32) -> Self {
        let file = std::env::temp_dir().join(format!("coolcat-test-{}.db", uuid::Uuid::new_v4()));
        let url = SecretString::from(format!("sqlite://{}", file.display()));

        let pool = create_pool(&url, max_connections)
            .await
            .expect("Failed to create database file");
        MIGRATOR
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            file: Some(file),
        }
    }

    /// Sign up a customer with the given contact and password.
    pub async fn customer(&self, contact: &str, password: &str) -> Customer {
        AccountService::new(&self.pool)
            .signup("Test", "Customer", contact, password)
            .await
            .expect("Failed to sign up test customer")
    }

    /// Create a product with one variant per `(name, price_cents)` pair.
    ///
    /// Variant IDs are returned in the order given.
    pub async fn product(&self, name: &str, variants: &[(&str, i64)]) -> Vec<VariantId> {
        let catalog = CatalogRepository::new(&self.pool);
        let product_id = catalog
            .upsert_product(&NewProduct {
                name: name.to_string(),
                description: format!("{name} description"),
                category_id: None,
            })
            .await
            .expect("Failed to create test product");

        let mut ids = Vec::with_capacity(variants.len());
        for (variant, cents) in variants {
            let id = catalog
                .upsert_variant(
                    product_id,
                    &NewVariant {
                        name: (*variant).to_string(),
                        unit_price: Price::from_cents(*cents).expect("Invalid test price"),
                        available_quantity: 5,
                        image: None,
                    },
                )
                .await
                .expect("Failed to create test variant");
            ids.push(id);
        }
        ids
    }

    /// Number of rows in a table.
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows")
    }

    /// Quantity of a variant in a customer's cart, if it has a line.
    pub async fn cart_quantity(&self, customer: CustomerId, variant: VariantId) -> Option<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT quantity FROM cart_items WHERE customer_id = ? AND product_variant_id = ?",
        )
        .bind(customer)
        .bind(variant)
        .fetch_optional(&self.pool)
        .await
        .expect("Failed to read cart line")
    }
}

impl Drop for TestStore {
    fn drop(&mut self) {
        if let Some(file) = &self.file {
            for suffix in ["", "-wal", "-shm"] {
                let _ = std::fs::remove_file(format!("{}{suffix}", file.display()));
            }
        }
    }
}
