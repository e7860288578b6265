//! Checkout service.
//!
//! Turns a customer's cart into an order in a single transaction: the order
//! row, one line per cart line at the variant's current price, and the
//! emptied cart are committed together or not at all.

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, instrument, warn};

use coolcat_core::{CustomerId, VariantId};

use crate::db::RepositoryError;
use crate::db::cart::CartRepository;
use crate::db::orders::OrderRepository;
use crate::models::order::Order;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line refers to a variant that no longer exists.
    #[error("variant {0} is no longer available")]
    VariantUnavailable(VariantId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Place an order for everything in the customer's cart.
    ///
    /// The order starts as `PendingPayment`. On any error the transaction is
    /// dropped uncommitted, leaving no order and an untouched cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines.
    /// Returns `CheckoutError::VariantUnavailable` if a line's variant is gone.
    /// Returns `CheckoutError::Repository` if any statement fails.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn place_order(&self, customer_id: CustomerId) -> Result<Order, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        // Writing first takes the database write lock before the cart is read.
        let header = OrderRepository::insert_order(&mut tx, customer_id, Utc::now()).await?;

        let cart = CartRepository::lines_for_checkout(&mut tx, customer_id).await?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut lines = Vec::with_capacity(cart.len());
        for cart_line in &cart {
            let Some(line) = OrderRepository::insert_line_at_current_price(
                &mut tx,
                header.id,
                cart_line.variant_id,
                cart_line.quantity,
            )
            .await?
            else {
                warn!(variant_id = %cart_line.variant_id, "Cart line variant vanished at checkout");
                return Err(CheckoutError::VariantUnavailable(cart_line.variant_id));
            };
            lines.push(line);
        }

        CartRepository::clear(&mut tx, customer_id).await?;
        tx.commit().await?;

        info!(order_id = %header.id, line_count = lines.len(), "Order placed");
        Ok(Order { header, lines })
    }
}
