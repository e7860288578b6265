//! Order history service.
//!
//! Orders are only ever visible to the customer who placed them.

use std::collections::HashMap;

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::warn;

use coolcat_core::{CustomerId, OrderId};

use crate::db::RepositoryError;
use crate::db::orders::OrderRepository;
use crate::models::cart::QuantityOverflow;
use crate::models::order::{OrderItem, OrderSummary};

/// Errors that can occur while reading order history.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order doesn't exist or belongs to someone else.
    #[error("order not found")]
    NotFound,

    /// Stored quantities cannot be totalled.
    #[error("order totals: {0}")]
    Totals(#[from] QuantityOverflow),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order history service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// A customer's orders, newest first, each with its items and totals.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the orders cannot be read.
    /// Returns `OrderError::Totals` if an order's quantities overflow.
    pub async fn list_orders(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<OrderSummary>, OrderError> {
        let headers = self.orders.list_for_customer(customer_id).await?;

        let mut items: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for (order_id, item) in self.orders.items_for_customer(customer_id).await? {
            items.entry(order_id).or_default().push(item);
        }

        let summaries = headers
            .iter()
            .map(|header| OrderSummary::new(header, items.remove(&header.id).unwrap_or_default()))
            .collect::<Result<_, _>>()?;
        Ok(summaries)
    }

    /// One of the customer's orders.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist or is owned
    /// by another customer.
    pub async fn get_order(
        &self,
        customer_id: CustomerId,
        order_id: OrderId,
    ) -> Result<OrderSummary, OrderError> {
        let header = self
            .orders
            .get(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if header.customer_id != customer_id {
            warn!(
                customer_id = %customer_id,
                order_id = %order_id,
                "Customer requested another customer's order"
            );
            return Err(OrderError::NotFound);
        }

        let items = self.orders.items(order_id).await?;
        Ok(OrderSummary::new(&header, items)?)
    }
}
