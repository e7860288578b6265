//! Order repository.
//!
//! Orders are only created by checkout, through the connection-scoped
//! functions that run inside its transaction. History reads go through the
//! pool.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use coolcat_core::{CustomerId, OrderId, OrderLineId, OrderStatus, Price, VariantId};

use super::RepositoryError;
use crate::models::catalog::VariantDetail;
use crate::models::order::{OrderHeader, OrderItem, OrderLine};

/// An order line joined with its variant for display.
#[derive(sqlx::FromRow)]
struct OrderItemRow {
    line_id: OrderLineId,
    order_id: OrderId,
    variant_id: VariantId,
    product_name: Option<String>,
    variant_name: Option<String>,
    image: Option<String>,
    quantity: i64,
    unit_price: Price,
}

impl OrderItemRow {
    fn into_item(self) -> (OrderId, OrderItem) {
        let name = self.product_name.as_deref().map_or_else(
            || format!("Variant {}", self.variant_id),
            |product| VariantDetail::display_name(product, self.variant_name.as_deref()),
        );
        (
            self.order_id,
            OrderItem {
                line_id: self.line_id,
                variant_id: self.variant_id,
                name,
                image: self.image,
                quantity: self.quantity,
                unit_price: self.unit_price,
                line_total: self.unit_price.times(self.quantity),
            },
        )
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new order in `PendingPayment` status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn insert_order(
        conn: &mut SqliteConnection,
        customer_id: CustomerId,
        now: DateTime<Utc>,
    ) -> Result<OrderHeader, RepositoryError> {
        let header = sqlx::query_as::<_, OrderHeader>(
            r"
            INSERT INTO orders (customer_id, status, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, customer_id, status, created_at, updated_at
            ",
        )
        .bind(customer_id)
        .bind(OrderStatus::PendingPayment)
        .bind(now)
        .bind(now)
        .fetch_one(conn)
        .await?;

        Ok(header)
    }

    /// Insert an order line priced at the variant's current unit price.
    ///
    /// Returns `None` if the variant no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn insert_line_at_current_price(
        conn: &mut SqliteConnection,
        order_id: OrderId,
        variant_id: VariantId,
        quantity: i64,
    ) -> Result<Option<OrderLine>, RepositoryError> {
        let line = sqlx::query_as::<_, OrderLine>(
            r"
            INSERT INTO order_items (order_id, product_variant_id, quantity, unit_price_cents)
            SELECT ?, v.id, ?, v.unit_price_cents
            FROM product_variants v
            WHERE v.id = ?
            RETURNING id, order_id, product_variant_id AS variant_id, quantity,
                      unit_price_cents AS unit_price
            ",
        )
        .bind(order_id)
        .bind(quantity)
        .bind(variant_id)
        .fetch_optional(conn)
        .await?;

        Ok(line)
    }

    /// Get an order by ID, whoever owns it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<OrderHeader>, RepositoryError> {
        let header = sqlx::query_as::<_, OrderHeader>(
            "SELECT id, customer_id, status, created_at, updated_at FROM orders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(header)
    }

    /// List a customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<OrderHeader>, RepositoryError> {
        let headers = sqlx::query_as::<_, OrderHeader>(
            r"
            SELECT id, customer_id, status, created_at, updated_at
            FROM orders
            WHERE customer_id = ?
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(headers)
    }

    /// Items of one order, by line total descending then line id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT oi.id AS line_id, oi.order_id, oi.product_variant_id AS variant_id,
                   p.name AS product_name, v.name AS variant_name, v.image,
                   oi.quantity, oi.unit_price_cents AS unit_price
            FROM order_items oi
            LEFT JOIN product_variants v ON v.id = oi.product_variant_id
            LEFT JOIN products p ON p.id = v.product_id
            WHERE oi.order_id = ?
            ORDER BY oi.quantity * oi.unit_price_cents DESC, oi.id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.into_item().1).collect())
    }

    /// Items of every order a customer owns, tagged with their order ID.
    ///
    /// Within an order, items are ordered by line total descending then line id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<(OrderId, OrderItem)>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT oi.id AS line_id, oi.order_id, oi.product_variant_id AS variant_id,
                   p.name AS product_name, v.name AS variant_name, v.image,
                   oi.quantity, oi.unit_price_cents AS unit_price
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            LEFT JOIN product_variants v ON v.id = oi.product_variant_id
            LEFT JOIN products p ON p.id = v.product_id
            WHERE o.customer_id = ?
            ORDER BY oi.order_id, oi.quantity * oi.unit_price_cents DESC, oi.id
            ",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItemRow::into_item).collect())
    }

    /// Set an order's status.
    ///
    /// Any status may follow any other.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderHeader, RepositoryError> {
        sqlx::query_as::<_, OrderHeader>(
            r"
            UPDATE orders
            SET status = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, customer_id, status, created_at, updated_at
            ",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}
