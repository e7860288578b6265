//! Cart repository.
//!
//! Every mutation is a single conditional statement (or a short transaction
//! of them), so concurrent requests for the same customer never lose an
//! update to a read-then-write race.

use sqlx::{SqliteConnection, SqlitePool};

use coolcat_core::{CustomerId, VariantId};

use super::RepositoryError;
use super::catalog::VariantDetailRow;
use crate::models::cart::{CartItem, CartLine, MAX_LINE_QUANTITY, RemoveQuantity};
use crate::models::catalog::VariantDetail;

#[derive(sqlx::FromRow)]
struct CartItemRow {
    #[sqlx(flatten)]
    variant: VariantDetailRow,
    quantity: i64,
}

/// Result of adding to a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The line now holds this quantity.
    Added(i64),
    /// The variant does not exist; nothing was written.
    UnknownVariant,
    /// Merging would push the line past [`MAX_LINE_QUANTITY`]; nothing was written.
    OverLimit,
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List a customer's cart lines with variant details.
    ///
    /// Ordered by quantity descending, then variant id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, customer_id: CustomerId) -> Result<Vec<CartItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT v.id AS variant_id, v.product_id, p.name AS product_name,
                   v.name AS variant_name, p.description, c.label AS category,
                   v.unit_price_cents AS unit_price, v.available_quantity, v.image,
                   ci.quantity
            FROM cart_items ci
            JOIN product_variants v ON v.id = ci.product_variant_id
            JOIN products p ON p.id = v.product_id
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE ci.customer_id = ?
            ORDER BY ci.quantity DESC, v.id
            ",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CartItem {
                variant: VariantDetail::from(row.variant),
                quantity: row.quantity,
            })
            .collect())
    }

    /// Add `quantity` of a variant to the cart, merging with an existing line.
    ///
    /// The merge is skipped, leaving the line untouched, when the sum would
    /// exceed [`MAX_LINE_QUANTITY`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn add(
        &self,
        customer_id: CustomerId,
        variant_id: VariantId,
        quantity: i64,
    ) -> Result<AddOutcome, RepositoryError> {
        // The SELECT yields no row for an unknown variant, so nothing is inserted.
        let merged = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO cart_items (customer_id, product_variant_id, quantity)
            SELECT ?, v.id, ?
            FROM product_variants v
            WHERE v.id = ?
            ON CONFLICT (customer_id, product_variant_id) DO UPDATE
            SET quantity = cart_items.quantity + excluded.quantity
            WHERE cart_items.quantity + excluded.quantity <= ?
            RETURNING quantity
            ",
        )
        .bind(customer_id)
        .bind(quantity)
        .bind(variant_id)
        .bind(MAX_LINE_QUANTITY)
        .fetch_optional(self.pool)
        .await?;

        if let Some(total) = merged {
            return Ok(AddOutcome::Added(total));
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM product_variants WHERE id = ?)",
        )
        .bind(variant_id)
        .fetch_one(self.pool)
        .await?;

        Ok(if exists {
            AddOutcome::OverLimit
        } else {
            AddOutcome::UnknownVariant
        })
    }

    /// Remove some or all of a variant from the cart.
    ///
    /// Returns the quantity left on the line, `0` once it is deleted. A line
    /// that does not exist is left alone and reported as `0`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn remove(
        &self,
        customer_id: CustomerId,
        variant_id: VariantId,
        quantity: RemoveQuantity,
    ) -> Result<i64, RepositoryError> {
        let count = match quantity {
            RemoveQuantity::All => {
                sqlx::query(
                    "DELETE FROM cart_items WHERE customer_id = ? AND product_variant_id = ?",
                )
                .bind(customer_id)
                .bind(variant_id)
                .execute(self.pool)
                .await?;
                return Ok(0);
            }
            RemoveQuantity::Count(count) => count,
        };

        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            r"
            DELETE FROM cart_items
            WHERE customer_id = ? AND product_variant_id = ? AND quantity <= ?
            ",
        )
        .bind(customer_id)
        .bind(variant_id)
        .bind(count)
        .execute(&mut *tx)
        .await?;

        let remaining = if deleted.rows_affected() > 0 {
            0
        } else {
            sqlx::query_scalar::<_, i64>(
                r"
                UPDATE cart_items
                SET quantity = quantity - ?
                WHERE customer_id = ? AND product_variant_id = ? AND quantity > ?
                RETURNING quantity
                ",
            )
            .bind(count)
            .bind(customer_id)
            .bind(variant_id)
            .bind(count)
            .fetch_optional(&mut *tx)
            .await?
            .unwrap_or(0)
        };

        tx.commit().await?;
        Ok(remaining)
    }

    /// Read a customer's raw cart lines inside a checkout transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_for_checkout(
        conn: &mut SqliteConnection,
        customer_id: CustomerId,
    ) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(
            r"
            SELECT id, product_variant_id AS variant_id, quantity
            FROM cart_items
            WHERE customer_id = ?
            ORDER BY id
            ",
        )
        .bind(customer_id)
        .fetch_all(conn)
        .await?;

        Ok(lines)
    }

    /// Delete every line of a customer's cart inside a checkout transaction.
    ///
    /// Returns the number of lines deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn clear(
        conn: &mut SqliteConnection,
        customer_id: CustomerId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE customer_id = ?")
            .bind(customer_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}
