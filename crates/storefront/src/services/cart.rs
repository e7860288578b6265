//! Cart service.
//!
//! Quantities are validated here; merging and flooring happen atomically in
//! [`CartRepository`].

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, instrument};

use coolcat_core::{CustomerId, VariantId};

use crate::db::RepositoryError;
use crate::db::cart::{AddOutcome, CartRepository};
use crate::models::cart::{CartItem, CartSummary, MAX_LINE_QUANTITY, QuantityOverflow, RemoveQuantity};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantities must be between 1 and [`MAX_LINE_QUANTITY`].
    #[error("quantity must be between 1 and {max} (got {0})", max = MAX_LINE_QUANTITY)]
    InvalidQuantity(i64),

    /// The line already holds too many to add this quantity.
    #[error("a cart line holds at most {max}", max = MAX_LINE_QUANTITY)]
    LineFull,

    /// The variant does not exist.
    #[error("variant {0} does not exist")]
    InvalidVariant(VariantId),

    /// Stored quantities cannot be totalled.
    #[error("cart totals: {0}")]
    Totals(#[from] QuantityOverflow),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart service.
pub struct CartService<'a> {
    cart: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            cart: CartRepository::new(pool),
        }
    }

    /// A customer's cart lines, largest quantity first.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the cart cannot be read.
    pub async fn get_cart(&self, customer_id: CustomerId) -> Result<Vec<CartItem>, CartError> {
        Ok(self.cart.list(customer_id).await?)
    }

    /// A customer's cart with its totals.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the cart cannot be read.
    /// Returns `CartError::Totals` if the stored quantities overflow.
    pub async fn get_summary(&self, customer_id: CustomerId) -> Result<CartSummary, CartError> {
        let items = self.get_cart(customer_id).await?;
        Ok(CartSummary::new(items)?)
    }

    /// Add `quantity` of a variant, merging into an existing line.
    ///
    /// Returns the line's resulting quantity. Availability is not checked.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity` is outside
    /// `1..=MAX_LINE_QUANTITY`.
    /// Returns `CartError::InvalidVariant` if the variant doesn't exist.
    /// Returns `CartError::LineFull` if the merged line would exceed the limit.
    #[instrument(skip(self), fields(customer_id = %customer_id, variant_id = %variant_id))]
    pub async fn add(
        &self,
        customer_id: CustomerId,
        variant_id: VariantId,
        quantity: i64,
    ) -> Result<i64, CartError> {
        if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
            return Err(CartError::InvalidQuantity(quantity));
        }

        match self.cart.add(customer_id, variant_id, quantity).await? {
            AddOutcome::Added(total) => {
                debug!(quantity = total, "Cart line updated");
                Ok(total)
            }
            AddOutcome::UnknownVariant => Err(CartError::InvalidVariant(variant_id)),
            AddOutcome::OverLimit => {
                debug!(quantity, "Cart line is full");
                Err(CartError::LineFull)
            }
        }
    }

    /// Remove some or all of a variant.
    ///
    /// Returns the quantity left on the line (`0` once removed). Removing a
    /// variant that is not in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a count below 1. Counts above
    /// [`MAX_LINE_QUANTITY`] empty the line like any count at least its size.
    #[instrument(skip(self), fields(customer_id = %customer_id, variant_id = %variant_id))]
    pub async fn remove(
        &self,
        customer_id: CustomerId,
        variant_id: VariantId,
        quantity: RemoveQuantity,
    ) -> Result<i64, CartError> {
        if let RemoveQuantity::Count(count) = quantity
            && count < 1
        {
            return Err(CartError::InvalidQuantity(count));
        }
        let quantity = match quantity {
            RemoveQuantity::Count(count) => RemoveQuantity::Count(count.min(MAX_LINE_QUANTITY)),
            all @ RemoveQuantity::All => all,
        };

        let remaining = self.cart.remove(customer_id, variant_id, quantity).await?;
        debug!(remaining, "Cart line reduced");
        Ok(remaining)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    #[tokio::test]
    async fn test_add_rejects_out_of_range_quantity() {
        let pool = create_memory_pool().await.unwrap();
        let cart = CartService::new(&pool);

        for quantity in [0, -3, MAX_LINE_QUANTITY + 1, i64::MAX] {
            assert!(matches!(
                cart.add(CustomerId::new(1), VariantId::new(1), quantity).await,
                Err(CartError::InvalidQuantity(q)) if q == quantity
            ));
        }
    }

    #[tokio::test]
    async fn test_remove_rejects_non_positive_count() {
        let pool = create_memory_pool().await.unwrap();
        let cart = CartService::new(&pool);

        assert!(matches!(
            cart.remove(CustomerId::new(1), VariantId::new(1), RemoveQuantity::Count(0))
                .await,
            Err(CartError::InvalidQuantity(0))
        ));
    }

    #[tokio::test]
    async fn test_add_unknown_variant() {
        let pool = create_memory_pool().await.unwrap();
        let cart = CartService::new(&pool);

        assert!(matches!(
            cart.add(CustomerId::new(1), VariantId::new(42), 1).await,
            Err(CartError::InvalidVariant(id)) if id == VariantId::new(42)
        ));
    }
}
