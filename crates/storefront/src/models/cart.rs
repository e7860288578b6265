//! Cart domain types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use coolcat_core::{CartLineId, Price, VariantId};

use super::catalog::VariantDetail;

/// Largest quantity a single cart or order line may hold.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Line quantities summed past what an `i64` can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("total quantity is out of range")]
pub struct QuantityOverflow;

/// Sum line quantities without wrapping or panicking.
pub(crate) fn total_quantity(
    quantities: impl IntoIterator<Item = i64>,
) -> Result<i64, QuantityOverflow> {
    quantities
        .into_iter()
        .try_fold(0_i64, i64::checked_add)
        .ok_or(QuantityOverflow)
}

/// A cart line joined with its variant details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItem {
    pub variant: VariantDetail,
    /// Between 1 and [`MAX_LINE_QUANTITY`].
    pub quantity: i64,
}

impl CartItem {
    /// Quantity times the variant's current unit price.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.variant.unit_price.times(self.quantity)
    }
}

/// A raw cart line, as read by checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct CartLine {
    pub id: CartLineId,
    pub variant_id: VariantId,
    pub quantity: i64,
}

/// How much of a line to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveQuantity {
    /// Delete the whole line.
    #[default]
    All,
    /// Decrement by this many, deleting the line once nothing is left.
    Count(i64),
}

impl From<Option<i64>> for RemoveQuantity {
    fn from(quantity: Option<i64>) -> Self {
        quantity.map_or(Self::All, Self::Count)
    }
}

/// A customer's cart with computed totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    /// Sum of line quantities.
    pub total_items: i64,
    /// Sum of line totals at current prices.
    pub subtotal: Price,
}

impl CartSummary {
    /// Compute totals for a list of cart items.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityOverflow`] if the line quantities overflow `i64`.
    pub fn new(items: Vec<CartItem>) -> Result<Self, QuantityOverflow> {
        let total_items = total_quantity(items.iter().map(|item| item.quantity))?;
        let subtotal = items.iter().map(CartItem::line_total).sum();
        Ok(Self {
            items,
            total_items,
            subtotal,
        })
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coolcat_core::ProductId;

    use super::*;

    fn item(id: i64, cents: i64, quantity: i64) -> CartItem {
        CartItem {
            variant: VariantDetail {
                id: VariantId::new(id),
                product_id: ProductId::new(1),
                product_name: "Cool Cat Cash".to_owned(),
                variant_name: Some("Red".to_owned()),
                name: "Cool Cat Cash - Red".to_owned(),
                description: String::new(),
                category: None,
                unit_price: Price::from_cents(cents).unwrap(),
                available_quantity: 5,
                image: None,
            },
            quantity,
        }
    }

    #[test]
    fn test_summary_totals() {
        let summary = CartSummary::new(vec![item(1, 2999, 2), item(2, 2599, 1)]).unwrap();
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.subtotal, Price::from_cents(8597).unwrap());
        assert!(!summary.is_empty());
    }

    #[test]
    fn test_empty_summary() {
        let summary = CartSummary::new(Vec::new()).unwrap();
        assert_eq!(summary.total_items, 0);
        assert_eq!(summary.subtotal, Price::ZERO);
        assert!(summary.is_empty());
    }

    #[test]
    fn test_summary_of_full_lines() {
        let summary = CartSummary::new(vec![
            item(1, 2999, MAX_LINE_QUANTITY),
            item(2, 2599, MAX_LINE_QUANTITY),
        ])
        .unwrap();
        assert_eq!(summary.total_items, 2 * MAX_LINE_QUANTITY);
        assert_eq!(
            summary.subtotal,
            Price::from_cents((2999 + 2599) * MAX_LINE_QUANTITY).unwrap()
        );
    }

    #[test]
    fn test_total_quantity_overflow() {
        assert_eq!(total_quantity([i64::MAX - 1, 1]), Ok(i64::MAX));
        assert_eq!(total_quantity([i64::MAX, 1]), Err(QuantityOverflow));
        assert_eq!(total_quantity([]), Ok(0));
    }

    #[test]
    fn test_summary_rejects_overflowing_quantities() {
        let result = CartSummary::new(vec![item(1, 1, i64::MAX), item(2, 1, 1)]);
        assert_eq!(result, Err(QuantityOverflow));
    }

    #[test]
    fn test_remove_quantity_from_option() {
        assert_eq!(RemoveQuantity::from(None), RemoveQuantity::All);
        assert_eq!(RemoveQuantity::from(Some(2)), RemoveQuantity::Count(2));
    }
}
