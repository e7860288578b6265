//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use coolcat_core::{CustomerId, OrderId, OrderLineId, OrderStatus, Price, VariantId};

use super::cart::{QuantityOverflow, total_quantity};

/// The order row itself, without lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct OrderHeader {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One immutable line of a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub order_id: OrderId,
    pub variant_id: VariantId,
    pub quantity: i64,
    /// Unit price captured when the order was placed.
    pub unit_price: Price,
}

/// An order as returned by checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    #[serde(flatten)]
    pub header: OrderHeader,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Total at the captured prices.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines
            .iter()
            .map(|line| line.unit_price.times(line.quantity))
            .sum()
    }
}

/// An order line joined with what it refers to, for history views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub line_id: OrderLineId,
    pub variant_id: VariantId,
    /// `"<product> - <variant>"` at read time.
    pub name: String,
    pub image: Option<String>,
    pub quantity: i64,
    /// Captured at order time, never re-derived from the variant.
    pub unit_price: Price,
    pub line_total: Price,
}

/// An order with its items and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Ordered by line total descending, then line id.
    pub items: Vec<OrderItem>,
    pub total_items: i64,
    pub total_price: Price,
}

impl OrderSummary {
    /// Attach items to an order and compute its totals.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityOverflow`] if the line quantities overflow `i64`.
    pub fn new(header: &OrderHeader, items: Vec<OrderItem>) -> Result<Self, QuantityOverflow> {
        let total_items = total_quantity(items.iter().map(|item| item.quantity))?;
        let total_price = items.iter().map(|item| item.line_total).sum();
        Ok(Self {
            id: header.id,
            status: header.status,
            created_at: header.created_at,
            updated_at: header.updated_at,
            items,
            total_items,
            total_price,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn header() -> OrderHeader {
        let now = Utc::now();
        OrderHeader {
            id: OrderId::new(7),
            customer_id: CustomerId::new(1),
            status: OrderStatus::PendingPayment,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(line: i64, cents: i64, quantity: i64) -> OrderItem {
        let unit_price = Price::from_cents(cents).unwrap();
        OrderItem {
            line_id: OrderLineId::new(line),
            variant_id: VariantId::new(line),
            name: "Cool Cat Poker - Blue".to_owned(),
            image: None,
            quantity,
            unit_price,
            line_total: unit_price.times(quantity),
        }
    }

    #[test]
    fn test_summary_totals() {
        let summary =
            OrderSummary::new(&header(), vec![item(1, 2999, 3), item(2, 2599, 1)]).unwrap();
        assert_eq!(summary.id, OrderId::new(7));
        assert_eq!(summary.total_items, 4);
        assert_eq!(summary.total_price, Price::from_cents(11_596).unwrap());
    }

    #[test]
    fn test_summary_rejects_overflowing_quantities() {
        let result = OrderSummary::new(&header(), vec![item(1, 0, i64::MAX), item(2, 0, 1)]);
        assert_eq!(result, Err(QuantityOverflow));
    }

    #[test]
    fn test_order_total_uses_captured_prices() {
        let header = header();
        let order = Order {
            header,
            lines: vec![OrderLine {
                id: OrderLineId::new(1),
                order_id: header.id,
                variant_id: VariantId::new(3),
                quantity: 2,
                unit_price: Price::from_cents(1000).unwrap(),
            }],
        };
        assert_eq!(order.total_price(), Price::from_cents(2000).unwrap());
    }

    #[test]
    fn test_order_serializes_flat() {
        let order = Order {
            header: header(),
            lines: Vec::new(),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["status"], "pending_payment");
        assert!(json["lines"].as_array().unwrap().is_empty());
    }
}
