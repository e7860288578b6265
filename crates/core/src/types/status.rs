//! Order status lifecycle.
//!
//! Orders are created as [`OrderStatus::PendingPayment`] by checkout. Every
//! later status is set by fulfillment tooling outside the storefront, and no
//! transition rules are enforced between them.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known order status.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct OrderStatusParseError(pub String);

/// Status of a placed order.
///
/// Stored as `snake_case` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    PendingPayment,
    Failed,
    OnHold,
    Processing,
    Completed,
    Canceled,
    Refunded,
    Backordered,
    PartiallyShipped,
    Shipped,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 12] = [
        Self::PendingPayment,
        Self::Failed,
        Self::OnHold,
        Self::Processing,
        Self::Completed,
        Self::Canceled,
        Self::Refunded,
        Self::Backordered,
        Self::PartiallyShipped,
        Self::Shipped,
        Self::OutForDelivery,
        Self::Delivered,
    ];

    /// Storage / wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPayment => "pending_payment",
            Self::Failed => "failed",
            Self::OnHold => "on_hold",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::Refunded => "refunded",
            Self::Backordered => "backordered",
            Self::PartiallyShipped => "partially_shipped",
            Self::Shipped => "shipped",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
        }
    }

    /// Customer-facing label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PendingPayment => "Pending Payment",
            Self::Failed => "Failed",
            Self::OnHold => "On Hold",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Canceled => "Canceled",
            Self::Refunded => "Refunded",
            Self::Backordered => "Backordered",
            Self::PartiallyShipped => "Partially Shipped",
            Self::Shipped => "Shipped",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = OrderStatusParseError;

    /// Accepts the storage name (`out_for_delivery`) or the label
    /// (`Out for Delivery`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| {
                status.as_str().eq_ignore_ascii_case(wanted)
                    || status.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| OrderStatusParseError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pending_payment() {
        assert_eq!(OrderStatus::default(), OrderStatus::PendingPayment);
    }

    #[test]
    fn test_every_status_parses_from_its_names() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
            assert_eq!(status.label().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "OUT_FOR_DELIVERY".parse::<OrderStatus>().unwrap(),
            OrderStatus::OutForDelivery
        );
        assert_eq!(
            "on hold".parse::<OrderStatus>().unwrap(),
            OrderStatus::OnHold
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "lost".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown order status: lost");
    }

    #[test]
    fn test_serde_matches_storage_name() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}
