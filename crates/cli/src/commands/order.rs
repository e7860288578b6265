//! Order administration commands.
//!
//! # Usage
//!
//! ```bash
//! # Mark order 12 as shipped
//! cc-cli order set-status 12 shipped
//! ```
//!
//! Valid statuses are the snake_case names, e.g. `pending_payment`,
//! `processing`, `shipped`, `delivered`, `canceled`. Any status may follow
//! any other.

use sqlx::SqlitePool;

use coolcat_core::{OrderId, OrderStatus};
use coolcat_storefront::db::{OrderRepository, RepositoryError};
use coolcat_storefront::models::OrderHeader;

use super::{CommandError, connect};

/// Set an order's status.
///
/// # Errors
///
/// Returns `CommandError::InvalidArgument` for an unknown status or order.
/// Returns `CommandError` if the database cannot be reached.
pub async fn set_status(order_id: i64, status: &str) -> Result<(), CommandError> {
    let status: OrderStatus = status
        .parse()
        .map_err(|e| CommandError::InvalidArgument(format!("{e}")))?;

    let pool = connect().await?;
    let header = update_status(&pool, OrderId::new(order_id), status).await?;

    tracing::info!(
        order_id = %header.id,
        status = %header.status,
        "Order status updated"
    );
    Ok(())
}

async fn update_status(
    pool: &SqlitePool,
    order_id: OrderId,
    status: OrderStatus,
) -> Result<OrderHeader, CommandError> {
    match OrderRepository::new(pool).set_status(order_id, status).await {
        Ok(header) => Ok(header),
        Err(RepositoryError::NotFound) => Err(CommandError::InvalidArgument(format!(
            "order {order_id} does not exist"
        ))),
        Err(e) => Err(e.into()),
    }
}
