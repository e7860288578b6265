//! Order history route handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use coolcat_core::OrderId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::OrderSummary;
use crate::services::OrderService;
use crate::state::AppState;

/// The customer's orders, newest first.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
) -> Result<Json<Vec<OrderSummary>>> {
    let orders = OrderService::new(state.pool())
        .list_orders(customer.id)
        .await?;
    Ok(Json(orders))
}

/// One of the customer's orders. Other customers' orders are not found.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderSummary>> {
    let order = OrderService::new(state.pool())
        .get_order(customer.id, id)
        .await?;
    Ok(Json(order))
}
