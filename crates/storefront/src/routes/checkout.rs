//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode};

use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::services::CheckoutService;
use crate::state::AppState;

/// Turn the customer's cart into an order awaiting payment.
pub async fn place_order(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
) -> Result<(StatusCode, Json<Order>)> {
    let order = CheckoutService::new(state.pool())
        .place_order(customer.id)
        .await?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", &order.header.id.to_string())]),
    );

    Ok((StatusCode::CREATED, Json(order)))
}
