//! Cart route handlers.
//!
//! Carts live in the database, keyed by customer, so every cart route
//! requires a login.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use coolcat_core::VariantId;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::{CartSummary, RemoveQuantity};
use crate::services::CartService;
use crate::state::AppState;

const fn default_quantity() -> i64 {
    1
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub variant_id: VariantId,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

/// Remove-from-cart request body. Omitting `quantity` removes the line.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub variant_id: VariantId,
    pub quantity: Option<i64>,
}

/// A cart line's quantity after a change.
#[derive(Debug, Serialize)]
pub struct CartLineQuantity {
    pub variant_id: VariantId,
    pub quantity: i64,
}

/// The customer's cart with totals.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
) -> Result<Json<CartSummary>> {
    let summary = CartService::new(state.pool()).get_summary(customer.id).await?;
    Ok(Json(summary))
}

/// Add a variant to the cart.
#[instrument(skip(state, customer))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
    Json(form): Json<AddToCartRequest>,
) -> Result<Json<CartLineQuantity>> {
    let quantity = CartService::new(state.pool())
        .add(customer.id, form.variant_id, form.quantity)
        .await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("variant_id", &form.variant_id.to_string())]),
    );

    Ok(Json(CartLineQuantity {
        variant_id: form.variant_id,
        quantity,
    }))
}

/// Remove some or all of a variant from the cart.
#[instrument(skip(state, customer))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
    Json(form): Json<RemoveFromCartRequest>,
) -> Result<Json<CartLineQuantity>> {
    let quantity = CartService::new(state.pool())
        .remove(
            customer.id,
            form.variant_id,
            RemoveQuantity::from(form.quantity),
        )
        .await?;

    Ok(Json(CartLineQuantity {
        variant_id: form.variant_id,
        quantity,
    }))
}
