//! Catalog route handlers. Public, no login needed.

use axum::{
    Json,
    extract::{Path, State},
};

use coolcat_core::VariantId;

use crate::error::Result;
use crate::models::{Product, VariantDetail};
use crate::services::CatalogService;
use crate::state::AppState;

/// Every product with its variants.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = CatalogService::new(state.pool()).list_products().await?;
    Ok(Json(products))
}

/// One variant with its product details.
pub async fn variant(
    State(state): State<AppState>,
    Path(id): Path<VariantId>,
) -> Result<Json<VariantDetail>> {
    let variant = CatalogService::new(state.pool()).get_variant(id).await?;
    Ok(Json(variant))
}
