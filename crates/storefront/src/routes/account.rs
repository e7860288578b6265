//! Account route handlers.
//!
//! These routes require authentication.

use axum::{Json, extract::State};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Customer;
use crate::services::AccountService;
use crate::state::AppState;

/// The logged-in customer's profile.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Customer>> {
    let customer = AccountService::new(state.pool())
        .get_customer(current.id)
        .await?;
    Ok(Json(customer))
}
