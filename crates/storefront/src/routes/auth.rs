//! Authentication route handlers.
//!
//! Signup and login both leave the customer logged in: the session ID is
//! cycled and the [`CurrentCustomer`] stored in it.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_customer, set_current_customer};
use crate::models::{CurrentCustomer, Customer};
use crate::services::{AccountError, AccountService};
use crate::state::AppState;

/// Signup request body.
#[derive(Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Email address or phone number.
    pub contact: String,
    pub password: String,
    pub password_confirm: String,
}

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub contact: String,
    pub password: String,
}

/// Register a customer and log them in.
///
/// Repeating a signup with the same contact and password logs into the
/// existing account.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Customer>)> {
    if form.password != form.password_confirm {
        return Err(AccountError::Validation("passwords do not match".to_string()).into());
    }

    let customer = AccountService::new(state.pool())
        .signup(
            &form.first_name,
            &form.last_name,
            &form.contact,
            &form.password,
        )
        .await?;

    set_current_customer(&session, &CurrentCustomer::from(&customer)).await?;
    set_sentry_user(&customer.id);

    Ok((StatusCode::CREATED, Json(customer)))
}

/// Log in with a contact and password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginRequest>,
) -> Result<Json<Customer>> {
    let customer = AccountService::new(state.pool())
        .login(&form.contact, &form.password)
        .await?;

    set_current_customer(&session, &CurrentCustomer::from(&customer)).await?;
    set_sentry_user(&customer.id);

    Ok(Json(customer))
}

/// Log out, discarding the session.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_customer(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}
