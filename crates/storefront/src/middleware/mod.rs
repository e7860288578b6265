//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span via `make_request_span`)
//! 3. Request ID (fills the span's `request_id`)
//! 4. Session layer (tower-sessions with `SQLite` store)
//! 5. Rate limiting (governor, per route group)

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod session;

pub use auth::{RequireAuth, clear_current_customer, set_current_customer};
pub use rate_limit::{api_rate_limiter, auth_rate_limiter};
pub use request_id::{make_request_span, request_id_middleware};
pub use session::{create_session_layer, create_session_store};
