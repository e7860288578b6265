//! HTTP route handlers for the storefront.
//!
//! Every route speaks JSON. Handler errors come back as `{"error": "..."}`;
//! extractor rejections (malformed bodies or paths) and rate-limit `429`s
//! are the framework's plain-text responses.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Database connectivity check
//!
//! # Auth (rate limited)
//! POST /auth/signup            - Register and log in
//! POST /auth/login             - Log in with contact and password
//! POST /auth/logout            - End the session
//!
//! # Catalog
//! GET  /catalog                - Products with their variants
//! GET  /catalog/variants/{id}  - Variant detail
//!
//! # Account (requires auth)
//! GET  /account                - Current customer profile
//!
//! # Cart (requires auth, rate limited)
//! GET  /cart                   - Cart lines with totals
//! POST /cart/add               - Add a variant (quantity defaults to 1)
//! POST /cart/remove            - Remove a variant (all unless quantity given)
//!
//! # Checkout (requires auth, rate limited)
//! POST /checkout               - Place an order from the cart
//!
//! # Orders (requires auth)
//! GET  /orders                 - Order history, newest first
//! GET  /orders/{id}            - Order detail
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod health;
pub mod orders;

use axum::{
    Router,
    body::Body,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::SqliteStore;

use crate::middleware::{
    api_rate_limiter, auth_rate_limiter, make_request_span, request_id_middleware,
};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/variants/{id}", get(catalog::variant))
}

/// Create the cart and checkout routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/cart/remove", post(cart::remove))
        .route("/checkout", post(checkout::place_order))
        .layer(api_rate_limiter())
}

/// Create the order history routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/catalog", catalog_routes())
        .route("/account", get(account::show))
        .merge(cart_routes())
        .nest("/orders", order_routes())
}

/// Build the complete application: routes, health checks, sessions,
/// request IDs and tracing.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState, session_layer: SessionManagerLayer<SqliteStore>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{Request, StatusCode, header};
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;
    use tower::ServiceExt;

    use coolcat_core::Price;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::db::{CatalogRepository, create_memory_pool};
    use crate::middleware::{create_session_layer, create_session_store};
    use crate::models::{NewProduct, NewVariant};

    const CLIENT_IP: &str = "203.0.113.10";

    struct TestApp {
        router: Router,
        pool: SqlitePool,
    }

    struct TestResponse {
        status: StatusCode,
        cookie: Option<String>,
        body: Value,
    }

    impl TestApp {
        async fn new() -> Self {
            let pool = create_memory_pool().await.unwrap();
            let store = create_session_store(&pool).await.unwrap();
            let config = StorefrontConfig {
                database_url: SecretString::from("sqlite::memory:"),
                host: "127.0.0.1".parse().unwrap(),
                port: 3000,
                base_url: "http://localhost:3000".to_string(),
                db_max_connections: 1,
                sentry_dsn: None,
                sentry_environment: None,
            };
            let state = AppState::new(config, pool.clone());
            Self {
                router: app(state, create_session_layer(store, false)),
                pool,
            }
        }

        async fn send(
            &self,
            method: &str,
            uri: &str,
            cookie: Option<&str>,
            body: Option<Value>,
        ) -> TestResponse {
            let mut builder = Request::builder()
                .method(method)
                .uri(uri)
                .header("x-forwarded-for", CLIENT_IP);
            if let Some(cookie) = cookie {
                builder = builder.header(header::COOKIE, cookie);
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let cookie = response
                .headers()
                .get(header::SET_COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(';').next())
                .map(str::to_string);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

            TestResponse {
                status,
                cookie,
                body,
            }
        }

        async fn signup(&self, contact: &str) -> String {
            let response = self
                .send(
                    "POST",
                    "/auth/signup",
                    None,
                    Some(json!({
                        "first_name": "Jane",
                        "last_name": "Doe",
                        "contact": contact,
                        "password": "pw1",
                        "password_confirm": "pw1",
                    })),
                )
                .await;
            assert_eq!(response.status, StatusCode::CREATED);
            response.cookie.unwrap()
        }

        async fn seed_variant(&self, price_cents: i64) -> i64 {
            let catalog = CatalogRepository::new(&self.pool);
            let product = catalog
                .upsert_product(&NewProduct {
                    name: "Cool Cat Poker".to_string(),
                    description: String::new(),
                    category_id: None,
                })
                .await
                .unwrap();
            catalog
                .upsert_variant(
                    product,
                    &NewVariant {
                        name: "Black".to_string(),
                        unit_price: Price::from_cents(price_cents).unwrap(),
                        available_quantity: 5,
                        image: None,
                    },
                )
                .await
                .unwrap()
                .as_i64()
        }
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = TestApp::new().await;

        let live = app.send("GET", "/health", None, None).await;
        assert_eq!(live.status, StatusCode::OK);

        let ready = app.send("GET", "/health/ready", None, None).await;
        assert_eq!(ready.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_routes_require_login() {
        let app = TestApp::new().await;

        for (method, uri) in [
            ("GET", "/account"),
            ("GET", "/cart"),
            ("POST", "/checkout"),
            ("GET", "/orders"),
            ("GET", "/orders/1"),
        ] {
            let response = app.send(method, uri, None, None).await;
            assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert!(response.body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_signup_password_mismatch() {
        let app = TestApp::new().await;

        let response = app
            .send(
                "POST",
                "/auth/signup",
                None,
                Some(json!({
                    "first_name": "Jane",
                    "contact": "jane@example.com",
                    "password": "pw1",
                    "password_confirm": "pw2",
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "passwords do not match");
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let app = TestApp::new().await;
        app.signup("jane@example.com").await;

        let response = app
            .send(
                "POST",
                "/auth/login",
                None,
                Some(json!({ "contact": "jane@example.com", "password": "nope" })),
            )
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["error"], "Invalid credentials");

        let response = app
            .send(
                "POST",
                "/auth/login",
                None,
                Some(json!({ "contact": "JANE@example.com", "password": "pw1" })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["email"], "jane@example.com");
        assert!(response.cookie.is_some());
    }

    #[tokio::test]
    async fn test_catalog_is_public() {
        let app = TestApp::new().await;
        let variant_id = app.seed_variant(2599).await;

        let response = app.send("GET", "/catalog", None, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body[0]["name"], "Cool Cat Poker");

        let response = app
            .send("GET", &format!("/catalog/variants/{variant_id}"), None, None)
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["unit_price"], "25.99");

        let response = app.send("GET", "/catalog/variants/999", None, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_shopping_flow() {
        let app = TestApp::new().await;
        let variant_id = app.seed_variant(1000).await;
        let cookie = app.signup("jane@example.com").await;
        let cookie = Some(cookie.as_str());

        let account = app.send("GET", "/account", cookie, None).await;
        assert_eq!(account.status, StatusCode::OK);
        assert_eq!(account.body["first_name"], "Jane");

        let added = app
            .send(
                "POST",
                "/cart/add",
                cookie,
                Some(json!({ "variant_id": variant_id })),
            )
            .await;
        assert_eq!(added.status, StatusCode::OK);
        assert_eq!(added.body["quantity"], 1);

        let added = app
            .send(
                "POST",
                "/cart/add",
                cookie,
                Some(json!({ "variant_id": variant_id, "quantity": 2 })),
            )
            .await;
        assert_eq!(added.body["quantity"], 3);

        let removed = app
            .send(
                "POST",
                "/cart/remove",
                cookie,
                Some(json!({ "variant_id": variant_id, "quantity": 1 })),
            )
            .await;
        assert_eq!(removed.body["quantity"], 2);

        let cart = app.send("GET", "/cart", cookie, None).await;
        assert_eq!(cart.status, StatusCode::OK);
        assert_eq!(cart.body["total_items"], 2);
        assert_eq!(cart.body["subtotal"], "20.00");

        let order = app.send("POST", "/checkout", cookie, None).await;
        assert_eq!(order.status, StatusCode::CREATED);
        assert_eq!(order.body["status"], "pending_payment");
        let order_id = order.body["id"].as_i64().unwrap();

        let cart = app.send("GET", "/cart", cookie, None).await;
        assert_eq!(cart.body["total_items"], 0);

        let again = app.send("POST", "/checkout", cookie, None).await;
        assert_eq!(again.status, StatusCode::BAD_REQUEST);

        let orders = app.send("GET", "/orders", cookie, None).await;
        assert_eq!(orders.body.as_array().unwrap().len(), 1);
        assert_eq!(orders.body[0]["total_price"], "20.00");

        let detail = app
            .send("GET", &format!("/orders/{order_id}"), cookie, None)
            .await;
        assert_eq!(detail.status, StatusCode::OK);
        assert_eq!(detail.body["items"][0]["name"], "Cool Cat Poker - Black");

        let logout = app.send("POST", "/auth/logout", cookie, None).await;
        assert_eq!(logout.status, StatusCode::NO_CONTENT);

        let cart = app.send("GET", "/cart", cookie, None).await;
        assert_eq!(cart.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_other_customers_order_is_not_found() {
        let app = TestApp::new().await;
        let variant_id = app.seed_variant(1000).await;

        let jane = app.signup("jane@example.com").await;
        app.send(
            "POST",
            "/cart/add",
            Some(&jane),
            Some(json!({ "variant_id": variant_id })),
        )
        .await;
        let order = app.send("POST", "/checkout", Some(&jane), None).await;
        let order_id = order.body["id"].as_i64().unwrap();

        let bob = app.signup("+1 650 253 0000").await;
        let response = app
            .send("GET", &format!("/orders/{order_id}"), Some(&bob), None)
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_cart_requests() {
        let app = TestApp::new().await;
        let variant_id = app.seed_variant(1000).await;
        let cookie = app.signup("jane@example.com").await;

        let response = app
            .send(
                "POST",
                "/cart/add",
                Some(&cookie),
                Some(json!({ "variant_id": variant_id, "quantity": 0 })),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);

        let response = app
            .send(
                "POST",
                "/cart/add",
                Some(&cookie),
                Some(json!({ "variant_id": 999 })),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);

        let response = app
            .send(
                "POST",
                "/cart/add",
                Some(&cookie),
                Some(json!({ "variant_id": variant_id, "quantity": 1000 })),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);

        for expected in [StatusCode::OK, StatusCode::BAD_REQUEST] {
            let response = app
                .send(
                    "POST",
                    "/cart/add",
                    Some(&cookie),
                    Some(json!({ "variant_id": variant_id, "quantity": 999 })),
                )
                .await;
            assert_eq!(response.status, expected);
        }

        let response = app.send("GET", "/cart", Some(&cookie), None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["total_items"], 999);
    }

    #[tokio::test]
    async fn test_auth_routes_are_rate_limited() {
        let app = TestApp::new().await;
        let login = json!({ "contact": "nobody@example.com", "password": "pw1" });

        let mut responses = Vec::new();
        for _ in 0..6 {
            responses.push(
                app.send("POST", "/auth/login", None, Some(login.clone()))
                    .await,
            );
        }

        let last = responses.pop().unwrap();
        assert!(
            responses
                .iter()
                .all(|r| r.status == StatusCode::UNAUTHORIZED && r.body["error"].is_string())
        );
        assert_eq!(last.status, StatusCode::TOO_MANY_REQUESTS);
        // Governor answers in plain text, not the handler JSON shape.
        assert_eq!(last.body, Value::Null);
    }
}
