//! # Routes
//!
//! Axum router configuration for the storefront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Products:
///   - GET  /api/v1/products - List active products
///   - GET  /api/v1/products/{id} - Get product by ID
///
/// - Cart:
///   - GET    /api/v1/cart - Cart contents and derived totals
///   - DELETE /api/v1/cart - Empty the cart
///   - POST   /api/v1/cart/items - Add a product (merge on existing)
///   - PATCH  /api/v1/cart/items/{product_id} - Replace quantity
///   - DELETE /api/v1/cart/items/{product_id} - Remove line item
///
/// - Payments:
///   - GET  /api/v1/payments/methods - Available methods, fees, limits
///   - POST /api/v1/payments/{transaction_id}/verify - Verify
///   - POST /api/v1/payments/{transaction_id}/refund - Refund
///
/// - Checkout sessions:
///   - POST   /api/v1/checkout - Open a session for the cart total
///   - GET    /api/v1/checkout/{session_id} - Inspect session
///   - DELETE /api/v1/checkout/{session_id} - Abandon session
///   - POST   /api/v1/checkout/{session_id}/method - Select method
///   - PUT    /api/v1/checkout/{session_id}/details - Capture details
///   - POST   /api/v1/checkout/{session_id}/submit - Confirm payment
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - the storefront SPA runs on its own origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cart_routes = Router::new()
        .route("/", get(handlers::get_cart).delete(handlers::clear_cart))
        .route("/items", post(handlers::add_cart_item))
        .route(
            "/items/{product_id}",
            axum::routing::patch(handlers::update_cart_item).delete(handlers::remove_cart_item),
        );

    let checkout_routes = Router::new()
        .route("/", post(handlers::open_checkout))
        .route(
            "/{session_id}",
            get(handlers::get_checkout).delete(handlers::abandon_checkout),
        )
        .route("/{session_id}/method", post(handlers::select_checkout_method))
        .route("/{session_id}/details", put(handlers::set_checkout_details))
        .route("/{session_id}/submit", post(handlers::submit_checkout));

    let payment_routes = Router::new()
        .route("/methods", get(handlers::list_payment_methods))
        .route("/{transaction_id}/verify", post(handlers::verify_payment))
        .route("/{transaction_id}/refund", post(handlers::refund_payment));

    let api_routes = Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products/{product_id}", get(handlers::get_product))
        .nest("/cart", cart_routes)
        .nest("/checkout", checkout_routes)
        .nest("/payments", payment_routes);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use axum_test::TestServer;
    use cart_core::{
        CartStore, Currency, MemoryRepository, MethodRegistry, Price, Product, ProductCatalog,
    };
    use cart_providers::{simulated_router, SimDelays, SimGateway};
    use serde_json::{json, Value};
    use std::path::PathBuf;

    fn test_server() -> TestServer {
        let mut catalog = ProductCatalog::new();
        catalog.add(Product::new(
            "p1",
            "Test Phone",
            Price::from_minor(10_000, Currency::XAF),
        ));

        let state = AppState::with_parts(
            catalog,
            MethodRegistry::defaults(),
            simulated_router(SimDelays::none()),
            SimGateway::new(std::time::Duration::ZERO),
            CartStore::open(Box::new(MemoryRepository::new())),
            AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                base_url: "http://localhost".to_string(),
                environment: "test".to_string(),
                data_dir: PathBuf::from("data"),
            },
        );

        TestServer::new(create_router(state)).expect("test server")
    }

    #[tokio::test]
    async fn test_health() {
        let server = test_server();
        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_empty_cart_rejects_checkout() {
        let server = test_server();
        let response = server.post("/api/v1/checkout").json(&json!({})).await;
        assert_eq!(response.status_code().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_full_checkout_flow() {
        let server = test_server();

        // add two phones
        let response = server
            .post("/api/v1/cart/items")
            .json(&json!({ "product_id": "p1", "quantity": 2 }))
            .await;
        response.assert_status_ok();
        let cart: Value = response.json();
        assert_eq!(cart["total_items"], 2);
        assert_eq!(cart["total_price"], 20_000);

        // open a session for the cart total
        let response = server.post("/api/v1/checkout").json(&json!({})).await;
        response.assert_status_ok();
        let session: Value = response.json();
        assert_eq!(session["state"], "selecting_method");
        assert_eq!(session["amount"], 20_000);
        let id = session["session_id"].as_str().unwrap().to_string();

        // select orange money and capture a wallet number
        let response = server
            .post(&format!("/api/v1/checkout/{id}/method"))
            .json(&json!({ "method": "orange_money" }))
            .await;
        response.assert_status_ok();

        let response = server
            .put(&format!("/api/v1/checkout/{id}/details"))
            .json(&json!({ "type": "mobile", "phone_number": "+237 699 11 22 33" }))
            .await;
        response.assert_status_ok();

        // confirm
        let response = server
            .post(&format!("/api/v1/checkout/{id}/submit"))
            .await;
        response.assert_status_ok();
        let outcome: Value = response.json();
        assert!(outcome["transaction_id"]
            .as_str()
            .unwrap()
            .starts_with("OM_"));
        assert_eq!(outcome["status"], "completed");
        assert_eq!(outcome["data"]["fee"], 50);

        // success cleared the cart
        let cart: Value = server.get("/api/v1/cart").await.json();
        assert_eq!(cart["total_items"], 0);
    }

    #[tokio::test]
    async fn test_unknown_method_rejected() {
        let server = test_server();

        server
            .post("/api/v1/cart/items")
            .json(&json!({ "product_id": "p1" }))
            .await;
        let session: Value = server.post("/api/v1/checkout").json(&json!({})).await.json();
        let id = session["session_id"].as_str().unwrap().to_string();

        let response = server
            .post(&format!("/api/v1/checkout/{id}/method"))
            .json(&json!({ "method": "bitcoin" }))
            .await;
        assert_eq!(response.status_code().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_payment_methods_listing() {
        let server = test_server();
        let body: Value = server.get("/api/v1/payments/methods").await.json();
        assert_eq!(body["count"], 4);
    }
}
