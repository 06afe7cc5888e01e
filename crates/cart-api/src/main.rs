//! # Market-Cart RS
//!
//! Storefront order-intent engine: durable cart plus simulated
//! multi-method payment orchestration.
//!
//! ## Usage
//!
//! ```bash
//! # Optional environment
//! export PORT=8080
//! export CART_DATA_DIR=./data
//! export PAYMENT_SIM_FAST=1   # disable simulated provider latency
//!
//! # Run the server
//! market-cart
//! ```

use cart_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Print banner
    print_banner();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Products loaded: {}", state.catalog.products.len());
    info!(
        "Payment methods: {:?}",
        state
            .methods
            .available_methods()
            .map(|m| m.method.as_str())
            .collect::<Vec<_>>()
    );
    info!("Providers registered: {:?}", state.providers.methods());
    info!("Cart storage: {}", state.config.data_dir.display());

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🛒 Market-Cart starting on http://{}", addr);

    if !is_prod {
        info!("📝 Products: GET http://{}/api/v1/products", addr);
        info!("🧺 Cart: GET http://{}/api/v1/cart", addr);
        info!("💳 Checkout: POST http://{}/api/v1/checkout", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  🛒 Market-Cart RS 🛒
  ━━━━━━━━━━━━━━━━━━━━━
  Storefront order-intent engine
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
