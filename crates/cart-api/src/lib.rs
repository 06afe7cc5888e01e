//! # cart-api
//!
//! HTTP API layer for market-cart-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for products, the cart, and checkout sessions
//! - The checkout surface that drives the payment state machine and
//!   clears the cart on confirmed payment
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/products` | List products |
//! | GET | `/api/v1/cart` | Cart with derived totals |
//! | POST | `/api/v1/cart/items` | Add product to cart |
//! | GET | `/api/v1/payments/methods` | Methods with fees/limits |
//! | POST | `/api/v1/checkout` | Open checkout session |
//! | POST | `/api/v1/checkout/:id/submit` | Confirm payment |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
