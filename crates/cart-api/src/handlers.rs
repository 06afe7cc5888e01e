//! # Request Handlers
//!
//! Axum request handlers for the storefront API: products, the cart,
//! and the checkout session lifecycle. The submit handler is the
//! consumer of the payment state machine — it releases the session
//! lock across the provider call and clears the cart only on a
//! completed outcome.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cart_core::{
    dispatch, CartLineItem, Currency, CustomerData, MethodInput, PaymentError, PaymentMethod,
    PaymentOutcome, PaymentSession, SessionState, SubmitResolution,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Add-to-cart request
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Product ID from the catalog
    pub product_id: String,
    /// Quantity to add
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Quantity update request. Zero or below removes the line item.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Cart contents plus derived totals
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineItem>,
    pub total_items: u32,
    /// Smallest currency unit
    pub total_price: i64,
    pub currency: Currency,
    pub display_total: String,
}

impl CartView {
    fn from_store(store: &cart_core::CartStore) -> Self {
        let total_price = store.total_price();
        Self {
            items: store.cart().items().to_vec(),
            total_items: store.total_items(),
            total_price,
            currency: Currency::XAF,
            display_total: cart_core::Price::from_minor(total_price, Currency::XAF).display(),
        }
    }
}

/// Open-checkout request
#[derive(Debug, Default, Deserialize)]
pub struct OpenCheckoutRequest {
    /// Optional buyer details forwarded to the provider
    #[serde(default)]
    pub customer: CustomerData,
}

/// Method selection request
#[derive(Debug, Deserialize)]
pub struct SelectMethodRequest {
    /// Wire id: card | paypal | orange_money | mtn_money
    pub method: String,
}

/// Refund request
#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    /// Amount to refund, smallest currency unit
    pub amount: i64,
}

/// Checkout session as exposed to the client
#[derive(Debug, Serialize)]
pub struct CheckoutSessionView {
    pub session_id: Uuid,
    pub state: SessionState,
    pub amount: i64,
    pub currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<PaymentOutcome>,
}

impl CheckoutSessionView {
    fn from_session(session: &PaymentSession) -> Self {
        Self {
            session_id: session.id,
            state: session.state(),
            amount: session.amount(),
            currency: session.currency(),
            method: session.method(),
            last_error: session.last_error().map(String::from),
            outcome: session.outcome().cloned(),
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    /// Whether the client may retry with corrected input
    pub recoverable: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            recoverable: false,
        }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn payment_error_to_response(err: PaymentError) -> HandlerError {
    let code = err.status_code();
    let response = ErrorResponse {
        error: err.to_string(),
        code,
        recoverable: err.is_recoverable(),
    };
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn session_not_found(session_id: Uuid) -> HandlerError {
    payment_error_to_response(PaymentError::SessionNotFound {
        session_id: session_id.to_string(),
    })
}

// =============================================================================
// Handlers — products
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "market-cart",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Get products list
pub async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    let products: Vec<_> = state.catalog.active_products().collect();
    Json(serde_json::json!({
        "products": products,
        "count": products.len()
    }))
}

/// Get single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let product = state.catalog.get(&product_id).ok_or_else(|| {
        payment_error_to_response(PaymentError::ProductNotFound {
            product_id: product_id.clone(),
        })
    })?;

    Ok(Json(product.clone()))
}

// =============================================================================
// Handlers — cart
// =============================================================================

/// Current cart with derived totals
pub async fn get_cart(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.cart.lock().await;
    Json(CartView::from_store(&store))
}

/// Add a product to the cart (merges into an existing line item)
#[instrument(skip(state, request), fields(product_id = %request.product_id))]
pub async fn add_cart_item(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartView>, HandlerError> {
    let product = state.catalog.get(&request.product_id).ok_or_else(|| {
        payment_error_to_response(PaymentError::ProductNotFound {
            product_id: request.product_id.clone(),
        })
    })?;

    if !product.active {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                format!("Product is not available: {}", request.product_id),
                400,
            )),
        ));
    }

    let mut store = state.cart.lock().await;
    store.add_item(product, request.quantity);
    info!(
        "Cart now holds {} item(s), total {}",
        store.total_items(),
        store.total_price()
    );

    Ok(Json(CartView::from_store(&store)))
}

/// Replace a line item's quantity; zero or below removes it
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(request): Json<UpdateQuantityRequest>,
) -> impl IntoResponse {
    let quantity = request.quantity.clamp(0, u32::MAX as i64) as u32;

    let mut store = state.cart.lock().await;
    store.update_quantity(&product_id, quantity);
    Json(CartView::from_store(&store))
}

/// Remove a line item (no-op when absent)
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> impl IntoResponse {
    let mut store = state.cart.lock().await;
    store.remove_item(&product_id);
    Json(CartView::from_store(&store))
}

/// Empty the cart
pub async fn clear_cart(State(state): State<AppState>) -> impl IntoResponse {
    state.cart.lock().await.clear();
    StatusCode::NO_CONTENT
}

// =============================================================================
// Handlers — payment methods
// =============================================================================

/// Selectable payment methods with their fees and limits
pub async fn list_payment_methods(State(state): State<AppState>) -> impl IntoResponse {
    let methods: Vec<_> = state
        .methods
        .available_methods()
        .map(|d| {
            serde_json::json!({
                "id": d.method,
                "kind": d.method.kind(),
                "display_name": d.display_name,
                "description": d.description,
                "fee_fixed": d.fee_fixed,
                "limits": d.limits,
                "processing_time": d.processing_time,
            })
        })
        .collect();

    Json(serde_json::json!({
        "methods": methods,
        "count": methods.len()
    }))
}

// =============================================================================
// Handlers — checkout sessions
// =============================================================================

/// Open a checkout session for the current cart total
#[instrument(skip(state, request))]
pub async fn open_checkout(
    State(state): State<AppState>,
    Json(request): Json<OpenCheckoutRequest>,
) -> Result<Json<CheckoutSessionView>, HandlerError> {
    let total = {
        let store = state.cart.lock().await;
        if store.cart().is_empty() {
            return Err(payment_error_to_response(PaymentError::EmptyCart));
        }
        store.total_price()
    };

    let session = PaymentSession::new(total, Currency::XAF).with_customer(request.customer);
    let view = CheckoutSessionView::from_session(&session);

    info!("Opened checkout session {} for {}", session.id, total);
    state.sessions.lock().await.insert(session.id, session);

    Ok(Json(view))
}

/// Inspect a checkout session
pub async fn get_checkout(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<CheckoutSessionView>, HandlerError> {
    let sessions = state.sessions.lock().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    Ok(Json(CheckoutSessionView::from_session(session)))
}

/// Select the payment method for a session
#[instrument(skip(state, request), fields(method = %request.method))]
pub async fn select_checkout_method(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SelectMethodRequest>,
) -> Result<Json<CheckoutSessionView>, HandlerError> {
    let method = PaymentMethod::from_str(&request.method).map_err(payment_error_to_response)?;

    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    session
        .select_method(method, &state.methods)
        .map_err(payment_error_to_response)?;

    Ok(Json(CheckoutSessionView::from_session(session)))
}

/// Capture method-specific details for a session
pub async fn set_checkout_details(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(input): Json<MethodInput>,
) -> Result<Json<CheckoutSessionView>, HandlerError> {
    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    session.set_input(input).map_err(payment_error_to_response)?;

    Ok(Json(CheckoutSessionView::from_session(session)))
}

/// Submit a session for confirmation
#[instrument(skip(state))]
pub async fn submit_checkout(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<PaymentOutcome>, HandlerError> {
    submit_checkout_internal(&state, session_id).await
}

/// Internal submit flow (shared with tests).
///
/// The session lock is held only to reserve the in-flight slot and to
/// apply the result; the provider call itself runs unlocked so other
/// sessions stay responsive and a concurrent second submit is rejected
/// instead of queued.
async fn submit_checkout_internal(
    state: &AppState,
    session_id: Uuid,
) -> Result<Json<PaymentOutcome>, HandlerError> {
    let ticket = {
        let mut sessions = state.sessions.lock().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| session_not_found(session_id))?;
        session
            .begin_submit(&state.methods)
            .map_err(payment_error_to_response)?
    };

    let result = dispatch(&state.providers, &ticket).await;

    let mut sessions = state.sessions.lock().await;
    let Some(session) = sessions.get_mut(&session_id) else {
        // abandoned mid-flight: drop the provider answer on the floor
        info!("Discarding provider result for abandoned session {session_id}");
        return Err(session_not_found(session_id));
    };

    match session.complete_submit(&ticket, result) {
        SubmitResolution::Completed(outcome) => {
            info!(
                "Payment succeeded: {} via {}",
                outcome.transaction_id, outcome.method
            );
            // confirmed payment is the single trigger that clears the
            // buyer's order intent; the session itself never does this
            state.cart.lock().await.clear();
            Ok(Json(outcome))
        }
        SubmitResolution::Rejected(err) => {
            warn!("Payment attempt failed: {}", err);
            Err(payment_error_to_response(err))
        }
        SubmitResolution::Discarded => {
            info!("Provider result discarded after session reset");
            Err((
                StatusCode::CONFLICT,
                Json(ErrorResponse::new(
                    "Session was reset while processing",
                    409,
                )),
            ))
        }
    }
}

/// Abandon a checkout session. Allowed in any state; an in-flight
/// provider call resolves harmlessly against the removed session.
pub async fn abandon_checkout(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, HandlerError> {
    let removed = state.sessions.lock().await.remove(&session_id);
    match removed {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(session_not_found(session_id)),
    }
}

// =============================================================================
// Handlers — post-payment gateway
// =============================================================================

/// Verify a previously issued transaction
pub async fn verify_payment(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let receipt = state
        .gateway
        .verify_transaction(&transaction_id)
        .await
        .map_err(|e| {
            error!("Verification failed: {}", e);
            payment_error_to_response(e)
        })?;

    Ok(Json(receipt))
}

/// Refund an amount against a transaction
#[instrument(skip(state, request), fields(amount = request.amount))]
pub async fn refund_payment(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    Json(request): Json<RefundRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let receipt = state
        .gateway
        .refund(&transaction_id, request.amount)
        .await
        .map_err(|e| {
            error!("Refund failed: {}", e);
            payment_error_to_response(e)
        })?;

    Ok(Json(receipt))
}
