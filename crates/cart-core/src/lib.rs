//! # cart-core
//!
//! Core types and traits for the market-cart order-intent engine.
//!
//! This crate provides:
//! - `Cart`, `CartLineItem` and `CartStore` for the buyer's pending order
//! - `CartRepository` for durable cart persistence
//! - `PaymentMethod`, `MethodRegistry` for fee/limit/availability policy
//! - `MethodInput` and its card/mobile validators
//! - `PaymentProvider` trait and `ProviderRouter` for provider dispatch
//! - `PaymentSession` — the checkout state machine
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use cart_core::{
//!     Cart, Currency, MethodInput, MethodRegistry, MobileDetails,
//!     PaymentMethod, PaymentSession,
//! };
//!
//! // Build the order intent
//! let mut cart = Cart::new();
//! cart.add_item(&product, 1);
//!
//! // Drive a checkout attempt for the cart total
//! let mut session = PaymentSession::new(cart.total_price(), Currency::XAF);
//! session.select_method(PaymentMethod::OrangeMoney, &registry)?;
//! session.set_input(MethodInput::Mobile(MobileDetails {
//!     phone_number: "+237 699 11 22 33".into(),
//!     pin: None,
//! }))?;
//!
//! let outcome = session.submit(&registry, &router).await?;
//!
//! // Success is the consumer's cue to clear the cart
//! cart.clear();
//! ```

pub mod cart;
pub mod error;
pub mod input;
pub mod method;
pub mod persist;
pub mod product;
pub mod provider;
pub mod session;

// Re-exports for convenience
pub use cart::{Cart, CartLineItem};
pub use error::{PaymentError, PaymentResult};
pub use input::{CardBrand, CardDetails, MethodInput, MobileDetails, MOBILE_COUNTRY_CODE};
pub use method::{
    AmountLimits, MethodDescriptor, MethodKind, MethodRegistry, PaymentMethod, ALL_METHODS,
};
pub use persist::{
    CartRepository, CartStore, JsonFileRepository, MemoryRepository, STORAGE_NAMESPACE,
};
pub use product::{
    Condition, Currency, Price, Product, ProductCatalog, ProductCategory, ProductImage,
};
pub use provider::{
    BoxedPaymentProvider, CustomerData, PaymentProvider, PaymentRequest, PaymentStatus,
    ProviderReceipt, ProviderRouter, ReceiptData,
};
pub use session::{
    dispatch, PaymentOutcome, PaymentSession, SessionState, SubmitResolution, SubmitTicket,
    DEFAULT_CALL_TIMEOUT,
};
