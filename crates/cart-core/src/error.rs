//! # Payment Error Types
//!
//! Typed error handling for the market-cart order-intent engine.
//! All cart and payment operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for cart and payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Malformed method input (card fields, mobile number)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Selecting a method that is disabled in the registry
    #[error("Payment method not available: {method}")]
    MethodUnavailable { method: String },

    /// A method id outside the known set, or no provider registered for it
    #[error("Payment method not supported: {method}")]
    MethodNotSupported { method: String },

    /// Amount outside the method's allowed range
    #[error("Amount {amount} is outside the allowed range {min}..={max}")]
    AmountOutOfRange { amount: i64, min: i64, max: i64 },

    /// A provider call is already in flight for this session
    #[error("A payment is already being processed for this session")]
    AlreadyProcessing,

    /// Submit was attempted before a method was selected
    #[error("No payment method selected")]
    NoMethodSelected,

    /// Session driven from a state that does not allow the operation
    #[error("Invalid session state: expected {expected}, found {actual}")]
    InvalidState { expected: String, actual: String },

    /// Provider rejected the payment (simulated network/business failure)
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Provider call exceeded its wall-clock bound
    #[error("Provider call timed out: {provider}")]
    Timeout { provider: String },

    /// Checkout attempted with nothing in the cart
    #[error("Cart is empty")]
    EmptyCart,

    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Payment session expired or never existed
    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    /// Cart storage read/write failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration errors (bad config files, missing env)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaymentError {
    /// Returns true if the caller can retry the operation with corrected
    /// input or another method. Recoverable errors are surfaced inline to
    /// the buyer; the session stays editable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PaymentError::Validation(_)
                | PaymentError::MethodUnavailable { .. }
                | PaymentError::AmountOutOfRange { .. }
                | PaymentError::Provider { .. }
                | PaymentError::Timeout { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Validation(_) => 400,
            PaymentError::MethodUnavailable { .. } => 400,
            PaymentError::MethodNotSupported { .. } => 400,
            PaymentError::AmountOutOfRange { .. } => 400,
            PaymentError::AlreadyProcessing => 409,
            PaymentError::NoMethodSelected => 409,
            PaymentError::InvalidState { .. } => 409,
            PaymentError::Provider { .. } => 502,
            PaymentError::Timeout { .. } => 504,
            PaymentError::EmptyCart => 400,
            PaymentError::ProductNotFound { .. } => 404,
            PaymentError::SessionNotFound { .. } => 404,
            PaymentError::Persistence(_) => 500,
            PaymentError::Serialization(_) => 500,
            PaymentError::Configuration(_) => 500,
            PaymentError::Internal(_) => 500,
        }
    }
}

/// Result type alias for cart and payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(PaymentError::Validation("invalid card data".into()).is_recoverable());
        assert!(PaymentError::Provider {
            provider: "orange_money".into(),
            message: "declined".into()
        }
        .is_recoverable());
        assert!(PaymentError::Timeout {
            provider: "mtn_money".into()
        }
        .is_recoverable());
        assert!(!PaymentError::AlreadyProcessing.is_recoverable());
        assert!(!PaymentError::Persistence("disk full".into()).is_recoverable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(PaymentError::Validation("bad".into()).status_code(), 400);
        assert_eq!(
            PaymentError::SessionNotFound {
                session_id: "x".into()
            }
            .status_code(),
            404
        );
        assert_eq!(PaymentError::AlreadyProcessing.status_code(), 409);
        assert_eq!(
            PaymentError::Timeout {
                provider: "card".into()
            }
            .status_code(),
            504
        );
    }
}
