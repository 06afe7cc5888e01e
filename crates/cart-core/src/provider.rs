//! # Payment Provider Trait
//!
//! The capability boundary between the checkout engine and whatever
//! confirms a payment. Each method maps to one provider; the engine
//! only ever sees the normalized request/receipt contract, so a
//! simulated provider, a deterministic test double, and a real network
//! client are interchangeable.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                 PaymentProvider (trait)                │
//! │  ├── process(&PaymentRequest) -> ProviderReceipt       │
//! │  └── method() -> PaymentMethod                         │
//! └────────────────────────────────────────────────────────┘
//!                            ▲
//!        ┌──────────┬────────┴───┬─────────────┐
//!        │          │            │             │
//!   CardProvider PayPal     OrangeMoney    MtnMoney
//! ```

use crate::error::PaymentResult;
use crate::input::{CardBrand, MethodInput};
use crate::method::PaymentMethod;
use crate::product::Currency;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Buyer details forwarded to the provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// One payment attempt as handed to a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Payable total in the smallest currency unit, fixed per session
    pub amount: i64,
    pub currency: Currency,
    pub method: PaymentMethod,
    #[serde(default)]
    pub customer: CustomerData,
    #[serde(default)]
    pub input: MethodInput,
}

/// Normalized payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

/// Method-specific echo data attached to a receipt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReceiptData {
    Card {
        brand: CardBrand,
        last4: String,
    },
    Mobile {
        phone_number: String,
        /// Flat transaction fee charged by the operator
        fee: i64,
    },
    #[default]
    None,
}

/// Normalized success payload returned by a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderReceipt {
    /// Provider-scoped transaction identifier
    pub transaction_id: String,
    pub status: PaymentStatus,
    /// Human-readable confirmation message
    pub message: String,
    #[serde(default)]
    pub data: ReceiptData,
}

/// Core trait for payment provider implementations.
///
/// A rejection is returned as an error value with a human-readable
/// reason; it is a recoverable outcome, never a panic.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Drive one payment attempt to a terminal provider answer.
    async fn process(&self, request: &PaymentRequest) -> PaymentResult<ProviderReceipt>;

    /// The method this provider confirms
    fn method(&self) -> PaymentMethod;

    /// Provider name for logging and error messages
    fn name(&self) -> &'static str {
        self.method().as_str()
    }
}

/// Type alias for a shared payment provider (dynamic dispatch)
pub type BoxedPaymentProvider = Arc<dyn PaymentProvider>;

/// Router from payment method to its provider
#[derive(Clone, Default)]
pub struct ProviderRouter {
    providers: HashMap<PaymentMethod, BoxedPaymentProvider>,
}

impl ProviderRouter {
    /// Create an empty router
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own method
    pub fn register(&mut self, provider: BoxedPaymentProvider) {
        self.providers.insert(provider.method(), provider);
    }

    /// Register with builder pattern
    pub fn with_provider(mut self, provider: BoxedPaymentProvider) -> Self {
        self.register(provider);
        self
    }

    /// Get the provider for a method
    pub fn get(&self, method: PaymentMethod) -> Option<&BoxedPaymentProvider> {
        self.providers.get(&method)
    }

    /// Methods with a registered provider
    pub fn methods(&self) -> Vec<PaymentMethod> {
        self.providers.keys().copied().collect()
    }

    /// Check whether a method has a provider
    pub fn has_provider(&self, method: PaymentMethod) -> bool {
        self.providers.contains_key(&method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaymentError;

    struct StubProvider(PaymentMethod);

    #[async_trait]
    impl PaymentProvider for StubProvider {
        async fn process(&self, _request: &PaymentRequest) -> PaymentResult<ProviderReceipt> {
            Err(PaymentError::Provider {
                provider: self.name().to_string(),
                message: "stub".to_string(),
            })
        }

        fn method(&self) -> PaymentMethod {
            self.0
        }
    }

    #[test]
    fn test_router_registration() {
        let router = ProviderRouter::new()
            .with_provider(Arc::new(StubProvider(PaymentMethod::Card)))
            .with_provider(Arc::new(StubProvider(PaymentMethod::PayPal)));

        assert!(router.has_provider(PaymentMethod::Card));
        assert!(!router.has_provider(PaymentMethod::OrangeMoney));
        assert_eq!(router.methods().len(), 2);
        assert_eq!(
            router.get(PaymentMethod::Card).unwrap().name(),
            "card"
        );
    }

    #[test]
    fn test_receipt_serialization() {
        let receipt = ProviderReceipt {
            transaction_id: "OM_abc123".to_string(),
            status: PaymentStatus::Completed,
            message: "payment confirmed".to_string(),
            data: ReceiptData::Mobile {
                phone_number: "237699112233".to_string(),
                fee: 50,
            },
        };

        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["data"]["kind"], "mobile");
        assert_eq!(json["data"]["fee"], 50);
    }
}
