//! # cart-providers
//!
//! Simulated payment providers for market-cart-rs.
//!
//! One provider per supported method, all implementing the
//! `PaymentProvider` trait from `cart-core`:
//!
//! - `CardProvider` — card acquirer (~2s confirmation)
//! - `PayPalProvider` — external redirect flow (~1.5s)
//! - `OrangeMoneyProvider` / `MtnMoneyProvider` — USSD mobile money
//!   (~3s, flat 50 FCFA operator fee)
//!
//! Each simulation honors the same request/receipt contract a real
//! integration would, so swapping a provider for a network client is a
//! one-struct change behind the router.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cart_providers::{simulated_router, SimDelays};
//!
//! let router = simulated_router(SimDelays::from_env());
//! let outcome = session.submit(&registry, &router).await?;
//! ```

pub mod card;
pub mod config;
pub mod gateway;
pub mod mobile;
pub mod paypal;

pub use card::CardProvider;
pub use config::SimDelays;
pub use gateway::SimGateway;
pub use mobile::{MtnMoneyProvider, OrangeMoneyProvider, DEFAULT_MOBILE_FEE};
pub use paypal::PayPalProvider;

use cart_core::ProviderRouter;
use std::sync::Arc;

/// Build a router with all four simulated providers registered
pub fn simulated_router(delays: SimDelays) -> ProviderRouter {
    ProviderRouter::new()
        .with_provider(Arc::new(CardProvider::new(delays.card)))
        .with_provider(Arc::new(PayPalProvider::new(delays.paypal)))
        .with_provider(Arc::new(OrangeMoneyProvider::new(delays.mobile)))
        .with_provider(Arc::new(MtnMoneyProvider::new(delays.mobile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_core::{
        Currency, MethodInput, MethodRegistry, MobileDetails, PaymentMethod, PaymentSession,
        PaymentStatus, ReceiptData, SessionState,
    };

    #[test]
    fn test_router_covers_all_methods() {
        let router = simulated_router(SimDelays::none());
        for method in cart_core::ALL_METHODS {
            assert!(router.has_provider(method), "missing provider: {method}");
        }
    }

    #[tokio::test]
    async fn test_orange_money_end_to_end() {
        let registry = MethodRegistry::defaults();
        let router = simulated_router(SimDelays::none());

        let mut session = PaymentSession::new(10_000, Currency::XAF);
        session
            .select_method(PaymentMethod::OrangeMoney, &registry)
            .unwrap();
        session
            .set_input(MethodInput::Mobile(MobileDetails {
                phone_number: "+237 699 11 22 33".to_string(),
                pin: None,
            }))
            .unwrap();

        let outcome = session.submit(&registry, &router).await.unwrap();

        assert!(outcome.transaction_id.starts_with("OM_"));
        assert_eq!(outcome.status, PaymentStatus::Completed);
        assert_eq!(
            outcome.data,
            ReceiptData::Mobile {
                phone_number: "237699112233".to_string(),
                fee: 50,
            }
        );
        assert_eq!(session.state(), SessionState::Succeeded);
    }

    #[tokio::test]
    async fn test_paypal_end_to_end_without_details() {
        let registry = MethodRegistry::defaults();
        let router = simulated_router(SimDelays::none());

        let mut session = PaymentSession::new(25_000, Currency::XAF);
        session
            .select_method(PaymentMethod::PayPal, &registry)
            .unwrap();

        let outcome = session.submit(&registry, &router).await.unwrap();
        assert!(outcome.transaction_id.starts_with("PP_"));
    }
}
