//! # Simulation Configuration
//!
//! Per-method latency for the simulated providers. The defaults mirror
//! the confirmation windows of the real counterparts: card terminals
//! answer in about two seconds, the PayPal redirect round-trip in one
//! and a half, and a mobile-money USSD confirmation takes around three.

use std::time::Duration;

/// Simulated confirmation latency per method family
#[derive(Debug, Clone, Copy)]
pub struct SimDelays {
    pub card: Duration,
    pub paypal: Duration,
    pub mobile: Duration,
    /// Verification/refund gateway latency
    pub gateway: Duration,
}

impl Default for SimDelays {
    fn default() -> Self {
        Self {
            card: Duration::from_millis(2_000),
            paypal: Duration::from_millis(1_500),
            mobile: Duration::from_millis(3_000),
            gateway: Duration::from_millis(1_000),
        }
    }
}

impl SimDelays {
    /// Zero latency everywhere — for tests and local development
    pub fn none() -> Self {
        Self {
            card: Duration::ZERO,
            paypal: Duration::ZERO,
            mobile: Duration::ZERO,
            gateway: Duration::ZERO,
        }
    }

    /// Load from the environment: `PAYMENT_SIM_FAST=1` disables all
    /// simulated latency, anything else keeps the defaults.
    pub fn from_env() -> Self {
        match std::env::var("PAYMENT_SIM_FAST") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => Self::none(),
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delays() {
        let delays = SimDelays::default();
        assert_eq!(delays.card, Duration::from_millis(2_000));
        assert_eq!(delays.paypal, Duration::from_millis(1_500));
        assert_eq!(delays.mobile, Duration::from_millis(3_000));
    }

    #[test]
    fn test_none_is_zero() {
        let delays = SimDelays::none();
        assert!(delays.card.is_zero());
        assert!(delays.paypal.is_zero());
        assert!(delays.mobile.is_zero());
        assert!(delays.gateway.is_zero());
    }
}
