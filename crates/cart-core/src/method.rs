//! # Payment Methods
//!
//! The closed set of supported payment methods with their fee and
//! amount-limit policies. The registry is immutable at run time;
//! availability, fees and limits can be overridden from
//! `config/methods.toml` before the registry is handed out.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A supported payment method.
///
/// Adding a method is a compile-time-checked extension: every dispatch
/// over this enum is an exhaustive `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    #[serde(rename = "paypal")]
    PayPal,
    OrangeMoney,
    MtnMoney,
}

/// All methods, in display order
pub const ALL_METHODS: [PaymentMethod; 4] = [
    PaymentMethod::Card,
    PaymentMethod::PayPal,
    PaymentMethod::OrangeMoney,
    PaymentMethod::MtnMoney,
];

/// Coarse grouping used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Card,
    Digital,
    Mobile,
}

impl PaymentMethod {
    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::PayPal => "paypal",
            PaymentMethod::OrangeMoney => "orange_money",
            PaymentMethod::MtnMoney => "mtn_money",
        }
    }

    /// Display grouping
    pub fn kind(&self) -> MethodKind {
        match self {
            PaymentMethod::Card => MethodKind::Card,
            PaymentMethod::PayPal => MethodKind::Digital,
            PaymentMethod::OrangeMoney | PaymentMethod::MtnMoney => MethodKind::Mobile,
        }
    }

    /// True for the mobile-money methods
    pub fn is_mobile(&self) -> bool {
        matches!(self.kind(), MethodKind::Mobile)
    }

    /// Leading digits the operator assigns after the country code.
    /// Empty for non-mobile methods.
    pub fn operator_prefixes(&self) -> &'static [char] {
        match self {
            PaymentMethod::OrangeMoney => &['6'],
            PaymentMethod::MtnMoney => &['6', '2'],
            PaymentMethod::Card | PaymentMethod::PayPal => &[],
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(PaymentMethod::Card),
            "paypal" => Ok(PaymentMethod::PayPal),
            "orange_money" => Ok(PaymentMethod::OrangeMoney),
            "mtn_money" => Ok(PaymentMethod::MtnMoney),
            other => Err(PaymentError::MethodNotSupported {
                method: other.to_string(),
            }),
        }
    }
}

/// Payable amount bounds for a method, in the smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountLimits {
    pub min: i64,
    pub max: i64,
}

impl AmountLimits {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// True if the amount falls inside the inclusive range
    pub fn contains(&self, amount: i64) -> bool {
        amount >= self.min && amount <= self.max
    }
}

/// Static knowledge about one payment method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub method: PaymentMethod,

    /// Human-facing name
    pub display_name: String,

    /// Short description shown next to the method
    #[serde(default)]
    pub description: String,

    /// Flat surcharge added to the payable total, smallest unit
    pub fee_fixed: i64,

    /// Allowed payable amount range
    pub limits: AmountLimits,

    /// Expected confirmation window, for display
    #[serde(default)]
    pub processing_time: String,

    /// Selection gate: unavailable methods must not reach detail capture
    #[serde(default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

/// Override entry as it appears in `config/methods.toml`
#[derive(Debug, Deserialize)]
struct MethodOverride {
    id: String,
    #[serde(default)]
    available: Option<bool>,
    #[serde(default)]
    fee_fixed: Option<i64>,
    #[serde(default)]
    min: Option<i64>,
    #[serde(default)]
    max: Option<i64>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MethodFile {
    #[serde(default)]
    methods: Vec<MethodOverride>,
}

/// Registry of the supported payment methods.
///
/// Always holds a descriptor for every method in [`ALL_METHODS`];
/// availability gates selection, not presence.
#[derive(Debug, Clone)]
pub struct MethodRegistry {
    descriptors: Vec<MethodDescriptor>,
}

impl MethodRegistry {
    /// Built-in defaults for the four methods
    pub fn defaults() -> Self {
        let descriptors = vec![
            MethodDescriptor {
                method: PaymentMethod::Card,
                display_name: "Bank Card".to_string(),
                description: "Visa, Mastercard, American Express".to_string(),
                fee_fixed: 0,
                limits: AmountLimits::new(1_000, 5_000_000),
                processing_time: "immediate".to_string(),
                available: true,
            },
            MethodDescriptor {
                method: PaymentMethod::PayPal,
                display_name: "PayPal".to_string(),
                description: "Pay with your PayPal account".to_string(),
                fee_fixed: 0,
                limits: AmountLimits::new(1_000, 3_000_000),
                processing_time: "immediate".to_string(),
                available: true,
            },
            MethodDescriptor {
                method: PaymentMethod::OrangeMoney,
                display_name: "Orange Money".to_string(),
                description: "Orange Money mobile payment".to_string(),
                fee_fixed: 50,
                limits: AmountLimits::new(100, 2_000_000),
                processing_time: "2-5 minutes".to_string(),
                available: true,
            },
            MethodDescriptor {
                method: PaymentMethod::MtnMoney,
                display_name: "MTN Money".to_string(),
                description: "MTN Mobile Money payment".to_string(),
                fee_fixed: 50,
                limits: AmountLimits::new(100, 1_500_000),
                processing_time: "2-5 minutes".to_string(),
                available: true,
            },
        ];

        Self { descriptors }
    }

    /// Build from defaults plus TOML overrides. Entries with an
    /// unknown id are skipped with a warning.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let file: MethodFile = toml::from_str(toml_str)?;
        let mut registry = Self::defaults();

        for entry in file.methods {
            let Ok(method) = PaymentMethod::from_str(&entry.id) else {
                tracing::warn!("Unknown payment method id in config: {}", entry.id);
                continue;
            };
            let descriptor = registry.descriptor_mut(method);
            if let Some(available) = entry.available {
                descriptor.available = available;
            }
            if let Some(fee) = entry.fee_fixed {
                descriptor.fee_fixed = fee;
            }
            if let Some(min) = entry.min {
                descriptor.limits.min = min;
            }
            if let Some(max) = entry.max {
                descriptor.limits.max = max;
            }
            if let Some(name) = entry.display_name {
                descriptor.display_name = name;
            }
        }

        Ok(registry)
    }

    fn descriptor_mut(&mut self, method: PaymentMethod) -> &mut MethodDescriptor {
        self.descriptors
            .iter_mut()
            .find(|d| d.method == method)
            .expect("registry holds every method")
    }

    /// Descriptor for a method — every known method is present
    pub fn get(&self, method: PaymentMethod) -> &MethodDescriptor {
        self.descriptors
            .iter()
            .find(|d| d.method == method)
            .expect("registry holds every method")
    }

    /// True if the method may be selected for checkout
    pub fn is_available(&self, method: PaymentMethod) -> bool {
        self.get(method).available
    }

    /// Fixed fee for a method, smallest unit (0 for card/paypal)
    pub fn fee_for(&self, method: PaymentMethod) -> i64 {
        self.get(method).fee_fixed
    }

    /// Allowed amount range for a method
    pub fn limits_for(&self, method: PaymentMethod) -> AmountLimits {
        self.get(method).limits
    }

    /// Enforce the amount-limit policy for a method
    pub fn check_amount(&self, method: PaymentMethod, amount: i64) -> PaymentResult<()> {
        let limits = self.limits_for(method);
        if limits.contains(amount) {
            Ok(())
        } else {
            Err(PaymentError::AmountOutOfRange {
                amount,
                min: limits.min,
                max: limits.max,
            })
        }
    }

    /// All selectable methods, in display order
    pub fn available_methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.descriptors.iter().filter(|d| d.available)
    }

    /// All descriptors, including unavailable ones
    pub fn all(&self) -> &[MethodDescriptor] {
        &self.descriptors
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_ids_round_trip() {
        for method in ALL_METHODS {
            assert_eq!(PaymentMethod::from_str(method.as_str()).unwrap(), method);
        }
        assert!(matches!(
            PaymentMethod::from_str("bitcoin"),
            Err(PaymentError::MethodNotSupported { .. })
        ));
    }

    #[test]
    fn test_default_fees() {
        let registry = MethodRegistry::defaults();
        assert_eq!(registry.fee_for(PaymentMethod::Card), 0);
        assert_eq!(registry.fee_for(PaymentMethod::PayPal), 0);
        assert_eq!(registry.fee_for(PaymentMethod::OrangeMoney), 50);
        assert_eq!(registry.fee_for(PaymentMethod::MtnMoney), 50);
    }

    #[test]
    fn test_default_limits() {
        let registry = MethodRegistry::defaults();
        assert_eq!(
            registry.limits_for(PaymentMethod::Card),
            AmountLimits::new(1_000, 5_000_000)
        );
        assert_eq!(
            registry.limits_for(PaymentMethod::MtnMoney),
            AmountLimits::new(100, 1_500_000)
        );
    }

    #[test]
    fn test_check_amount() {
        let registry = MethodRegistry::defaults();
        assert!(registry.check_amount(PaymentMethod::OrangeMoney, 100).is_ok());
        assert!(registry
            .check_amount(PaymentMethod::OrangeMoney, 2_000_000)
            .is_ok());
        assert!(matches!(
            registry.check_amount(PaymentMethod::OrangeMoney, 99),
            Err(PaymentError::AmountOutOfRange { min: 100, .. })
        ));
        assert!(matches!(
            registry.check_amount(PaymentMethod::Card, 10_000_000),
            Err(PaymentError::AmountOutOfRange { max: 5_000_000, .. })
        ));
    }

    #[test]
    fn test_toml_overrides() {
        let toml_str = r#"
            [[methods]]
            id = "paypal"
            available = false

            [[methods]]
            id = "orange_money"
            fee_fixed = 75
            max = 2500000

            [[methods]]
            id = "carrier_pigeon"
            available = true
        "#;

        let registry = MethodRegistry::from_toml(toml_str).unwrap();
        assert!(!registry.is_available(PaymentMethod::PayPal));
        assert_eq!(registry.fee_for(PaymentMethod::OrangeMoney), 75);
        assert_eq!(registry.limits_for(PaymentMethod::OrangeMoney).max, 2_500_000);
        // unknown ids are skipped, known defaults untouched
        assert!(registry.is_available(PaymentMethod::Card));
        assert_eq!(registry.available_methods().count(), 3);
    }

    #[test]
    fn test_operator_prefixes() {
        assert_eq!(PaymentMethod::OrangeMoney.operator_prefixes(), &['6']);
        assert_eq!(PaymentMethod::MtnMoney.operator_prefixes(), &['6', '2']);
        assert!(PaymentMethod::Card.operator_prefixes().is_empty());
    }
}
