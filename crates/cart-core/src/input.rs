//! # Method Input & Validators
//!
//! Method-specific captured fields and their structural validation.
//! Validation is purely local — no provider is contacted until the
//! captured input passes these checks.

use crate::error::{PaymentError, PaymentResult};
use crate::method::PaymentMethod;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Country calling code all mobile-money numbers must carry
pub const MOBILE_COUNTRY_CODE: &str = "237";

/// Card brand, classified from the leading digit. Display-only —
/// classification never affects validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardBrand {
    Visa,
    Mastercard,
    AmericanExpress,
    Unknown,
}

impl CardBrand {
    /// Classify a card number by its leading digit
    pub fn from_number(number: &str) -> Self {
        let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
        match digits.chars().next() {
            Some('4') => CardBrand::Visa,
            Some('5') | Some('2') => CardBrand::Mastercard,
            Some('3') => CardBrand::AmericanExpress,
            _ => CardBrand::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardBrand::Visa => "Visa",
            CardBrand::Mastercard => "Mastercard",
            CardBrand::AmericanExpress => "American Express",
            CardBrand::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for CardBrand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Captured card fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardDetails {
    /// Card number, separators allowed
    pub number: String,
    /// Expiry as MM/YY
    pub expiry: String,
    /// Card verification value, 3-4 digits
    pub cvv: String,
    /// Cardholder name
    pub holder: String,
}

impl CardDetails {
    fn digits(&self) -> String {
        self.number.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Last four digits, for receipts
    pub fn last4(&self) -> String {
        let digits = self.digits();
        let start = digits.len().saturating_sub(4);
        digits[start..].to_string()
    }

    /// Brand classification for display
    pub fn brand(&self) -> CardBrand {
        CardBrand::from_number(&self.number)
    }

    /// Parse the expiry as (month, full year), shape-checked only
    fn parse_expiry(&self) -> Option<(u32, i32)> {
        let (mm, yy) = self.expiry.split_once('/')?;
        if mm.len() != 2 || yy.len() != 2 {
            return None;
        }
        let month: u32 = mm.parse().ok()?;
        let year: i32 = yy.parse().ok()?;
        Some((month, 2000 + year))
    }

    /// Validate all card fields against a reference date.
    ///
    /// Any failing field yields the single aggregated "invalid card
    /// data" rejection — field-level detail is not reported.
    pub fn validate_at(&self, today: NaiveDate) -> PaymentResult<()> {
        let digits = self.digits();
        let number_ok = (16..=19).contains(&digits.len());

        let expiry_ok = match self.parse_expiry() {
            Some((month, year)) => {
                (1..=12).contains(&month)
                    && (year > today.year()
                        || (year == today.year() && month >= today.month()))
            }
            None => false,
        };

        let cvv_ok =
            (3..=4).contains(&self.cvv.len()) && self.cvv.chars().all(|c| c.is_ascii_digit());

        let holder_ok = self.holder.trim().len() >= 2;

        if number_ok && expiry_ok && cvv_ok && holder_ok {
            Ok(())
        } else {
            Err(PaymentError::Validation("invalid card data".to_string()))
        }
    }

    /// Validate against the current date
    pub fn validate(&self) -> PaymentResult<()> {
        self.validate_at(chrono::Utc::now().date_naive())
    }
}

/// Captured mobile-money fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MobileDetails {
    /// Subscriber number, formatting characters allowed
    pub phone_number: String,
    /// Optional wallet PIN — captured but never validated locally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
}

impl MobileDetails {
    /// The number with all non-digits stripped
    pub fn digits(&self) -> String {
        self.phone_number
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect()
    }

    /// Validate the number shape for an operator: country code plus
    /// nine digits, with the operator's leading digit right after the
    /// country code.
    pub fn validate(&self, operator_prefixes: &[char]) -> PaymentResult<()> {
        let digits = self.digits();

        let shape_ok = digits.starts_with(MOBILE_COUNTRY_CODE) && digits.len() == 12;
        let operator_ok = digits
            .chars()
            .nth(MOBILE_COUNTRY_CODE.len())
            .map(|d| operator_prefixes.contains(&d))
            .unwrap_or(false);

        if shape_ok && operator_ok {
            Ok(())
        } else {
            Err(PaymentError::Validation(
                "invalid mobile money number".to_string(),
            ))
        }
    }
}

/// Method-specific captured input for a payment session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MethodInput {
    Card(CardDetails),
    Mobile(MobileDetails),
    #[default]
    None,
}

impl MethodInput {
    /// Validate the captured input for the given method at a reference
    /// date. PayPal defers to its external redirect and needs no local
    /// fields; a card/mobile method with missing or mismatched input
    /// is a validation failure, not a panic.
    pub fn validate_for(&self, method: PaymentMethod, today: NaiveDate) -> PaymentResult<()> {
        match (method, self) {
            (PaymentMethod::Card, MethodInput::Card(card)) => card.validate_at(today),
            (PaymentMethod::OrangeMoney | PaymentMethod::MtnMoney, MethodInput::Mobile(mobile)) => {
                mobile.validate(method.operator_prefixes())
            }
            (PaymentMethod::PayPal, _) => Ok(()),
            (method, _) => Err(PaymentError::Validation(format!(
                "missing payment details for {method}"
            ))),
        }
    }
}
