//! # Simulated Mobile-Money Providers
//!
//! Orange Money and MTN Mobile Money confirmations. The simulation
//! waits out the USSD confirmation window, re-checks the subscriber
//! number at the boundary, and echoes the number plus the operator's
//! flat fee in the receipt.

use async_trait::async_trait;
use cart_core::{
    MethodInput, MobileDetails, PaymentError, PaymentMethod, PaymentProvider, PaymentRequest,
    PaymentResult, PaymentStatus, ProviderReceipt, ReceiptData,
};
use std::time::Duration;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Flat operator fee applied by both mobile-money networks, in FCFA
pub const DEFAULT_MOBILE_FEE: i64 = 50;

fn confirm_mobile(
    method: PaymentMethod,
    prefix: &str,
    fee: i64,
    request: &PaymentRequest,
) -> PaymentResult<ProviderReceipt> {
    let MethodInput::Mobile(mobile) = &request.input else {
        return Err(PaymentError::Provider {
            provider: method.as_str().to_string(),
            message: "missing mobile money details".to_string(),
        });
    };

    check_number(method, mobile)?;

    let transaction_id = format!("{}_{}", prefix, Uuid::new_v4().simple());
    debug!("Mobile money payment confirmed: {}", transaction_id);

    Ok(ProviderReceipt {
        transaction_id,
        status: PaymentStatus::Completed,
        message: format!("{} payment completed", method.as_str()),
        data: ReceiptData::Mobile {
            phone_number: mobile.digits(),
            fee,
        },
    })
}

fn check_number(method: PaymentMethod, mobile: &MobileDetails) -> PaymentResult<()> {
    mobile
        .validate(method.operator_prefixes())
        .map_err(|_| PaymentError::Provider {
            provider: method.as_str().to_string(),
            message: match method {
                PaymentMethod::OrangeMoney => "invalid Orange Money number".to_string(),
                _ => "invalid MTN Money number".to_string(),
            },
        })
}

/// Simulated Orange Money confirmation
pub struct OrangeMoneyProvider {
    delay: Duration,
    fee: i64,
}

impl OrangeMoneyProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fee: DEFAULT_MOBILE_FEE,
        }
    }

    /// Builder: override the operator fee
    pub fn with_fee(mut self, fee: i64) -> Self {
        self.fee = fee;
        self
    }
}

#[async_trait]
impl PaymentProvider for OrangeMoneyProvider {
    #[instrument(skip(self, request), fields(amount = request.amount))]
    async fn process(&self, request: &PaymentRequest) -> PaymentResult<ProviderReceipt> {
        tokio::time::sleep(self.delay).await;
        confirm_mobile(self.method(), "OM", self.fee, request)
    }

    fn method(&self) -> PaymentMethod {
        PaymentMethod::OrangeMoney
    }
}

/// Simulated MTN Mobile Money confirmation
pub struct MtnMoneyProvider {
    delay: Duration,
    fee: i64,
}

impl MtnMoneyProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fee: DEFAULT_MOBILE_FEE,
        }
    }

    /// Builder: override the operator fee
    pub fn with_fee(mut self, fee: i64) -> Self {
        self.fee = fee;
        self
    }
}

#[async_trait]
impl PaymentProvider for MtnMoneyProvider {
    #[instrument(skip(self, request), fields(amount = request.amount))]
    async fn process(&self, request: &PaymentRequest) -> PaymentResult<ProviderReceipt> {
        tokio::time::sleep(self.delay).await;
        confirm_mobile(self.method(), "MTN", self.fee, request)
    }

    fn method(&self) -> PaymentMethod {
        PaymentMethod::MtnMoney
    }
}
