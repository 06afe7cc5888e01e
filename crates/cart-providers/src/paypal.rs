//! # Simulated PayPal Provider
//!
//! Models the external-redirect flow: no local fields are required, so
//! the simulation only waits out the redirect round-trip and confirms.

use async_trait::async_trait;
use cart_core::{
    PaymentMethod, PaymentProvider, PaymentRequest, PaymentResult, PaymentStatus,
    ProviderReceipt, ReceiptData,
};
use std::time::Duration;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Simulated PayPal redirect flow
pub struct PayPalProvider {
    delay: Duration,
}

impl PayPalProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PaymentProvider for PayPalProvider {
    #[instrument(skip(self, request), fields(amount = request.amount))]
    async fn process(&self, request: &PaymentRequest) -> PaymentResult<ProviderReceipt> {
        tokio::time::sleep(self.delay).await;

        let transaction_id = format!("PP_{}", Uuid::new_v4().simple());
        debug!("PayPal payment confirmed: {}", transaction_id);

        Ok(ProviderReceipt {
            transaction_id,
            status: PaymentStatus::Completed,
            message: "PayPal payment completed".to_string(),
            data: ReceiptData::None,
        })
    }

    fn method(&self) -> PaymentMethod {
        PaymentMethod::PayPal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_core::{Currency, CustomerData, MethodInput};

    #[tokio::test]
    async fn test_confirms_without_input() {
        let provider = PayPalProvider::new(Duration::ZERO);
        let receipt = provider
            .process(&PaymentRequest {
                amount: 25_000,
                currency: Currency::XAF,
                method: PaymentMethod::PayPal,
                customer: CustomerData::default(),
                input: MethodInput::None,
            })
            .await
            .unwrap();

        assert!(receipt.transaction_id.starts_with("PP_"));
        assert_eq!(receipt.status, PaymentStatus::Completed);
        assert_eq!(receipt.data, ReceiptData::None);
    }
}
