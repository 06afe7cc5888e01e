//! # Simulated Card Provider
//!
//! Stands in for a card acquirer: waits out the configured
//! confirmation delay, re-checks the card shape at the boundary, and
//! answers with a normalized receipt carrying brand and last-four echo
//! data.

use async_trait::async_trait;
use cart_core::{
    MethodInput, PaymentError, PaymentMethod, PaymentProvider, PaymentRequest, PaymentResult,
    PaymentStatus, ProviderReceipt, ReceiptData,
};
use std::time::Duration;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Simulated card acquirer
pub struct CardProvider {
    delay: Duration,
}

impl CardProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PaymentProvider for CardProvider {
    #[instrument(skip(self, request), fields(amount = request.amount))]
    async fn process(&self, request: &PaymentRequest) -> PaymentResult<ProviderReceipt> {
        tokio::time::sleep(self.delay).await;

        let MethodInput::Card(card) = &request.input else {
            return Err(PaymentError::Provider {
                provider: self.name().to_string(),
                message: "missing card details".to_string(),
            });
        };

        // boundary re-check: a real acquirer rejects malformed data too
        card.validate().map_err(|_| PaymentError::Provider {
            provider: self.name().to_string(),
            message: "invalid card data".to_string(),
        })?;

        let transaction_id = format!("CARD_{}", Uuid::new_v4().simple());
        debug!("Card payment confirmed: {}", transaction_id);

        Ok(ProviderReceipt {
            transaction_id,
            status: PaymentStatus::Completed,
            message: format!("{} payment completed", card.brand()),
            data: ReceiptData::Card {
                brand: card.brand(),
                last4: card.last4(),
            },
        })
    }

    fn method(&self) -> PaymentMethod {
        PaymentMethod::Card
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_core::{CardBrand, CardDetails, Currency, CustomerData};

    fn request(input: MethodInput) -> PaymentRequest {
        PaymentRequest {
            amount: 50_000,
            currency: Currency::XAF,
            method: PaymentMethod::Card,
            customer: CustomerData::default(),
            input,
        }
    }

    #[tokio::test]
    async fn test_confirms_valid_card() {
        let provider = CardProvider::new(Duration::ZERO);
        let receipt = provider
            .process(&request(MethodInput::Card(CardDetails {
                number: "4111 1111 1111 1111".to_string(),
                expiry: "12/49".to_string(),
                cvv: "123".to_string(),
                holder: "JOHN DOE".to_string(),
            })))
            .await
            .unwrap();

        assert!(receipt.transaction_id.starts_with("CARD_"));
        assert_eq!(receipt.status, PaymentStatus::Completed);
        assert_eq!(
            receipt.data,
            ReceiptData::Card {
                brand: CardBrand::Visa,
                last4: "1111".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_rejects_malformed_card() {
        let provider = CardProvider::new(Duration::ZERO);
        let err = provider
            .process(&request(MethodInput::Card(CardDetails {
                number: "4111".to_string(),
                expiry: "12/49".to_string(),
                cvv: "123".to_string(),
                holder: "JOHN DOE".to_string(),
            })))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::Provider { .. }));
    }

    #[tokio::test]
    async fn test_rejects_missing_card_details() {
        let provider = CardProvider::new(Duration::ZERO);
        let err = provider.process(&request(MethodInput::None)).await.unwrap_err();
        assert!(matches!(err, PaymentError::Provider { .. }));
    }
}
