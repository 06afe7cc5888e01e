//! # Simulated Gateway Utilities
//!
//! Post-payment operations the storefront occasionally needs:
//! transaction verification and refunds. Both are simulated with the
//! same delay-and-normalized-receipt contract as the providers.

use cart_core::{PaymentResult, PaymentStatus, ProviderReceipt, ReceiptData};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Simulated back-office gateway
pub struct SimGateway {
    delay: Duration,
}

impl SimGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Verify a previously issued transaction.
    ///
    /// The simulation confirms any id it is handed; a real gateway
    /// would look the transaction up with the issuing provider.
    #[instrument(skip(self))]
    pub async fn verify_transaction(&self, transaction_id: &str) -> PaymentResult<ProviderReceipt> {
        tokio::time::sleep(self.delay).await;

        info!("Verified transaction {}", transaction_id);
        Ok(ProviderReceipt {
            transaction_id: transaction_id.to_string(),
            status: PaymentStatus::Completed,
            message: "transaction verified".to_string(),
            data: ReceiptData::None,
        })
    }

    /// Refund an amount against a previous transaction. Returns a new
    /// `REF_`-prefixed receipt for the refund itself.
    #[instrument(skip(self), fields(amount))]
    pub async fn refund(&self, transaction_id: &str, amount: i64) -> PaymentResult<ProviderReceipt> {
        tokio::time::sleep(self.delay).await;

        let refund_id = format!("REF_{}", Uuid::new_v4().simple());
        info!(
            "Refunded {} against {} as {}",
            amount, transaction_id, refund_id
        );

        Ok(ProviderReceipt {
            transaction_id: refund_id,
            status: PaymentStatus::Completed,
            message: "refund issued".to_string(),
            data: ReceiptData::None,
        })
    }
}
