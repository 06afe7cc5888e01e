//! # Payment Session State Machine
//!
//! One session per checkout attempt, driven from method selection
//! through an asynchronous provider confirmation:
//!
//! ```text
//! SelectingMethod --select_method--> CapturingDetails
//! CapturingDetails --begin_submit--> Processing
//! Processing --validation fails--> CapturingDetails (error surfaced)
//! Processing --provider resolves--> Succeeded (terminal)
//! Processing --provider rejects--> Failed (editable again for retry)
//! ```
//!
//! Submission is split into `begin_submit` / `complete_submit` around
//! the provider await so a caller holding the session behind a lock
//! can release it during the call. An epoch counter makes completions
//! that race a `reset()` or an abandoned session silent no-ops — a
//! torn-down session is never mutated by a late provider answer.

use crate::error::{PaymentError, PaymentResult};
use crate::input::MethodInput;
use crate::method::{MethodRegistry, PaymentMethod};
use crate::product::Currency;
use crate::provider::{
    CustomerData, PaymentRequest, PaymentStatus, ProviderReceipt, ProviderRouter, ReceiptData,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Upper wall-clock bound for a single provider call
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a session currently sits in the checkout flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    SelectingMethod,
    CapturingDetails,
    Processing,
    Succeeded,
    Failed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::SelectingMethod => "selecting_method",
            SessionState::CapturingDetails => "capturing_details",
            SessionState::Processing => "processing",
            SessionState::Succeeded => "succeeded",
            SessionState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized terminal result of a payment attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcome {
    /// Provider transaction id; empty when the attempt failed
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub message: String,
    pub method: PaymentMethod,
    /// Payable amount the attempt was made for, smallest unit
    pub amount: i64,
    #[serde(default)]
    pub data: ReceiptData,
    pub completed_at: DateTime<Utc>,
}

/// Handle for an in-flight submission.
///
/// Produced by [`PaymentSession::begin_submit`]; carries the request to
/// hand to the provider and the epoch that pins the result back to the
/// session generation that started it.
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    epoch: u64,
    pub request: PaymentRequest,
    pub timeout: Duration,
}

/// How a completed submission resolved against the session
#[derive(Debug)]
pub enum SubmitResolution {
    /// Provider confirmed; session is Succeeded
    Completed(PaymentOutcome),
    /// Provider rejected or timed out; session is Failed and editable
    Rejected(PaymentError),
    /// The session was reset or replaced while the call was in flight;
    /// the result was dropped without touching state
    Discarded,
}

/// One attempted payment flow, from method selection to terminal
/// success or failure. The payable amount is fixed at creation.
///
/// The session never mutates the cart — clearing order intent on
/// success is the consumer's responsibility.
#[derive(Debug)]
pub struct PaymentSession {
    pub id: Uuid,
    amount: i64,
    currency: Currency,
    customer: CustomerData,
    method: Option<PaymentMethod>,
    input: MethodInput,
    state: SessionState,
    outcome: Option<PaymentOutcome>,
    last_error: Option<String>,
    epoch: u64,
    call_timeout: Duration,
    created_at: DateTime<Utc>,
}

impl PaymentSession {
    /// Open a session for a fixed payable amount
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            currency,
            customer: CustomerData::default(),
            method: None,
            input: MethodInput::None,
            state: SessionState::SelectingMethod,
            outcome: None,
            last_error: None,
            epoch: 0,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            created_at: Utc::now(),
        }
    }

    /// Builder: attach buyer details
    pub fn with_customer(mut self, customer: CustomerData) -> Self {
        self.customer = customer;
        self
    }

    /// Builder: override the per-call wall-clock bound
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn method(&self) -> Option<PaymentMethod> {
        self.method
    }

    pub fn outcome(&self) -> Option<&PaymentOutcome> {
        self.outcome.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// States in which captured input may still be edited
    fn is_editable(&self) -> bool {
        matches!(
            self.state,
            SessionState::CapturingDetails | SessionState::Failed
        )
    }

    /// Select a payment method and move to detail capture.
    ///
    /// Requires the registry to mark the method available; otherwise
    /// the transition is rejected and the state is unchanged. Captured
    /// input is reset for the newly selected method.
    pub fn select_method(
        &mut self,
        method: PaymentMethod,
        registry: &MethodRegistry,
    ) -> PaymentResult<()> {
        match self.state {
            SessionState::Processing => return Err(PaymentError::AlreadyProcessing),
            SessionState::Succeeded => {
                return Err(PaymentError::InvalidState {
                    expected: "selecting_method".to_string(),
                    actual: self.state.to_string(),
                })
            }
            _ => {}
        }

        if !registry.is_available(method) {
            return Err(PaymentError::MethodUnavailable {
                method: method.to_string(),
            });
        }

        self.method = Some(method);
        self.input = MethodInput::None;
        self.last_error = None;
        self.state = SessionState::CapturingDetails;
        Ok(())
    }

    /// Return to method selection, clearing the chosen method and any
    /// captured input. Allowed from any state except mid-Processing.
    pub fn back_to_selection(&mut self) -> PaymentResult<()> {
        if self.state == SessionState::Processing {
            return Err(PaymentError::AlreadyProcessing);
        }
        self.method = None;
        self.input = MethodInput::None;
        self.last_error = None;
        self.state = SessionState::SelectingMethod;
        Ok(())
    }

    /// Replace the captured method-specific input
    pub fn set_input(&mut self, input: MethodInput) -> PaymentResult<()> {
        match self.state {
            SessionState::Processing => Err(PaymentError::AlreadyProcessing),
            _ if self.is_editable() => {
                self.input = input;
                self.state = SessionState::CapturingDetails;
                Ok(())
            }
            _ => Err(PaymentError::InvalidState {
                expected: "capturing_details".to_string(),
                actual: self.state.to_string(),
            }),
        }
    }

    /// Validate and enter Processing.
    ///
    /// Rejections before the provider is involved — no method selected,
    /// amount outside the method's limits, or captured input failing
    /// its validator — leave the session editable and are returned as
    /// values. A session already Processing rejects further submits so
    /// at most one provider call is ever in flight.
    pub fn begin_submit(&mut self, registry: &MethodRegistry) -> PaymentResult<SubmitTicket> {
        if self.state == SessionState::Processing {
            return Err(PaymentError::AlreadyProcessing);
        }

        let method = self.method.ok_or(PaymentError::NoMethodSelected)?;

        if !self.is_editable() {
            return Err(PaymentError::InvalidState {
                expected: "capturing_details".to_string(),
                actual: self.state.to_string(),
            });
        }

        if let Err(e) = registry.check_amount(method, self.amount) {
            self.last_error = Some(e.to_string());
            self.state = SessionState::CapturingDetails;
            return Err(e);
        }

        if let Err(e) = self
            .input
            .validate_for(method, Utc::now().date_naive())
        {
            self.last_error = Some(e.to_string());
            self.state = SessionState::CapturingDetails;
            return Err(e);
        }

        let request = PaymentRequest {
            amount: self.amount,
            currency: self.currency,
            method,
            customer: self.request_customer(),
            input: self.input.clone(),
        };

        self.state = SessionState::Processing;
        Ok(SubmitTicket {
            epoch: self.epoch,
            request,
            timeout: self.call_timeout,
        })
    }

    /// Apply a provider result for a previously issued ticket.
    ///
    /// A result whose ticket no longer matches the session generation
    /// (the session was reset while the call was in flight) is dropped
    /// without any observable effect.
    pub fn complete_submit(
        &mut self,
        ticket: &SubmitTicket,
        result: PaymentResult<ProviderReceipt>,
    ) -> SubmitResolution {
        if ticket.epoch != self.epoch || self.state != SessionState::Processing {
            return SubmitResolution::Discarded;
        }

        match result {
            Ok(receipt) => {
                let outcome = PaymentOutcome {
                    transaction_id: receipt.transaction_id,
                    status: receipt.status,
                    message: receipt.message,
                    method: ticket.request.method,
                    amount: self.amount,
                    data: receipt.data,
                    completed_at: Utc::now(),
                };
                self.outcome = Some(outcome.clone());
                self.last_error = None;
                self.state = SessionState::Succeeded;
                SubmitResolution::Completed(outcome)
            }
            Err(err) => {
                self.outcome = Some(PaymentOutcome {
                    transaction_id: String::new(),
                    status: PaymentStatus::Failed,
                    message: err.to_string(),
                    method: ticket.request.method,
                    amount: self.amount,
                    data: ReceiptData::None,
                    completed_at: Utc::now(),
                });
                self.last_error = Some(err.to_string());
                // recoverable: the session stays editable for a retry
                // with corrected input or a different method
                self.state = SessionState::Failed;
                SubmitResolution::Rejected(err)
            }
        }
    }

    /// Single-owner convenience: begin, run the provider call under its
    /// wall-clock bound, and complete.
    pub async fn submit(
        &mut self,
        registry: &MethodRegistry,
        router: &ProviderRouter,
    ) -> PaymentResult<PaymentOutcome> {
        let ticket = self.begin_submit(registry)?;
        let result = dispatch(router, &ticket).await;
        match self.complete_submit(&ticket, result) {
            SubmitResolution::Completed(outcome) => Ok(outcome),
            SubmitResolution::Rejected(err) => Err(err),
            SubmitResolution::Discarded => Err(PaymentError::Internal(
                "submission resolved against a stale session".to_string(),
            )),
        }
    }

    /// Abandon the current attempt: clears method, input and outcome,
    /// returns to SelectingMethod, and invalidates any in-flight
    /// submission so its late result is discarded.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.method = None;
        self.input = MethodInput::None;
        self.outcome = None;
        self.last_error = None;
        self.state = SessionState::SelectingMethod;
    }

    /// Buyer details enriched from the captured input, the way the
    /// provider expects them (card holder as name, wallet number as
    /// phone).
    fn request_customer(&self) -> CustomerData {
        let mut customer = self.customer.clone();
        match &self.input {
            MethodInput::Card(card) => {
                if customer.name.is_none() && !card.holder.is_empty() {
                    customer.name = Some(card.holder.clone());
                }
            }
            MethodInput::Mobile(mobile) => {
                if customer.phone.is_none() {
                    customer.phone = Some(mobile.phone_number.clone());
                }
            }
            MethodInput::None => {}
        }
        customer
    }
}

/// Run the provider call for a ticket under its wall-clock bound.
///
/// A missing provider resolves to `MethodNotSupported` and a timeout
/// to `Timeout` — both ordinary recoverable results for
/// [`PaymentSession::complete_submit`].
pub async fn dispatch(
    router: &ProviderRouter,
    ticket: &SubmitTicket,
) -> PaymentResult<ProviderReceipt> {
    let method = ticket.request.method;
    let Some(provider) = router.get(method) else {
        return Err(PaymentError::MethodNotSupported {
            method: method.to_string(),
        });
    };

    match tokio::time::timeout(ticket.timeout, provider.process(&ticket.request)).await {
        Ok(result) => result,
        Err(_) => Err(PaymentError::Timeout {
            provider: provider.name().to_string(),
        }),
    }
}
