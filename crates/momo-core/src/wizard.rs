//! # Checkout Wizard
//!
//! The mobile-money checkout flow as a synchronous state machine.
//!
//! The wizard owns no clock and performs no I/O. Each transition checks
//! the current [`CheckoutState`], mutates the wizard, and returns the
//! [`WizardEffect`]s the caller must carry out. Rejected transitions
//! leave the wizard untouched.

use crate::amount::OrderAmount;
use crate::collaborators::{Route, Toast, WizardEffect};
use crate::error::{CheckoutError, CheckoutResult};
use crate::phone::{Operator, PhoneInput, PhoneNumber};
use crate::reference::PaymentReference;
use crate::state::CheckoutState;
use crate::strategy::{PaymentOutcome, PaymentRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Progress is complete at this value
pub const PROGRESS_MAX: u8 = 100;

/// Progress ticks stop here until the payment resolves
pub const PENDING_PROGRESS_CEILING: u8 = 90;

/// Serializable view of a wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardSnapshot {
    pub state: CheckoutState,
    /// Digits typed so far
    pub phone: String,
    pub operator: Operator,
    pub amount: OrderAmount,
    pub amount_display: String,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<PaymentReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

/// One customer's pass through checkout
#[derive(Debug, Clone)]
pub struct CheckoutWizard {
    state: CheckoutState,
    phone: PhoneInput,
    /// Set when Continue accepted the phone
    confirmed_phone: Option<PhoneNumber>,
    amount: OrderAmount,
    progress: u8,
    reference: Option<PaymentReference>,
    error: Option<String>,
    redirect: Option<Route>,
}

impl CheckoutWizard {
    pub fn new(amount: OrderAmount) -> Self {
        Self {
            state: CheckoutState::AwaitingPhone,
            phone: PhoneInput::new(),
            confirmed_phone: None,
            amount,
            progress: 0,
            reference: None,
            error: None,
            redirect: None,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn phone_digits(&self) -> &str {
        self.phone.digits()
    }

    /// Operator for the digits currently typed
    pub fn operator(&self) -> Operator {
        self.phone.operator()
    }

    pub fn confirmed_phone(&self) -> Option<&PhoneNumber> {
        self.confirmed_phone.as_ref()
    }

    pub fn amount(&self) -> OrderAmount {
        self.amount
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn reference(&self) -> Option<&PaymentReference> {
        self.reference.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn redirect(&self) -> Option<&Route> {
        self.redirect.as_ref()
    }

    fn reject(&self, action: &str) -> CheckoutError {
        CheckoutError::InvalidTransition {
            action: action.to_string(),
            state: self.state.to_string(),
        }
    }

    /// Replace the phone field. Returns the operator detected so far.
    pub fn edit_phone(&mut self, raw: &str) -> CheckoutResult<Operator> {
        if !self.state.can_edit_phone() {
            return Err(self.reject("edit phone"));
        }
        self.phone.set(raw);
        self.error = None;
        Ok(self.phone.operator())
    }

    /// Continue from the phone step.
    ///
    /// An invalid phone keeps the wizard on `AwaitingPhone`, records the
    /// validation message and asks for an error toast.
    pub fn submit_phone(&mut self) -> CheckoutResult<Vec<WizardEffect>> {
        if !self.state.can_continue() {
            return Err(self.reject("continue"));
        }

        match self.phone.validate() {
            Ok(phone) => {
                debug!(operator = %phone.operator(), "Phone accepted");
                self.confirmed_phone = Some(phone);
                self.error = None;
                self.state = CheckoutState::Confirming;
                Ok(Vec::new())
            }
            Err(err) => {
                let message = err.to_string();
                self.error = Some(message.clone());
                Ok(vec![WizardEffect::Notify(Toast::destructive(
                    "Invalid phone number",
                    message,
                ))])
            }
        }
    }

    /// Back from the confirmation step. The typed phone is kept.
    pub fn back(&mut self) -> CheckoutResult<()> {
        if !self.state.can_go_back() {
            return Err(self.reject("go back"));
        }
        self.confirmed_phone = None;
        self.state = CheckoutState::AwaitingPhone;
        Ok(())
    }

    /// Confirm and pay. Returns the request to hand to the outcome strategy.
    pub fn confirm(&mut self) -> CheckoutResult<PaymentRequest> {
        if !self.state.can_confirm() {
            return Err(self.reject("confirm"));
        }
        let phone = self
            .confirmed_phone
            .clone()
            .ok_or_else(|| CheckoutError::Internal("confirming without a phone".to_string()))?;

        self.state = CheckoutState::Processing;
        self.progress = 0;
        Ok(PaymentRequest {
            phone,
            amount: self.amount,
        })
    }

    /// Advance the progress indicator by `step`, capped at
    /// [`PENDING_PROGRESS_CEILING`]. Only valid while processing.
    pub fn advance_progress(&mut self, step: u8) -> CheckoutResult<u8> {
        if !self.state.is_processing() {
            return Err(self.reject("advance progress"));
        }
        self.progress = self
            .progress
            .saturating_add(step)
            .min(PENDING_PROGRESS_CEILING);
        Ok(self.progress)
    }

    /// Resolve the processing step. Succeeds at most once per confirmation.
    pub fn resolve(&mut self, outcome: PaymentOutcome) -> CheckoutResult<Vec<WizardEffect>> {
        if !self.state.is_processing() {
            return Err(self.reject("resolve payment"));
        }

        match outcome {
            PaymentOutcome::Approved { reference } => {
                let operator = self
                    .confirmed_phone
                    .as_ref()
                    .map(PhoneNumber::operator)
                    .unwrap_or_default();
                let description = format!(
                    "Your {} payment of {} was received. Reference: {}",
                    operator.service_name(),
                    self.amount,
                    reference
                );
                self.state = CheckoutState::Succeeded;
                self.progress = PROGRESS_MAX;
                self.reference = Some(reference);
                self.error = None;
                Ok(vec![
                    WizardEffect::Notify(Toast::success("Payment successful", description)),
                    WizardEffect::ClearCart,
                    WizardEffect::Celebrate,
                ])
            }
            PaymentOutcome::Declined { reason } => {
                let err = CheckoutError::SimulatedPaymentFailure { reason };
                let message = err.to_string();
                self.state = CheckoutState::Failed;
                self.error = Some(message.clone());
                Ok(vec![WizardEffect::Notify(Toast::destructive(
                    "Payment failed",
                    format!("{}. Please try again.", message),
                ))])
            }
        }
    }

    /// Start over after a failure. Nothing from the previous attempt is kept.
    pub fn retry(&mut self) -> CheckoutResult<()> {
        if !self.state.can_retry() {
            return Err(self.reject("retry"));
        }
        self.phone.clear();
        self.confirmed_phone = None;
        self.progress = 0;
        self.reference = None;
        self.error = None;
        self.redirect = None;
        self.state = CheckoutState::AwaitingPhone;
        Ok(())
    }

    /// Leave a failed checkout for the cart page
    pub fn back_to_cart(&mut self) -> CheckoutResult<Vec<WizardEffect>> {
        if !self.state.can_retry() {
            return Err(self.reject("return to cart"));
        }
        Ok(self.navigate(Route::Cart))
    }

    /// Close the success screen and move on to the order confirmation
    pub fn close(&mut self) -> CheckoutResult<Vec<WizardEffect>> {
        if !self.state.can_close() {
            return Err(self.reject("close"));
        }
        let reference = self
            .reference
            .as_ref()
            .map(|r| r.to_string())
            .unwrap_or_default();
        Ok(self.navigate(Route::OrderConfirmation { reference }))
    }

    fn navigate(&mut self, route: Route) -> Vec<WizardEffect> {
        self.redirect = Some(route.clone());
        vec![WizardEffect::Navigate(route)]
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            state: self.state,
            phone: self.phone.digits().to_string(),
            operator: self.phone.operator(),
            amount: self.amount,
            amount_display: self.amount.display(),
            progress: self.progress,
            reference: self.reference.clone(),
            error: self.error.clone(),
            redirect: self.redirect.as_ref().map(Route::path),
        }
    }
}
