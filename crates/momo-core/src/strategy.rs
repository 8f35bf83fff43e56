//! # Payment Outcome Strategy
//!
//! Strategy trait deciding how a confirmed mobile-money payment resolves.
//!
//! ## Design Pattern
//!
//! The processing step never decides the outcome itself. It asks an
//! `OutcomeStrategy`, so the simulator, a fixed outcome for tests, or a
//! real operator gateway can be swapped without touching the wizard.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   OutcomeStrategy (trait)                   │
//! │  ├── process()                                              │
//! │  └── name()                                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!          ┌─────────────────┼─────────────────┐
//!          │                 │                 │
//!  ┌───────┴───────┐ ┌───────┴───────┐ ┌───────┴───────┐
//!  │ FixedOutcome  │ │ RandomOutcome │ │ Operator API  │
//!  │  (momo-core)  │ │  (momo-sim)   │ │   (future)    │
//!  └───────────────┘ └───────────────┘ └───────────────┘
//! ```

use crate::amount::OrderAmount;
use crate::phone::{Operator, PhoneNumber};
use crate::reference::PaymentReference;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What gets charged once the customer confirms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub phone: PhoneNumber,
    pub amount: OrderAmount,
}

impl PaymentRequest {
    pub fn operator(&self) -> Operator {
        self.phone.operator()
    }
}

/// How a payment resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PaymentOutcome {
    Approved { reference: PaymentReference },
    Declined { reason: String },
}

impl PaymentOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, PaymentOutcome::Approved { .. })
    }
}

/// Decides the outcome of a confirmed payment.
#[async_trait]
pub trait OutcomeStrategy: Send + Sync {
    /// Resolve the payment. This is the only suspension point of the
    /// processing step, apart from the progress delay.
    async fn process(&self, request: &PaymentRequest) -> PaymentOutcome;

    /// Strategy name (for logging).
    fn name(&self) -> &'static str;
}

/// Type alias for a shared outcome strategy (dynamic dispatch)
pub type BoxedOutcomeStrategy = Arc<dyn OutcomeStrategy>;

/// Always resolves the same way. Used for deterministic flows and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedOutcome {
    Approve,
    Decline,
}

/// Reason reported for declined simulated payments
pub const DECLINED_REASON: &str = "The operator declined the transaction";

#[async_trait]
impl OutcomeStrategy for FixedOutcome {
    async fn process(&self, request: &PaymentRequest) -> PaymentOutcome {
        match self {
            FixedOutcome::Approve => PaymentOutcome::Approved {
                reference: PaymentReference::generate(request.operator()),
            },
            FixedOutcome::Decline => PaymentOutcome::Declined {
                reason: DECLINED_REASON.to_string(),
            },
        }
    }

    fn name(&self) -> &'static str {
        match self {
            FixedOutcome::Approve => "always_approve",
            FixedOutcome::Decline => "always_decline",
        }
    }
}
