//! Randomized outcome strategy for the payment simulator.

use async_trait::async_trait;
use momo_core::{
    CheckoutError, CheckoutResult, OutcomeStrategy, PaymentOutcome, PaymentReference,
    PaymentRequest, DECLINED_REASON,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use tracing::debug;

/// Succeeds with a fixed probability
pub struct RandomOutcome {
    success_probability: f64,
    rng: Mutex<StdRng>,
}

impl RandomOutcome {
    /// Seeded from OS entropy
    pub fn new(success_probability: f64) -> CheckoutResult<Self> {
        Self::with_rng(success_probability, StdRng::from_entropy())
    }

    /// Reproducible sequence of outcomes for a given seed
    pub fn seeded(success_probability: f64, seed: u64) -> CheckoutResult<Self> {
        Self::with_rng(success_probability, StdRng::seed_from_u64(seed))
    }

    fn with_rng(success_probability: f64, rng: StdRng) -> CheckoutResult<Self> {
        if !(0.0..=1.0).contains(&success_probability) {
            return Err(CheckoutError::Configuration(format!(
                "success probability must be within 0..=1, got {}",
                success_probability
            )));
        }
        Ok(Self {
            success_probability,
            rng: Mutex::new(rng),
        })
    }

    pub fn success_probability(&self) -> f64 {
        self.success_probability
    }

    fn roll(&self) -> bool {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_bool(self.success_probability)
    }
}

#[async_trait]
impl OutcomeStrategy for RandomOutcome {
    async fn process(&self, request: &PaymentRequest) -> PaymentOutcome {
        let approved = self.roll();
        debug!(approved, operator = %request.operator(), "Simulated payment rolled");

        if approved {
            PaymentOutcome::Approved {
                reference: PaymentReference::generate(request.operator()),
            }
        } else {
            PaymentOutcome::Declined {
                reason: DECLINED_REASON.to_string(),
            }
        }
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
