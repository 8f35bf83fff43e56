//! # Simulation Configuration
//!
//! Timing and outcome settings for the simulated processing step.
//! Values come from environment variables, with defaults for everything.

use momo_core::{BoxedOutcomeStrategy, CheckoutError, CheckoutResult, FixedOutcome};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::outcome::RandomOutcome;

/// Default time between confirmation and resolution
pub const DEFAULT_PROCESSING_DELAY_MS: u64 = 3500;

/// Default interval between progress ticks
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 300;

/// Default progress added per tick
pub const DEFAULT_PROGRESS_STEP: u8 = 10;

/// Default share of simulated payments that succeed
pub const DEFAULT_SUCCESS_PROBABILITY: f64 = 0.9;

/// How simulated payments resolve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum OutcomePolicy {
    /// Every payment succeeds
    AlwaysSucceed,
    /// Each payment succeeds with the given probability
    Probabilistic { success_probability: f64 },
}

impl Default for OutcomePolicy {
    fn default() -> Self {
        OutcomePolicy::Probabilistic {
            success_probability: DEFAULT_SUCCESS_PROBABILITY,
        }
    }
}

/// Processing simulation configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Time from confirmation to resolution
    pub processing_delay: Duration,

    /// Interval between progress ticks
    pub tick_interval: Duration,

    /// Progress added per tick
    pub progress_step: u8,

    pub outcome_policy: OutcomePolicy,
}

impl SimulationConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `MOMO_PROCESSING_DELAY_MS`
    /// - `MOMO_TICK_INTERVAL_MS`
    /// - `MOMO_PROGRESS_STEP`
    /// - `MOMO_OUTCOME_POLICY` (`always_succeed` or `probabilistic`)
    /// - `MOMO_SUCCESS_PROBABILITY`
    pub fn from_env() -> CheckoutResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (environment, map, ...)
    pub fn from_lookup<F>(lookup: F) -> CheckoutResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let delay_ms = parse_var(&lookup, "MOMO_PROCESSING_DELAY_MS")?
            .unwrap_or(DEFAULT_PROCESSING_DELAY_MS);
        let tick_ms =
            parse_var(&lookup, "MOMO_TICK_INTERVAL_MS")?.unwrap_or(DEFAULT_TICK_INTERVAL_MS);
        let progress_step =
            parse_var(&lookup, "MOMO_PROGRESS_STEP")?.unwrap_or(DEFAULT_PROGRESS_STEP);
        let success_probability = parse_var(&lookup, "MOMO_SUCCESS_PROBABILITY")?
            .unwrap_or(DEFAULT_SUCCESS_PROBABILITY);

        let outcome_policy = match lookup("MOMO_OUTCOME_POLICY").as_deref() {
            None | Some("probabilistic") => OutcomePolicy::Probabilistic {
                success_probability,
            },
            Some("always_succeed") => OutcomePolicy::AlwaysSucceed,
            Some(other) => {
                return Err(CheckoutError::Configuration(format!(
                    "MOMO_OUTCOME_POLICY must be always_succeed or probabilistic, got {}",
                    other
                )))
            }
        };

        let config = Self {
            processing_delay: Duration::from_millis(delay_ms),
            tick_interval: Duration::from_millis(tick_ms),
            progress_step,
            outcome_policy,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CheckoutResult<()> {
        if self.tick_interval.is_zero() {
            return Err(CheckoutError::Configuration(
                "MOMO_TICK_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }

        if self.progress_step == 0 {
            return Err(CheckoutError::Configuration(
                "MOMO_PROGRESS_STEP must be greater than zero".to_string(),
            ));
        }

        if let OutcomePolicy::Probabilistic {
            success_probability,
        } = self.outcome_policy
        {
            if !(0.0..=1.0).contains(&success_probability) {
                return Err(CheckoutError::Configuration(format!(
                    "MOMO_SUCCESS_PROBABILITY must be within 0..=1, got {}",
                    success_probability
                )));
            }
        }

        Ok(())
    }

    /// Builder: set processing delay
    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    /// Builder: set tick interval
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Builder: set progress step
    pub fn with_progress_step(mut self, step: u8) -> Self {
        self.progress_step = step;
        self
    }

    /// Builder: set outcome policy
    pub fn with_outcome_policy(mut self, policy: OutcomePolicy) -> Self {
        self.outcome_policy = policy;
        self
    }

    /// Strategy implementing the configured policy
    pub fn outcome_strategy(&self) -> CheckoutResult<BoxedOutcomeStrategy> {
        Ok(match self.outcome_policy {
            OutcomePolicy::AlwaysSucceed => Arc::new(FixedOutcome::Approve),
            OutcomePolicy::Probabilistic {
                success_probability,
            } => Arc::new(RandomOutcome::new(success_probability)?),
        })
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_millis(DEFAULT_PROCESSING_DELAY_MS),
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            progress_step: DEFAULT_PROGRESS_STEP,
            outcome_policy: OutcomePolicy::default(),
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> CheckoutResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| {
                CheckoutError::Configuration(format!("{} has an invalid value: {}", key, raw))
            })
        })
        .transpose()
}
