//! # momo-sim
//!
//! Simulated mobile-money processing for momo-checkout-rs.
//!
//! There is no operator gateway behind this crate. Confirmed payments
//! wait out a configurable delay while a progress indicator advances,
//! then resolve through an [`momo_core::OutcomeStrategy`]:
//!
//! 1. **FixedOutcome** - always approve or always decline (tests, demos)
//! 2. **RandomOutcome** - approve with a configured probability
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use momo_sim::{CheckoutSession, Collaborators, SimulationConfig};
//!
//! let config = SimulationConfig::from_env()?;
//! let strategy = config.outcome_strategy()?;
//! let session = CheckoutSession::open(config, strategy, Collaborators::logging(cart))?;
//!
//! session.edit_phone("655 12 34 56").await?;
//! session.submit_phone().await?;
//! session.confirm().await?;
//!
//! let mut live = session.subscribe();
//! while live.changed().await.is_ok() {
//!     println!("{}%", live.borrow().progress);
//! }
//! ```

pub mod config;
pub mod dispatch;
pub mod outcome;
pub mod processor;
pub mod registry;
pub mod session;

// Re-exports
pub use config::{OutcomePolicy, SimulationConfig};
pub use dispatch::{dispatch_effects, Collaborators};
pub use outcome::RandomOutcome;
pub use processor::ProcessingGuard;
pub use registry::SessionRegistry;
pub use session::CheckoutSession;
