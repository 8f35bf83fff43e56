//! # momo-core
//!
//! Core types and the checkout wizard for the momo mobile-money checkout.
//!
//! This crate provides:
//! - `validate_phone` and `detect_operator` for Cameroonian subscriber numbers
//! - `CheckoutWizard`, the checkout state machine, and its `CheckoutState`
//! - `OutcomeStrategy` trait for resolving confirmed payments
//! - `Cart`, `CartStore` and `ProductCatalog` for the storefront side
//! - Collaborator traits (`Notifier`, `Celebration`, `Navigator`, `CartCollaborator`)
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use momo_core::{CheckoutWizard, FixedOutcome, OrderAmount, OutcomeStrategy};
//!
//! let mut wizard = CheckoutWizard::new(OrderAmount::new(4500)?);
//! wizard.edit_phone("650 00 00 00")?;
//! wizard.submit_phone()?;
//!
//! let request = wizard.confirm()?;
//! let outcome = FixedOutcome::Approve.process(&request).await;
//! let effects = wizard.resolve(outcome)?;
//! ```

pub mod amount;
pub mod cart;
pub mod catalog;
pub mod collaborators;
pub mod error;
pub mod phone;
pub mod reference;
pub mod state;
pub mod strategy;
pub mod wizard;

// Re-exports for convenience
pub use amount::{format_francs, OrderAmount, CURRENCY_CODE};
pub use cart::{Cart, CartCollaborator, CartHandle, CartItem, CartStore, MAX_LINE_QUANTITY};
pub use catalog::{Category, Product, ProductCatalog};
pub use collaborators::{
    Celebration, LoggingCelebration, LoggingNavigator, Navigator, Notifier, Route, Toast,
    ToastVariant, TracingNotifier, WizardEffect,
};
pub use error::{CheckoutError, CheckoutResult};
pub use phone::{
    detect_operator, normalize_digits, validate_phone, Operator, PhoneInput, PhoneNumber,
    PhoneValidation, PHONE_DIGITS,
};
pub use reference::PaymentReference;
pub use state::CheckoutState;
pub use strategy::{
    BoxedOutcomeStrategy, FixedOutcome, OutcomeStrategy, PaymentOutcome, PaymentRequest,
    DECLINED_REASON,
};
pub use wizard::{CheckoutWizard, WizardSnapshot, PENDING_PROGRESS_CEILING, PROGRESS_MAX};
