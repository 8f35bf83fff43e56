//! # Checkout Error Types
//!
//! Typed error handling for the momo checkout engine.
//! All checkout operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Phone number does not have exactly 9 digits
    #[error("Invalid phone number: expected 9 digits, got {digits}")]
    InvalidPhoneLength { digits: usize },

    /// Phone prefix belongs to neither Orange nor MTN
    #[error("Unknown operator for prefix {prefix}")]
    UnknownOperatorPrefix { prefix: String },

    /// Simulated processing resolved negatively
    #[error("Payment failed: {reason}")]
    SimulatedPaymentFailure { reason: String },

    /// Action not allowed in the current wizard state
    #[error("Cannot {action} while {state}")]
    InvalidTransition { action: String, state: String },

    /// Checkout requested for a cart with no items
    #[error("Cart is empty")]
    EmptyCart,

    /// Amount is zero or negative
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// Line quantity is zero or above the per-line limit
    #[error("Invalid quantity: {quantity} (allowed 1 to {max})")]
    InvalidQuantity { quantity: u64, max: u32 },

    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Checkout session not found or already closed
    #[error("Checkout session not found: {session_id}")]
    SessionNotFound { session_id: String },

    /// Configuration errors (bad env values, missing catalog)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Notification collaborator failed
    #[error("Notification error: {0}")]
    Notification(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckoutError {
    /// Returns true if the wizard recovers from this error locally,
    /// by staying put or going back to an earlier step.
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            CheckoutError::InvalidPhoneLength { .. }
                | CheckoutError::UnknownOperatorPrefix { .. }
                | CheckoutError::SimulatedPaymentFailure { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::InvalidPhoneLength { .. } => 422,
            CheckoutError::UnknownOperatorPrefix { .. } => 422,
            CheckoutError::SimulatedPaymentFailure { .. } => 402,
            CheckoutError::InvalidTransition { .. } => 409,
            CheckoutError::EmptyCart => 400,
            CheckoutError::InvalidAmount(_) => 400,
            CheckoutError::InvalidQuantity { .. } => 400,
            CheckoutError::ProductNotFound { .. } => 404,
            CheckoutError::SessionNotFound { .. } => 404,
            CheckoutError::Configuration(_) => 500,
            CheckoutError::Notification(_) => 502,
            CheckoutError::Internal(_) => 500,
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
