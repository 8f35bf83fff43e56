//! # Order Amounts
//!
//! Amounts are whole francs CFA (XAF has no minor unit in practice).

use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};

/// ISO 4217 code of the only supported currency
pub const CURRENCY_CODE: &str = "XAF";

/// A positive amount to pay, fixed for the lifetime of a checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct OrderAmount(i64);

impl OrderAmount {
    /// Create an amount; zero and negative values are rejected
    pub fn new(amount: i64) -> CheckoutResult<Self> {
        if amount <= 0 {
            return Err(CheckoutError::InvalidAmount(amount));
        }
        Ok(Self(amount))
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Format for display (e.g., "12 500 FCFA")
    pub fn display(&self) -> String {
        format_francs(self.0)
    }
}

impl TryFrom<i64> for OrderAmount {
    type Error = CheckoutError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrderAmount> for i64 {
    fn from(amount: OrderAmount) -> Self {
        amount.0
    }
}

impl std::fmt::Display for OrderAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Group thousands with spaces and append the currency label
pub fn format_francs(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{} FCFA", sign, grouped)
}
