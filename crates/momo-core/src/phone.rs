//! # Phone Numbers & Operators
//!
//! Cameroonian subscriber numbers (9 digits, no country code) and
//! operator detection from the 3-digit prefix.

use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};

/// Number of digits in a subscriber number
pub const PHONE_DIGITS: usize = 9;

/// Number of leading digits that identify the operator
pub const PREFIX_DIGITS: usize = 3;

/// Country calling code for Cameroon
pub const COUNTRY_CODE: &str = "237";

const ORANGE_PREFIXES: &[(u16, u16)] = &[(655, 659), (690, 699), (700, 709)];
const MTN_PREFIXES: &[(u16, u16)] = &[(650, 654), (670, 679), (680, 689)];

/// Mobile-money operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Orange,
    Mtn,
    Unknown,
}

impl Operator {
    /// Operator for a 3-digit prefix
    pub fn from_prefix(prefix: u16) -> Self {
        let within = |ranges: &[(u16, u16)]| {
            ranges
                .iter()
                .any(|(lo, hi)| (*lo..=*hi).contains(&prefix))
        };
        if within(ORANGE_PREFIXES) {
            Operator::Orange
        } else if within(MTN_PREFIXES) {
            Operator::Mtn
        } else {
            Operator::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Orange => "orange",
            Operator::Mtn => "mtn",
            Operator::Unknown => "unknown",
        }
    }

    /// Branded service name shown to customers
    pub fn service_name(&self) -> &'static str {
        match self {
            Operator::Orange => "Orange Money",
            Operator::Mtn => "MTN Mobile Money",
            Operator::Unknown => "Mobile Money",
        }
    }

    /// Short code used in payment references
    pub fn reference_code(&self) -> &'static str {
        match self {
            Operator::Orange => "OM",
            Operator::Mtn => "MOMO",
            Operator::Unknown => "PAY",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Operator::Unknown)
    }
}

impl Default for Operator {
    fn default() -> Self {
        Operator::Unknown
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.service_name())
    }
}

/// Strip every non-digit character
pub fn normalize_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Detect the operator from whatever has been typed so far.
///
/// Runs on every keystroke; returns `Unknown` below three digits.
pub fn detect_operator(raw: &str) -> Operator {
    let digits = normalize_digits(raw);
    operator_for_digits(&digits)
}

fn operator_for_digits(digits: &str) -> Operator {
    digits
        .get(..PREFIX_DIGITS)
        .filter(|p| p.len() == PREFIX_DIGITS)
        .and_then(|p| p.parse::<u16>().ok())
        .map(Operator::from_prefix)
        .unwrap_or(Operator::Unknown)
}

/// Result of validating a raw phone entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneValidation {
    pub valid: bool,
    pub operator: Operator,
    /// Digits only
    pub normalized: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Validate a raw phone entry.
///
/// Pure: the same input always yields the same result.
pub fn validate_phone(raw: &str) -> PhoneValidation {
    let normalized = normalize_digits(raw);
    match PhoneNumber::from_digits(&normalized) {
        Ok(phone) => PhoneValidation {
            valid: true,
            operator: phone.operator(),
            normalized,
            error: None,
        },
        Err(err) => PhoneValidation {
            valid: false,
            operator: operator_for_digits(&normalized),
            normalized,
            error: Some(err.to_string()),
        },
    }
}

/// A validated 9-digit subscriber number with a known operator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber {
    digits: String,
    operator: Operator,
}

impl PhoneNumber {
    /// Parse a raw entry, ignoring separators like spaces and dashes
    pub fn parse(raw: &str) -> CheckoutResult<Self> {
        Self::from_digits(&normalize_digits(raw))
    }

    fn from_digits(digits: &str) -> CheckoutResult<Self> {
        if digits.len() != PHONE_DIGITS {
            return Err(CheckoutError::InvalidPhoneLength {
                digits: digits.len(),
            });
        }

        let operator = operator_for_digits(digits);
        if !operator.is_known() {
            return Err(CheckoutError::UnknownOperatorPrefix {
                prefix: digits[..PREFIX_DIGITS].to_string(),
            });
        }

        Ok(Self {
            digits: digits.to_string(),
            operator,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// E.164 form, e.g. "+237655123456"
    pub fn international(&self) -> String {
        format!("+{}{}", COUNTRY_CODE, self.digits)
    }

    /// Grouped for display, e.g. "6 55 12 34 56"
    pub fn display(&self) -> String {
        let d = &self.digits;
        format!("{} {} {} {} {}", &d[..1], &d[1..3], &d[3..5], &d[5..7], &d[7..9])
    }
}

/// Phone field being edited.
///
/// Holds at most 9 digits; anything past that is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneInput {
    digits: String,
}

impl PhoneInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffer with a new raw entry
    pub fn set(&mut self, raw: &str) {
        self.digits = normalize_digits(raw).chars().take(PHONE_DIGITS).collect();
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn operator(&self) -> Operator {
        operator_for_digits(&self.digits)
    }

    pub fn validate(&self) -> CheckoutResult<PhoneNumber> {
        PhoneNumber::from_digits(&self.digits)
    }
}
