//! Payment references shown on the success screen.

use crate::phone::Operator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque reference for a completed payment, e.g. `OM-20261018-1A2B3C4D`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentReference(String);

impl PaymentReference {
    /// Generate a fresh reference for the given operator
    pub fn generate(operator: Operator) -> Self {
        Self::generate_at(operator, Utc::now())
    }

    pub fn generate_at(operator: Operator, at: DateTime<Utc>) -> Self {
        let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        Self(format!(
            "{}-{}-{}",
            operator.reference_code(),
            at.format("%Y%m%d"),
            suffix
        ))
    }

    /// Wrap a reference issued elsewhere (e.g. by a gateway)
    pub fn from_string(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
