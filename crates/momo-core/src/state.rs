//! Checkout wizard states.

use serde::{Deserialize, Serialize};

/// The step a checkout wizard is on.
///
/// State transitions:
/// ```text
///                 ┌──────── back ────────┐
///                 ▼                      │
/// AwaitingPhone ──continue──► Confirming ──confirm──► Processing ──┬──► Succeeded
///       ▲                                                         │
///       └──────────────────────── retry ─────────── Failed ◄──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    /// Collecting the subscriber number.
    AwaitingPhone,

    /// Phone accepted, customer reviews the order.
    Confirming,

    /// Simulated payment in flight.
    Processing,

    /// Payment went through (terminal state).
    Succeeded,

    /// Payment was refused (terminal, resumable via retry).
    Failed,
}

impl Default for CheckoutState {
    fn default() -> Self {
        CheckoutState::AwaitingPhone
    }
}

impl CheckoutState {
    pub fn can_edit_phone(&self) -> bool {
        matches!(self, CheckoutState::AwaitingPhone)
    }

    pub fn can_continue(&self) -> bool {
        matches!(self, CheckoutState::AwaitingPhone)
    }

    pub fn can_confirm(&self) -> bool {
        matches!(self, CheckoutState::Confirming)
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self, CheckoutState::Confirming)
    }

    /// Progress ticks and resolution only apply while processing.
    pub fn is_processing(&self) -> bool {
        matches!(self, CheckoutState::Processing)
    }

    pub fn can_retry(&self) -> bool {
        matches!(self, CheckoutState::Failed)
    }

    pub fn can_close(&self) -> bool {
        matches!(self, CheckoutState::Succeeded)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutState::Succeeded | CheckoutState::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::AwaitingPhone => "AwaitingPhone",
            CheckoutState::Confirming => "Confirming",
            CheckoutState::Processing => "Processing",
            CheckoutState::Succeeded => "Succeeded",
            CheckoutState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CheckoutState; 5] = [
        CheckoutState::AwaitingPhone,
        CheckoutState::Confirming,
        CheckoutState::Processing,
        CheckoutState::Succeeded,
        CheckoutState::Failed,
    ];

    #[test]
    fn test_default_state_is_awaiting_phone() {
        assert_eq!(CheckoutState::default(), CheckoutState::AwaitingPhone);
    }

    #[test]
    fn test_each_action_has_one_source_state() {
        let count = |f: fn(&CheckoutState) -> bool| ALL.iter().filter(|s| f(s)).count();
        assert_eq!(count(CheckoutState::can_continue), 1);
        assert_eq!(count(CheckoutState::can_confirm), 1);
        assert_eq!(count(CheckoutState::can_go_back), 1);
        assert_eq!(count(CheckoutState::can_retry), 1);
        assert_eq!(count(CheckoutState::can_close), 1);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!CheckoutState::AwaitingPhone.is_terminal());
        assert!(!CheckoutState::Confirming.is_terminal());
        assert!(!CheckoutState::Processing.is_terminal());
        assert!(CheckoutState::Succeeded.is_terminal());
        assert!(CheckoutState::Failed.is_terminal());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&CheckoutState::AwaitingPhone).unwrap();
        assert_eq!(json, "\"awaiting_phone\"");
        let back: CheckoutState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CheckoutState::AwaitingPhone);
    }
}
