//! # Checkout Collaborators
//!
//! Interfaces the wizard talks to without owning: toasts, the
//! celebration effect, and navigation. The cart collaborator lives in
//! [`crate::cart`].
//!
//! Wizard transitions never call these directly. They return
//! [`WizardEffect`]s which the session layer hands to the collaborators.

use crate::error::CheckoutResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Visual variant of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Default,
    Success,
    Destructive,
}

impl Default for ToastVariant {
    fn default() -> Self {
        ToastVariant::Default
    }
}

/// A user-visible message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub variant: ToastVariant,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: ToastVariant::Success,
            ..Self::new(title, description)
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: ToastVariant::Destructive,
            ..Self::new(title, description)
        }
    }
}

/// Storefront destinations the wizard can send the customer to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Home,
    Cart,
    OrderConfirmation { reference: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Cart => "/cart".to_string(),
            Route::OrderConfirmation { reference } => {
                format!("/orders/confirmation?ref={}", reference)
            }
        }
    }
}

/// Side effects requested by a wizard transition, in dispatch order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEffect {
    Notify(Toast),
    ClearCart,
    Celebrate,
    Navigate(Route),
}

/// Notification collaborator
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, toast: &Toast) -> CheckoutResult<()>;
}

/// Celebration-effect collaborator. Fire-and-forget; calling it twice is harmless.
pub trait Celebration: Send + Sync {
    fn trigger_celebration(&self);
}

/// Navigation collaborator
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &Route);
}

/// Notifier that writes toasts to the log
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, toast: &Toast) -> CheckoutResult<()> {
        match toast.variant {
            ToastVariant::Destructive => warn!("{}: {}", toast.title, toast.description),
            _ => info!("{}: {}", toast.title, toast.description),
        }
        Ok(())
    }
}

/// Celebration that just logs
pub struct LoggingCelebration;

impl Celebration for LoggingCelebration {
    fn trigger_celebration(&self) {
        info!("🎉 Celebration triggered");
    }
}

/// Navigator that just logs
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, route: &Route) {
        info!("Redirecting to {}", route.path());
    }
}
