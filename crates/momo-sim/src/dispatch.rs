//! # Effect Dispatch
//!
//! Routes wizard effects to the collaborators bound to a session.

use momo_core::{
    CartCollaborator, Celebration, LoggingCelebration, LoggingNavigator, Navigator, Notifier,
    TracingNotifier, WizardEffect,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Collaborators a checkout session talks to
#[derive(Clone)]
pub struct Collaborators {
    pub cart: Arc<dyn CartCollaborator>,
    pub notifier: Arc<dyn Notifier>,
    pub celebration: Arc<dyn Celebration>,
    pub navigator: Arc<dyn Navigator>,
}

impl Collaborators {
    /// Bind a cart, logging everything else
    pub fn logging(cart: Arc<dyn CartCollaborator>) -> Self {
        Self {
            cart,
            notifier: Arc::new(TracingNotifier),
            celebration: Arc::new(LoggingCelebration),
            navigator: Arc::new(LoggingNavigator),
        }
    }

    /// Builder: replace the notifier
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Builder: replace the celebration effect
    pub fn with_celebration(mut self, celebration: Arc<dyn Celebration>) -> Self {
        self.celebration = celebration;
        self
    }

    /// Builder: replace the navigator
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }
}

/// Carry out effects in order.
///
/// A failing notifier is logged and skipped; the remaining effects still run.
pub async fn dispatch_effects(collaborators: &Collaborators, effects: Vec<WizardEffect>) {
    for effect in effects {
        debug!(?effect, "Dispatching effect");
        match effect {
            WizardEffect::Notify(toast) => {
                if let Err(e) = collaborators.notifier.notify(&toast).await {
                    warn!("Notification failed: {}", e);
                }
            }
            WizardEffect::ClearCart => collaborators.cart.clear_cart(),
            WizardEffect::Celebrate => collaborators.celebration.trigger_celebration(),
            WizardEffect::Navigate(route) => collaborators.navigator.navigate(&route),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use momo_core::{Route, Toast};

    #[tokio::test]
    async fn test_dispatch_in_order() {
        let recorders = Recorders::new(RecordingCart::with_total(1000, 2));
        let collaborators = recorders.collaborators();

        dispatch_effects(
            &collaborators,
            vec![
                WizardEffect::Notify(Toast::success("ok", "paid")),
                WizardEffect::ClearCart,
                WizardEffect::Celebrate,
                WizardEffect::Navigate(Route::Home),
            ],
        )
        .await;

        assert_eq!(recorders.notifier.toasts().len(), 1);
        assert_eq!(recorders.cart.clears(), 1);
        assert_eq!(recorders.celebration.count(), 1);
        assert_eq!(recorders.navigator.routes(), vec![Route::Home]);
    }

    #[tokio::test]
    async fn test_failing_notifier_does_not_stop_dispatch() {
        let recorders = Recorders::with_notifier(
            RecordingCart::with_total(1000, 1),
            RecordingNotifier::failing(),
        );

        dispatch_effects(
            &recorders.collaborators(),
            vec![
                WizardEffect::Notify(Toast::success("ok", "paid")),
                WizardEffect::ClearCart,
            ],
        )
        .await;

        assert_eq!(recorders.cart.clears(), 1);
    }
}
