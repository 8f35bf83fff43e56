//! # Checkout Sessions
//!
//! A session is one mounted checkout wizard: the state machine, its
//! collaborators, the live snapshot channel, and the processing task
//! while one is running.

use crate::config::SimulationConfig;
use crate::dispatch::{dispatch_effects, Collaborators};
use crate::processor::{ProcessingContext, ProcessingGuard};
use chrono::{DateTime, Utc};
use momo_core::{
    BoxedOutcomeStrategy, CheckoutError, CheckoutResult, CheckoutWizard, OrderAmount, Route,
    WizardEffect, WizardSnapshot,
};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// A mounted checkout wizard
pub struct CheckoutSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    ctx: ProcessingContext,
    processing: Mutex<Option<ProcessingGuard>>,
}

impl CheckoutSession {
    /// Open a wizard for the cart bound in `collaborators`.
    ///
    /// An empty cart sends the customer back to the cart page and
    /// fails with `EmptyCart`.
    pub fn open(
        config: SimulationConfig,
        strategy: BoxedOutcomeStrategy,
        collaborators: Collaborators,
    ) -> CheckoutResult<Self> {
        if collaborators.cart.items().is_empty() {
            collaborators.navigator.navigate(&Route::Cart);
            return Err(CheckoutError::EmptyCart);
        }
        let amount = OrderAmount::new(collaborators.cart.total())?;

        let wizard = CheckoutWizard::new(amount);
        let (tx, _rx) = watch::channel(wizard.snapshot());
        let id = Uuid::new_v4();

        info!(session_id = %id, amount = %amount, "Checkout opened");

        Ok(Self {
            id,
            created_at: Utc::now(),
            ctx: ProcessingContext {
                wizard: Arc::new(Mutex::new(wizard)),
                snapshots: Arc::new(tx),
                config,
                strategy,
                collaborators,
            },
            processing: Mutex::new(None),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub async fn snapshot(&self) -> WizardSnapshot {
        self.ctx.wizard.lock().await.snapshot()
    }

    /// Live snapshots, including every progress tick
    pub fn subscribe(&self) -> watch::Receiver<WizardSnapshot> {
        self.ctx.snapshots.subscribe()
    }

    /// Run a transition, publish the new snapshot, then dispatch its effects
    async fn apply<F>(&self, transition: F) -> CheckoutResult<WizardSnapshot>
    where
        F: FnOnce(&mut CheckoutWizard) -> CheckoutResult<Vec<WizardEffect>>,
    {
        let (snapshot, effects) = {
            let mut wizard = self.ctx.wizard.lock().await;
            let effects = transition(&mut wizard)?;
            let snapshot = wizard.snapshot();
            self.ctx.publish(snapshot.clone());
            (snapshot, effects)
        };

        dispatch_effects(&self.ctx.collaborators, effects).await;
        Ok(snapshot)
    }

    /// Keystroke in the phone field
    pub async fn edit_phone(&self, raw: &str) -> CheckoutResult<WizardSnapshot> {
        self.apply(|w| w.edit_phone(raw).map(|_| Vec::new())).await
    }

    /// Continue from the phone step
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn submit_phone(&self) -> CheckoutResult<WizardSnapshot> {
        self.apply(CheckoutWizard::submit_phone).await
    }

    /// Back from confirmation to the phone step
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn back(&self) -> CheckoutResult<WizardSnapshot> {
        self.apply(|w| w.back().map(|_| Vec::new())).await
    }

    /// Confirm and pay; starts the processing task
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn confirm(&self) -> CheckoutResult<WizardSnapshot> {
        let mut processing = self.processing.lock().await;

        let (snapshot, request) = {
            let mut wizard = self.ctx.wizard.lock().await;
            let request = wizard.confirm()?;
            let snapshot = wizard.snapshot();
            self.ctx.publish(snapshot.clone());
            (snapshot, request)
        };

        info!(
            operator = %request.operator(),
            amount = %request.amount,
            "Payment confirmed, processing"
        );
        *processing = Some(ProcessingGuard::spawn(self.ctx.clone(), request));
        Ok(snapshot)
    }

    /// Start over after a failed payment
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn retry(&self) -> CheckoutResult<WizardSnapshot> {
        let snapshot = self.apply(|w| w.retry().map(|_| Vec::new())).await?;
        self.processing.lock().await.take();
        Ok(snapshot)
    }

    /// Leave a failed checkout for the cart page
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn back_to_cart(&self) -> CheckoutResult<WizardSnapshot> {
        self.apply(CheckoutWizard::back_to_cart).await
    }

    /// Close the success screen
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn close(&self) -> CheckoutResult<WizardSnapshot> {
        self.apply(CheckoutWizard::close).await
    }

    /// Unmount: abort processing if it is still running
    pub async fn cancel(&self) {
        if let Some(guard) = self.processing.lock().await.take() {
            guard.cancel();
            debug!(session_id = %self.id, "Checkout cancelled");
        }
    }

    /// True while a processing task is alive
    pub async fn is_processing(&self) -> bool {
        self.processing
            .lock()
            .await
            .as_ref()
            .map(|g| !g.is_finished())
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for CheckoutSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutSession")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
