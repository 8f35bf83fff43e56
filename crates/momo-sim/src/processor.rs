//! # Simulated Processing
//!
//! Background task standing in for the operator gateway while a wizard
//! is in `Processing`: it ticks the progress indicator, waits out the
//! configured delay, asks the outcome strategy, and resolves the wizard.
//!
//! The task is owned by a [`ProcessingGuard`]. Dropping or cancelling the
//! guard aborts the task, so nothing touches the wizard after unmount.
//! Effects of an outcome that already resolved still run to completion.

use crate::config::SimulationConfig;
use crate::dispatch::{dispatch_effects, Collaborators};
use momo_core::{BoxedOutcomeStrategy, CheckoutWizard, PaymentRequest, WizardSnapshot};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

/// Everything the processing task needs, shared with its session
#[derive(Clone)]
pub(crate) struct ProcessingContext {
    pub wizard: Arc<Mutex<CheckoutWizard>>,
    pub snapshots: Arc<watch::Sender<WizardSnapshot>>,
    pub config: SimulationConfig,
    pub strategy: BoxedOutcomeStrategy,
    pub collaborators: Collaborators,
}

impl ProcessingContext {
    pub fn publish(&self, snapshot: WizardSnapshot) {
        self.snapshots.send_replace(snapshot);
    }
}

/// Handle to a running processing task; aborts it on drop
#[derive(Debug)]
pub struct ProcessingGuard {
    handle: JoinHandle<()>,
}

impl ProcessingGuard {
    /// Spawn processing for a wizard that just entered `Processing`
    pub(crate) fn spawn(ctx: ProcessingContext, request: PaymentRequest) -> Self {
        let handle = tokio::spawn(run_processing(ctx, request));
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(&self) {
        if !self.handle.is_finished() {
            debug!("Cancelling payment processing");
        }
        self.handle.abort();
    }
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_processing(ctx: ProcessingContext, request: PaymentRequest) {
    let tick = ctx.config.tick_interval;
    let deadline = time::sleep(ctx.config.processing_delay);
    tokio::pin!(deadline);

    let mut ticker = time::interval_at(Instant::now() + tick, tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = &mut deadline => break,
            _ = ticker.tick() => {
                let mut wizard = ctx.wizard.lock().await;
                match wizard.advance_progress(ctx.config.progress_step) {
                    Ok(progress) => {
                        trace!(progress, "Processing tick");
                        ctx.publish(wizard.snapshot());
                    }
                    // Wizard left Processing without us; nothing more to do.
                    Err(_) => return,
                }
            }
        }
    }

    let outcome = ctx.strategy.process(&request).await;

    let effects = {
        let mut wizard = ctx.wizard.lock().await;
        match wizard.resolve(outcome) {
            Ok(effects) => {
                info!(
                    state = %wizard.state(),
                    operator = %request.operator(),
                    amount = %request.amount,
                    strategy = ctx.strategy.name(),
                    "Payment resolved"
                );
                ctx.publish(wizard.snapshot());
                effects
            }
            Err(e) => {
                warn!("Dropping payment outcome: {}", e);
                return;
            }
        }
    };

    // Effects of a resolved outcome must run even if the guard aborts this task.
    let collaborators = ctx.collaborators.clone();
    let dispatch = tokio::spawn(async move {
        dispatch_effects(&collaborators, effects).await;
    });
    if let Err(e) = dispatch.await {
        warn!("Effect dispatch failed: {}", e);
    }
}
