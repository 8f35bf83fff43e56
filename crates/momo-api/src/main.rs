//! # momo-checkout
//!
//! Storefront checkout server with simulated mobile-money payments.
//!
//! ## Usage
//!
//! ```bash
//! # Optional simulation tuning
//! export MOMO_PROCESSING_DELAY_MS=3500
//! export MOMO_OUTCOME_POLICY=probabilistic
//! export MOMO_SUCCESS_PROBABILITY=0.9
//!
//! # Run the server
//! momo-checkout
//! ```

use momo_api::{routes, state::AppState};
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Products loaded: {}", state.catalog.products.len());
    info!(
        "Outcome strategy: {} (processing {:?})",
        state.strategy.name(),
        state.simulation.processing_delay
    );

    state.sessions.spawn_sweeper(SESSION_SWEEP_INTERVAL, state.config.session_ttl);
    info!("Checkout sessions expire after {:?}", state.config.session_ttl);

    let app = routes::create_router(state);

    info!("📱 Momo checkout starting on http://{}", addr);

    if !is_prod {
        info!("🛒 Products: GET http://{}/api/v1/products", addr);
        info!("💳 Checkout: POST http://{}/api/v1/checkout", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  📱 Momo Checkout 📱
  ━━━━━━━━━━━━━━━━━━━━━━━
  Orange Money & MTN MoMo
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
