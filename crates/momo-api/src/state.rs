//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the product catalog, carts, open checkout sessions, and the
//! processing simulation settings.

use crate::notifier::WebhookNotifier;
use momo_core::{BoxedOutcomeStrategy, CartStore, Notifier, ProductCatalog, TracingNotifier};
use momo_sim::{Collaborators, SessionRegistry, SimulationConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Unfinished checkouts are dropped after 30 minutes by default
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Where to forward toasts, if anywhere
    pub notify_webhook_url: Option<String>,
    /// Shared secret for notification signatures
    pub notify_webhook_secret: String,
    /// How long an unfinished checkout session is kept
    pub session_ttl: Duration,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            notify_webhook_url: std::env::var("NOTIFY_WEBHOOK_URL")
                .ok()
                .filter(|u| !u.is_empty()),
            notify_webhook_secret: std::env::var("NOTIFY_WEBHOOK_SECRET").unwrap_or_default(),
            session_ttl: std::env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_SESSION_TTL),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e)
            })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            notify_webhook_url: None,
            notify_webhook_secret: String::new(),
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Product catalog
    pub catalog: Arc<ProductCatalog>,
    pub carts: CartStore,
    /// Open checkout sessions
    pub sessions: SessionRegistry,
    pub simulation: SimulationConfig,
    /// Decides how confirmed payments resolve
    pub strategy: BoxedOutcomeStrategy,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Create state from environment and `config/products.toml`
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let catalog = load_product_catalog()?;

        let simulation = SimulationConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load simulation config: {}", e))?;
        let strategy = simulation
            .outcome_strategy()
            .map_err(|e| anyhow::anyhow!("Failed to build outcome strategy: {}", e))?;

        let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
            Some(url) => {
                tracing::info!("Forwarding notifications to {}", url);
                Arc::new(
                    WebhookNotifier::new(url.clone(), config.notify_webhook_secret.clone())
                        .map_err(|e| anyhow::anyhow!("Failed to create notifier: {}", e))?,
                )
            }
            None => Arc::new(TracingNotifier),
        };

        Ok(Self::from_parts(config, catalog, simulation, strategy, notifier))
    }

    /// Assemble state from explicit parts (tests, embedding)
    pub fn from_parts(
        config: AppConfig,
        catalog: ProductCatalog,
        simulation: SimulationConfig,
        strategy: BoxedOutcomeStrategy,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            catalog: Arc::new(catalog),
            carts: CartStore::new(),
            sessions: SessionRegistry::new(),
            simulation,
            strategy,
            notifier,
        }
    }

    /// Collaborators for a checkout over one cart
    pub fn collaborators_for(&self, cart_id: &str) -> Collaborators {
        Collaborators::logging(Arc::new(self.carts.handle(cart_id)))
            .with_notifier(self.notifier.clone())
    }
}

/// Load product catalog from config file
fn load_product_catalog() -> anyhow::Result<ProductCatalog> {
    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = ProductCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} products from {}", catalog.products.len(), path);
            return Ok(catalog);
        }
    }

    // Return empty catalog if no config found
    tracing::warn!("No product catalog found, using empty catalog");
    Ok(ProductCatalog::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use momo_core::{CartCollaborator, FixedOutcome};

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(!config.is_production());
        assert!(config.notify_webhook_url.is_none());
        assert_eq!(config.session_ttl, DEFAULT_SESSION_TTL);
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..AppConfig::default()
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");

        let bad = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::default()
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_collaborators_bind_cart() {
        let state = AppState::from_parts(
            AppConfig::default(),
            ProductCatalog::new(),
            SimulationConfig::default(),
            Arc::new(FixedOutcome::Approve),
            Arc::new(TracingNotifier),
        );
        let product = momo_core::Product::new("bissap", "Bissap", "mama-juice", 1500);
        state.carts.add_product("c1", &product, 2).unwrap();

        let collaborators = state.collaborators_for("c1");
        assert_eq!(collaborators.cart.total(), 3000);
        collaborators.cart.clear_cart();
        assert!(state.carts.get("c1").is_empty());
    }
}
