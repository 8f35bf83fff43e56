//! # momo-api
//!
//! HTTP API layer for momo-checkout-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for products, carts, and the checkout wizard
//! - Signed forwarding of checkout notifications
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/products` | List products |
//! | GET | `/api/v1/products/{id}` | Get product |
//! | GET | `/api/v1/carts/{cart_id}` | Cart contents |
//! | POST | `/api/v1/carts/{cart_id}/items` | Add to cart |
//! | DELETE | `/api/v1/carts/{cart_id}` | Clear cart |
//! | POST | `/api/v1/phone/validate` | Validate a phone entry |
//! | POST | `/api/v1/checkout` | Open checkout for a cart |
//! | GET | `/api/v1/checkout/{id}` | Checkout snapshot |
//! | PUT | `/api/v1/checkout/{id}/phone` | Edit phone |
//! | POST | `/api/v1/checkout/{id}/{action}` | Wizard action |
//! | DELETE | `/api/v1/checkout/{id}` | Cancel and drop checkout |

pub mod handlers;
pub mod notifier;
pub mod routes;
pub mod state;

pub use notifier::WebhookNotifier;
pub use routes::create_router;
pub use state::{AppConfig, AppState};
