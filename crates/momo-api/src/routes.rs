//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Catalog:
///   - GET  /api/v1/products
///   - GET  /api/v1/products/{product_id}
///
/// - Carts:
///   - GET    /api/v1/carts/{cart_id}
///   - POST   /api/v1/carts/{cart_id}/items
///   - DELETE /api/v1/carts/{cart_id}
///
/// - Checkout wizard:
///   - POST   /api/v1/phone/validate
///   - POST   /api/v1/checkout
///   - GET    /api/v1/checkout/{session_id}
///   - PUT    /api/v1/checkout/{session_id}/phone
///   - POST   /api/v1/checkout/{session_id}/{action}
///   - DELETE /api/v1/checkout/{session_id}
pub fn create_router(state: AppState) -> Router {
    // The storefront is served from its own origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let product_routes = Router::new()
        .route("/", get(handlers::list_products))
        .route("/{product_id}", get(handlers::get_product));

    let cart_routes = Router::new()
        .route("/{cart_id}", get(handlers::get_cart).delete(handlers::clear_cart))
        .route("/{cart_id}/items", post(handlers::add_cart_item));

    let checkout_routes = Router::new()
        .route("/", post(handlers::create_checkout))
        .route(
            "/{session_id}",
            get(handlers::get_checkout).delete(handlers::delete_checkout),
        )
        .route("/{session_id}/phone", put(handlers::edit_phone))
        .route("/{session_id}/{action}", post(handlers::checkout_action));

    let api_routes = Router::new()
        .nest("/products", product_routes)
        .nest("/carts", cart_routes)
        .nest("/checkout", checkout_routes)
        .route("/phone/validate", post(handlers::validate_phone));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
