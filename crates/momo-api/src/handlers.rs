//! # Request Handlers
//!
//! Axum request handlers for the storefront checkout API.
//! Each checkout session wraps one wizard; handlers map wizard actions to
//! HTTP and return the session snapshot after every action.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use momo_core::{
    validate_phone as run_phone_validation, Cart, CheckoutError, PhoneValidation, Product, Route,
    WizardSnapshot,
};
use momo_sim::CheckoutSession;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Add-to-cart request
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Cart contents with its total
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart_id: String,
    #[serde(flatten)]
    pub cart: Cart,
    pub total: i64,
    pub total_display: String,
}

impl CartResponse {
    fn new(cart_id: String, cart: Cart) -> Self {
        let total = cart.total();
        Self {
            cart_id,
            total_display: momo_core::format_francs(total),
            total,
            cart,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PhoneRequest {
    pub phone: String,
}

/// Open-checkout request
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    pub cart_id: String,
}

/// A session id with its current snapshot
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub snapshot: WizardSnapshot,
}

impl CheckoutResponse {
    fn new(session: &CheckoutSession, snapshot: WizardSnapshot) -> Self {
        Self {
            session_id: session.id(),
            snapshot,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Where the client should go next, if anywhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
            redirect: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_redirect(mut self, route: &Route) -> Self {
        self.redirect = Some(route.path());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn checkout_error_to_response(err: CheckoutError) -> ApiError {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    if matches!(err, CheckoutError::EmptyCart) {
        response = response.with_redirect(&Route::Cart);
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "momo-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List active products
pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog.active_products().cloned().collect())
}

/// Get a product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    state
        .catalog
        .get(&product_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| checkout_error_to_response(CheckoutError::ProductNotFound { product_id }))
}

/// Get cart contents
pub async fn get_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
) -> Json<CartResponse> {
    let cart = state.carts.get(&cart_id);
    Json(CartResponse::new(cart_id, cart))
}

/// Add a product to a cart
#[instrument(skip(state, request), fields(product_id = %request.product_id))]
pub async fn add_cart_item(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let product = state.catalog.get(&request.product_id).ok_or_else(|| {
        checkout_error_to_response(CheckoutError::ProductNotFound {
            product_id: request.product_id.clone(),
        })
    })?;

    if !product.active {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                format!("Product is not available: {}", product.id),
                400,
            )),
        ));
    }

    let cart = state
        .carts
        .add_product(&cart_id, product, request.quantity)
        .map_err(checkout_error_to_response)?;
    Ok(Json(CartResponse::new(cart_id, cart)))
}

/// Empty a cart
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
) -> StatusCode {
    state.carts.clear(&cart_id);
    StatusCode::NO_CONTENT
}

/// Validate a phone entry without opening a checkout
pub async fn validate_phone(Json(request): Json<PhoneRequest>) -> Json<PhoneValidation> {
    Json(run_phone_validation(&request.phone))
}

/// Open a checkout wizard over a cart
#[instrument(skip(state, request), fields(cart_id = %request.cart_id))]
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(request): Json<CreateCheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let session = CheckoutSession::open(
        state.simulation.clone(),
        state.strategy.clone(),
        state.collaborators_for(&request.cart_id),
    )
    .map_err(|e| {
        warn!("Checkout not opened: {}", e);
        checkout_error_to_response(e)
    })?;

    let session = state.sessions.insert(session).await;
    let snapshot = session.snapshot().await;
    info!(session_id = %session.id(), "Checkout session created");

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse::new(&session, snapshot)),
    ))
}

/// Get the current snapshot of a checkout
pub async fn get_checkout(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .map_err(checkout_error_to_response)?;
    let snapshot = session.snapshot().await;
    Ok(Json(CheckoutResponse::new(&session, snapshot)))
}

/// Replace the phone buffer of a checkout
pub async fn edit_phone(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<PhoneRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .map_err(checkout_error_to_response)?;
    let snapshot = session
        .edit_phone(&request.phone)
        .await
        .map_err(checkout_error_to_response)?;
    Ok(Json(CheckoutResponse::new(&session, snapshot)))
}

/// Run a wizard action: `continue`, `confirm`, `back`, `retry`,
/// `back-to-cart` or `close`.
///
/// Actions that navigate away (`back-to-cart`, `close`) also drop the
/// session; the response is its final snapshot.
#[instrument(skip(state))]
pub async fn checkout_action(
    State(state): State<AppState>,
    Path((session_id, action)): Path<(Uuid, String)>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .map_err(checkout_error_to_response)?;

    let result = match action.as_str() {
        "continue" => session.submit_phone().await,
        "confirm" => session.confirm().await,
        "back" => session.back().await,
        "retry" => session.retry().await,
        "back-to-cart" => session.back_to_cart().await,
        "close" => session.close().await,
        other => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(format!("Unknown checkout action: {}", other), 404)),
            ))
        }
    };

    let snapshot = result.map_err(checkout_error_to_response)?;

    // The customer is leaving a finished checkout; nothing else will read it.
    if snapshot.redirect.is_some() && state.sessions.remove(session_id).await.is_ok() {
        info!(session_id = %session_id, "Checkout session finished");
    }

    Ok(Json(CheckoutResponse::new(&session, snapshot)))
}

/// Unmount a checkout: cancel any processing and drop the session
pub async fn delete_checkout(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .remove(session_id)
        .await
        .map_err(checkout_error_to_response)?;
    info!(session_id = %session_id, "Checkout session closed");
    Ok(StatusCode::NO_CONTENT)
}
