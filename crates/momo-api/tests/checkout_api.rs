//! End-to-end tests for the checkout HTTP API.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use momo_api::{create_router, AppConfig, AppState};
use momo_core::{FixedOutcome, Product, ProductCatalog, TracingNotifier};
use momo_sim::SimulationConfig;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn catalog() -> ProductCatalog {
    ProductCatalog::new()
        .with_product(Product::new("bissap-50cl", "Bissap 50cl", "mama-juice", 1500))
        .with_product(Product::new("baobab-1l", "Baobab 1L", "mama-juice", 2500))
        .with_product(Product::new("detox-pack", "Detox pack", "green-bar", 9000).inactive())
}

fn app_with(outcome: FixedOutcome) -> (AppState, Router) {
    let state = AppState::from_parts(
        AppConfig::default(),
        catalog(),
        SimulationConfig::default()
            .with_processing_delay(Duration::from_millis(1000))
            .with_tick_interval(Duration::from_millis(100)),
        Arc::new(outcome),
        Arc::new(TracingNotifier),
    );
    (state.clone(), create_router(state))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn open_checkout(app: &Router, cart_id: &str) -> String {
    send(
        app,
        Method::POST,
        &format!("/api/v1/carts/{}/items", cart_id),
        Some(json!({ "product_id": "bissap-50cl", "quantity": 2 })),
    )
    .await;

    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/checkout",
        Some(json!({ "cart_id": cart_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (_, app) = app_with(FixedOutcome::Approve);
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_products_hide_inactive() {
    let (_, app) = app_with(FixedOutcome::Approve);

    let (status, body) = send(&app, Method::GET, "/api/v1/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(&app, Method::GET, "/api/v1/products/baobab-1l", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 2500);

    let (status, _) = send(&app, Method::GET, "/api/v1/products/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_add_and_clear() {
    let (_, app) = app_with(FixedOutcome::Approve);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/carts/c1/items",
        Some(json!({ "product_id": "baobab-1l" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2500);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/carts/c1/items",
        Some(json!({ "product_id": "detox-pack" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/carts/c1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/api/v1/carts/c1", None).await;
    assert_eq!(body["total"], 0);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_phone_validation_endpoint() {
    let (_, app) = app_with(FixedOutcome::Approve);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/phone/validate",
        Some(json!({ "phone": "677 12 34 56" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["operator"], "mtn");
    assert_eq!(body["normalized"], "677123456");

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/v1/phone/validate",
        Some(json!({ "phone": "999123456" })),
    )
    .await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["operator"], "unknown");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_empty_cart_redirects() {
    let (state, app) = app_with(FixedOutcome::Approve);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/checkout",
        Some(json!({ "cart_id": "empty" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["redirect"], "/cart");
    assert!(state.sessions.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_successful_checkout_flow() {
    let (state, app) = app_with(FixedOutcome::Approve);
    let id = open_checkout(&app, "c1").await;
    let base = format!("/api/v1/checkout/{}", id);

    let (_, body) = send(&app, Method::GET, &base, None).await;
    assert_eq!(body["state"], "awaiting_phone");
    assert_eq!(body["amount"], 3000);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("{}/phone", base),
        Some(json!({ "phone": "655123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["operator"], "orange");

    let (_, body) = send(&app, Method::POST, &format!("{}/continue", base), None).await;
    assert_eq!(body["state"], "confirming");

    let (_, body) = send(&app, Method::POST, &format!("{}/confirm", base), None).await;
    assert_eq!(body["state"], "processing");

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let (_, body) = send(&app, Method::GET, &base, None).await;
    assert_eq!(body["state"], "succeeded");
    assert_eq!(body["progress"], 100);
    assert!(body["reference"].as_str().unwrap().starts_with("OM-"));
    assert!(state.carts.get("c1").is_empty());

    let (_, body) = send(&app, Method::POST, &format!("{}/close", base), None).await;
    assert!(body["redirect"]
        .as_str()
        .unwrap()
        .starts_with("/orders/confirmation?ref=OM-"));

    // Closing finishes the checkout
    let (status, _) = send(&app, Method::GET, &base, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(state.sessions.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_declined_checkout_can_retry() {
    let (state, app) = app_with(FixedOutcome::Decline);
    let id = open_checkout(&app, "c2").await;
    let base = format!("/api/v1/checkout/{}", id);

    send(
        &app,
        Method::PUT,
        &format!("{}/phone", base),
        Some(json!({ "phone": "650000000" })),
    )
    .await;
    send(&app, Method::POST, &format!("{}/continue", base), None).await;
    send(&app, Method::POST, &format!("{}/confirm", base), None).await;

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let (_, body) = send(&app, Method::GET, &base, None).await;
    assert_eq!(body["state"], "failed");
    assert!(body["error"].is_string());
    assert!(!state.carts.get("c2").is_empty());

    let (_, body) = send(&app, Method::POST, &format!("{}/retry", base), None).await;
    assert_eq!(body["state"], "awaiting_phone");
    assert_eq!(body["phone"], "");
}

#[tokio::test(start_paused = true)]
async fn test_back_to_cart_finishes_checkout() {
    let (state, app) = app_with(FixedOutcome::Decline);
    let id = open_checkout(&app, "c5").await;
    let base = format!("/api/v1/checkout/{}", id);

    send(
        &app,
        Method::PUT,
        &format!("{}/phone", base),
        Some(json!({ "phone": "690000000" })),
    )
    .await;
    send(&app, Method::POST, &format!("{}/continue", base), None).await;
    send(&app, Method::POST, &format!("{}/confirm", base), None).await;
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let (status, body) = send(&app, Method::POST, &format!("{}/back-to-cart", base), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirect"], "/cart");

    let (status, _) = send(&app, Method::GET, &base, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(state.sessions.is_empty().await);
    assert!(!state.carts.get("c5").is_empty());
}

#[tokio::test]
async fn test_cart_rejects_oversized_quantities() {
    let (state, app) = app_with(FixedOutcome::Approve);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/carts/c6/items",
        Some(json!({ "product_id": "bissap-50cl", "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/carts/c6/items",
        Some(json!({ "product_id": "bissap-50cl", "quantity": u32::MAX })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/carts/c6/items",
        Some(json!({ "product_id": "bissap-50cl", "quantity": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let cart = state.carts.get("c6");
    assert_eq!(cart.items[0].quantity, 2);
    assert_eq!(cart.total(), 3000);
}

#[tokio::test]
async fn test_invalid_actions() {
    let (_, app) = app_with(FixedOutcome::Approve);
    let id = open_checkout(&app, "c3").await;
    let base = format!("/api/v1/checkout/{}", id);

    let (status, _) = send(&app, Method::POST, &format!("{}/confirm", base), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::POST, &format!("{}/teleport", base), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Invalid phone keeps the wizard on the phone step
    send(
        &app,
        Method::PUT,
        &format!("{}/phone", base),
        Some(json!({ "phone": "65512" })),
    )
    .await;
    let (status, body) = send(&app, Method::POST, &format!("{}/continue", base), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "awaiting_phone");
    assert!(body["error"].is_string());
}

#[tokio::test(start_paused = true)]
async fn test_delete_cancels_processing() {
    let (state, app) = app_with(FixedOutcome::Approve);
    let id = open_checkout(&app, "c4").await;
    let base = format!("/api/v1/checkout/{}", id);

    send(
        &app,
        Method::PUT,
        &format!("{}/phone", base),
        Some(json!({ "phone": "699999999" })),
    )
    .await;
    send(&app, Method::POST, &format!("{}/continue", base), None).await;
    send(&app, Method::POST, &format!("{}/confirm", base), None).await;

    let (status, _) = send(&app, Method::DELETE, &base, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    tokio::time::sleep(Duration::from_secs(5)).await;

    let (status, _) = send(&app, Method::GET, &base, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!state.carts.get("c4").is_empty());
}
