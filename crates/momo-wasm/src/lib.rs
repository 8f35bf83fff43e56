//! # momo-wasm
//!
//! WebAssembly bindings for momo-checkout-rs.
//!
//! Lets the storefront check phone numbers and format amounts in the
//! browser, with the same rules the server applies:
//! - Operator detection while the customer types
//! - Phone validation before Continue
//! - Cart totals and FCFA formatting
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { detect_operator, validate_phone, format_amount } from 'momo-wasm';
//!
//! await init();
//!
//! detect_operator('655');            // "orange"
//! validate_phone('677 12 34 56');    // { valid: true, operator: "mtn", ... }
//! format_amount(12500);              // "12 500 FCFA"
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Cart line for the WASM interface
#[derive(Debug, Serialize, Deserialize)]
#[wasm_bindgen]
pub struct WasmCartItem {
    product_id: String,
    name: String,
    /// Unit price in francs CFA
    price: i64,
    quantity: u32,
}

#[wasm_bindgen]
impl WasmCartItem {
    #[wasm_bindgen(constructor)]
    pub fn new(product_id: String, name: String, price: i64, quantity: u32) -> Self {
        Self {
            product_id,
            name,
            price,
            quantity,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn product_id(&self) -> String {
        self.product_id.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn price(&self) -> i64 {
        self.price
    }

    #[wasm_bindgen(getter)]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Line total; saturates instead of wrapping
    #[wasm_bindgen]
    pub fn total(&self) -> i64 {
        self.price.saturating_mul(i64::from(self.quantity))
    }

    #[wasm_bindgen]
    pub fn format_total(&self) -> String {
        momo_core::format_francs(self.total())
    }
}

/// Operator for a partial or complete entry: "orange", "mtn" or "unknown"
#[wasm_bindgen]
pub fn detect_operator(phone: &str) -> String {
    momo_core::detect_operator(phone).as_str().to_string()
}

/// Service label shown next to the input, e.g. "Orange Money"
#[wasm_bindgen]
pub fn operator_service_name(phone: &str) -> String {
    momo_core::detect_operator(phone).service_name().to_string()
}

/// Strip everything but digits
#[wasm_bindgen]
pub fn normalize_phone(phone: &str) -> String {
    momo_core::normalize_digits(phone)
}

/// Whether Continue would accept this entry
#[wasm_bindgen]
pub fn is_valid_phone(phone: &str) -> bool {
    momo_core::validate_phone(phone).valid
}

/// Full validation result as a JS object
/// (`{ valid, operator, normalized, error? }`)
#[wasm_bindgen]
pub fn validate_phone(phone: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&momo_core::validate_phone(phone))
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Format an amount in francs CFA, e.g. "12 500 FCFA"
#[wasm_bindgen]
pub fn format_amount(amount: i64) -> String {
    momo_core::format_francs(amount)
}

/// Calculate total for a list of cart items
#[wasm_bindgen]
pub fn calculate_cart_total(items: JsValue) -> Result<i64, JsValue> {
    let items: Vec<WasmCartItem> = serde_wasm_bindgen::from_value(items)
        .map_err(|e| JsValue::from_str(&format!("Invalid cart items: {}", e)))?;

    Ok(cart_total(&items))
}

fn cart_total(items: &[WasmCartItem]) -> i64 {
    items
        .iter()
        .fold(0i64, |sum, item| sum.saturating_add(item.total()))
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
