//! # Webhook Notifier
//!
//! Forwards checkout toasts to the storefront's notification service.
//! Each request carries an `X-Momo-Signature: t=<unix ts>,v1=<hex>` header,
//! an HMAC-SHA256 of `"<ts>.<body>"` keyed with the shared secret.

use async_trait::async_trait;
use chrono::Utc;
use momo_core::{CheckoutError, CheckoutResult, Notifier, Toast};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, instrument};

/// Signature header name
pub const SIGNATURE_HEADER: &str = "X-Momo-Signature";

/// Posts toasts to a webhook URL
pub struct WebhookNotifier {
    client: Client,
    url: String,
    secret: String,
}

#[derive(Debug, Serialize)]
struct NotificationPayload<'a> {
    #[serde(flatten)]
    toast: &'a Toast,
    timestamp: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, secret: impl Into<String>) -> CheckoutResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| CheckoutError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            secret: secret.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    #[instrument(skip(self, toast), fields(title = %toast.title))]
    async fn notify(&self, toast: &Toast) -> CheckoutResult<()> {
        let now = Utc::now();
        let body = serde_json::to_string(&NotificationPayload {
            toast,
            timestamp: now.to_rfc3339(),
        })
        .map_err(|e| CheckoutError::Internal(format!("Failed to encode toast: {}", e)))?;

        let signature = signature_header(&self.secret, now.timestamp(), &body);

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header(SIGNATURE_HEADER, signature)
            .body(body)
            .send()
            .await
            .map_err(|e| CheckoutError::Notification(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Notification webhook error: status={}, body={}", status, text);
            return Err(CheckoutError::Notification(format!("HTTP {}: {}", status, text)));
        }

        debug!("Notification forwarded to {}", self.url);
        Ok(())
    }
}

/// Build the signature header value for a payload
pub fn signature_header(secret: &str, timestamp: i64, body: &str) -> String {
    let signed_payload = format!("{}.{}", timestamp, body);
    format!(
        "t={},v1={}",
        timestamp,
        compute_hmac_sha256(secret, &signed_payload)
    )
}

fn compute_hmac_sha256(secret: &str, message: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    // HMAC accepts keys of any length, so this cannot fail.
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_signature_header_format() {
        let header = signature_header("secret", 1_700_000_000, "{}");
        let (t, v1) = header.split_once(',').unwrap();

        assert_eq!(t, "t=1700000000");
        assert!(v1.starts_with("v1="));
        assert_eq!(v1.len(), "v1=".len() + 64);
    }

    #[test]
    fn test_signature_depends_on_secret_and_body() {
        let a = signature_header("secret", 1, "{}");
        assert_eq!(a, signature_header("secret", 1, "{}"));
        assert_ne!(a, signature_header("other", 1, "{}"));
        assert_ne!(a, signature_header("secret", 1, "{\"a\":1}"));
    }

    #[tokio::test]
    async fn test_notify_posts_signed_toast() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notify"))
            .and(header_exists("x-momo-signature"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(format!("{}/notify", server.uri()), "whsec").unwrap();
        notifier
            .notify(&Toast::success("Payment successful", "Reference OM-1"))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["title"], "Payment successful");
        assert_eq!(body["variant"], "success");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_notify_reports_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(server.uri(), "whsec").unwrap();
        let err = notifier
            .notify(&Toast::destructive("Payment failed", "Declined"))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Notification(_)));
    }
}
