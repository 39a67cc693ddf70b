//! Stripe API client implementation.

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;
use std::time::Duration;

use groupgate_core::MemberId;

use super::types::{CheckoutSession, StripeErrorResponse, SubscriptionInfo};

type HmacSha256 = Hmac<Sha256>;

/// Outbound call timeout. Calls past this are treated as failed.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Error type for Stripe operations.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe API returned an error.
    #[error("Stripe API error: {error_type} - {message}")]
    Api {
        /// Error type.
        error_type: String,
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
    },

    /// Invalid webhook signature.
    #[error("Invalid webhook signature")]
    InvalidSignature,
}

/// Stripe API client.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    api_base: String,
    secret_key: String,
    webhook_secret: String,
}

impl StripeClient {
    /// Create a new Stripe client.
    ///
    /// # Arguments
    ///
    /// * `secret_key` - secret API key (`sk_test_...` or `sk_live_...`)
    /// * `webhook_secret` - webhook signing secret (`whsec_...`)
    /// * `api_base` - API base URL (production default or a test double)
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    pub fn new(
        secret_key: impl Into<String>,
        webhook_secret: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
            webhook_secret: webhook_secret.into(),
        }
    }

    /// Create a recurring-subscription Checkout session for a member.
    ///
    /// The member identity rides along twice, as `client_reference_id` and
    /// in metadata, so the completed-checkout webhook can be tied back to a
    /// chat member even if one of the fields is dropped upstream.
    pub async fn create_checkout_session(
        &self,
        member_id: MemberId,
        price_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, StripeError> {
        let params = [
            ("mode", "subscription".to_string()),
            ("success_url", success_url.to_string()),
            ("cancel_url", cancel_url.to_string()),
            ("client_reference_id", member_id.to_string()),
            ("customer_creation", "always".to_string()),
            ("line_items[0][price]", price_id.to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            ("metadata[telegram_user_id]", member_id.to_string()),
        ];

        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.api_base))
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Retrieve the authoritative status of a subscription.
    pub async fn retrieve_subscription(
        &self,
        subscription_ref: &str,
    ) -> Result<SubscriptionInfo, StripeError> {
        let response = self
            .client
            .get(format!("{}/subscriptions/{}", self.api_base, subscription_ref))
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Verify a webhook signature against the raw request body.
    ///
    /// The signature header carries a timestamp and one or more `v1`
    /// candidates: `t=timestamp,v1=signature,...`. The expected value is
    /// HMAC-SHA256 over `"{timestamp}.{payload}"`; any matching candidate
    /// accepts, compared in constant time.
    pub fn verify_webhook_signature(
        &self,
        payload: &str,
        signature: &str,
    ) -> Result<(), StripeError> {
        let mut timestamp: Option<&str> = None;
        let mut signatures: Vec<&str> = Vec::new();

        for part in signature.split(',') {
            let mut kv = part.splitn(2, '=');
            match (kv.next(), kv.next()) {
                (Some("t"), Some(ts)) => timestamp = Some(ts),
                (Some("v1"), Some(sig)) => signatures.push(sig),
                _ => {}
            }
        }

        let Some(timestamp) = timestamp else {
            return Err(StripeError::InvalidSignature);
        };
        if signatures.is_empty() {
            return Err(StripeError::InvalidSignature);
        }

        let signed_payload = format!("{timestamp}.{payload}");
        let expected = hmac_sha256_hex(&self.webhook_secret, &signed_payload);

        if signatures.iter().any(|sig| constant_time_eq(&expected, sig)) {
            Ok(())
        } else {
            Err(StripeError::InvalidSignature)
        }
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let error_body: Result<StripeErrorResponse, _> = response.json().await;

        match error_body {
            Ok(stripe_error) => Err(StripeError::Api {
                error_type: stripe_error.error.error_type,
                message: stripe_error.error.message,
                code: stripe_error.error.code,
            }),
            Err(_) => Err(StripeError::Api {
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
            }),
        }
    }
}

/// Compute HMAC-SHA256 and return the hex-encoded result.
fn hmac_sha256_hex(secret: &str, message: &str) -> String {
    // INVARIANT: HMAC-SHA256 accepts keys of any size per RFC 2104, so
    // `new_from_slice` only fails if the Hmac implementation is broken.
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC-SHA256 accepts any key size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> StripeClient {
        StripeClient::new("sk_test_xxx", "whsec_test123", "https://api.stripe.com/v1")
    }

    fn sign(payload: &str, secret: &str, timestamp: &str) -> String {
        hmac_sha256_hex(secret, &format!("{timestamp}.{payload}"))
    }

    #[test]
    fn hmac_sha256_produces_correct_length() {
        let result = hmac_sha256_hex("key", "The quick brown fox jumps over the lazy dog");
        assert_eq!(result.len(), 64); // SHA256 = 32 bytes = 64 hex chars
    }

    #[test]
    fn constant_time_eq_works() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "ab"));
        assert!(!constant_time_eq("ab", "abc"));
    }

    #[test]
    fn valid_signature_accepted() {
        let client = test_client();
        let payload = r#"{"type":"checkout.session.completed"}"#;
        let sig = sign(payload, "whsec_test123", "1700000000");
        let header = format!("t=1700000000,v1={sig}");

        assert!(client.verify_webhook_signature(payload, &header).is_ok());
    }

    #[test]
    fn any_matching_v1_candidate_accepts() {
        let client = test_client();
        let payload = "{}";
        let sig = sign(payload, "whsec_test123", "1700000000");
        let header = format!("t=1700000000,v1=deadbeef,v1={sig}");

        assert!(client.verify_webhook_signature(payload, &header).is_ok());
    }

    #[test]
    fn tampered_payload_rejected() {
        let client = test_client();
        let sig = sign("{}", "whsec_test123", "1700000000");
        let header = format!("t=1700000000,v1={sig}");

        assert!(matches!(
            client.verify_webhook_signature(r#"{"amount":1}"#, &header),
            Err(StripeError::InvalidSignature)
        ));
    }

    #[test]
    fn missing_timestamp_rejected() {
        let client = test_client();
        assert!(matches!(
            client.verify_webhook_signature("{}", "v1=deadbeef"),
            Err(StripeError::InvalidSignature)
        ));
    }

    #[test]
    fn missing_candidates_rejected() {
        let client = test_client();
        assert!(matches!(
            client.verify_webhook_signature("{}", "t=1700000000"),
            Err(StripeError::InvalidSignature)
        ));
    }
}
