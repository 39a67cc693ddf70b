//! Stripe API types (the subset this service touches).

use serde::Deserialize;

/// A Checkout session, as returned by the sessions endpoint.
#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    /// Session identifier (`cs_...`).
    pub id: String,
    /// Hosted payment page URL. Absent once the session is consumed.
    pub url: Option<String>,
}

/// Authoritative subscription state from the provider.
#[derive(Debug, Deserialize)]
pub struct SubscriptionInfo {
    /// Subscription identifier (`sub_...`).
    pub id: String,
    /// Provider status string (`active`, `past_due`, ...).
    pub status: String,
    /// End of the currently paid period, epoch seconds.
    pub current_period_end: i64,
}

/// Error envelope returned by the provider API.
#[derive(Debug, Deserialize)]
pub struct StripeErrorResponse {
    /// Error detail.
    pub error: StripeErrorDetail,
}

/// Provider error detail.
#[derive(Debug, Deserialize)]
pub struct StripeErrorDetail {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    pub message: String,
    /// Error code.
    pub code: Option<String>,
}
