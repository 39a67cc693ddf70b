//! Billing webhook boundary.
//!
//! Verification and parsing happen here; the state machine lives in
//! [`crate::reconciler`]. Signature verification runs against the raw body
//! before anything is deserialized, and a verified, parseable event is
//! always answered with success so the provider does not retry work that was
//! logically handled.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::reconciler::{self, BillingEvent};
use crate::state::AppState;

/// Billing webhook envelope (simplified).
#[derive(Debug, Deserialize)]
pub struct StripeWebhook {
    /// Event type.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event ID.
    pub id: String,
    /// Event data.
    pub data: StripeEventData,
}

/// Billing event data container.
#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    /// Event object.
    pub object: serde_json::Value,
}

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Whether the webhook was processed.
    pub received: bool,
}

/// Handle billing webhooks.
pub async fn stripe_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookResponse>, ApiError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("Missing Stripe signature".into()))?;

    state
        .stripe
        .verify_webhook_signature(&body, signature)
        .map_err(|e| {
            tracing::warn!(error = %e, "Invalid webhook signature");
            ApiError::BadRequest("Invalid webhook signature".into())
        })?;

    let webhook: StripeWebhook =
        serde_json::from_str(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::info!(
        event_type = %webhook.event_type,
        event_id = %webhook.id,
        "Received billing webhook"
    );

    match BillingEvent::from_webhook(&webhook.event_type, &webhook.data.object) {
        Some(event) => reconciler::apply(&state, event).await?,
        None => {
            tracing::debug!(event_type = %webhook.event_type, "Unhandled billing event");
        }
    }

    Ok(Json(WebhookResponse { received: true }))
}
