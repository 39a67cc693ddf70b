//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{checkout, health, telegram, webhooks};
use crate::state::AppState;

/// Maximum concurrent checkout-session creations. Each one holds an outbound
/// provider call, so a burst of button presses is bounded here.
const CHECKOUT_MAX_CONCURRENT_REQUESTS: usize = 32;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `GET /success` - Post-payment landing page
///
/// ## Checkout (concurrency limited)
/// - `POST /checkout/session` - Create a hosted checkout session
///
/// ## Webhooks
/// - `POST /webhooks/stripe` - Billing events (signature verification)
/// - `POST /telegram/:token` - Bot updates (token-in-path check)
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let state = Arc::new(state);

    let checkout_routes = Router::new()
        .route("/checkout/session", post(checkout::create_checkout_session))
        .layer(ConcurrencyLimitLayer::new(CHECKOUT_MAX_CONCURRENT_REQUESTS));

    Router::new()
        .route("/health", get(health::health))
        .route("/success", get(checkout::success_page))
        .merge(checkout_routes)
        // Webhooks (no extra limits - traffic is controlled by the platforms)
        .route("/webhooks/stripe", post(webhooks::stripe_webhook))
        .route("/telegram/:token", post(telegram::telegram_webhook))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}
