//! Checkout-session creation and the post-payment landing page.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};

use groupgate_core::MemberId;

use crate::state::AppState;

/// Request body for checkout-session creation.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// The chat the request originated from.
    pub chat_id: i64,
}

/// Response carrying the hosted payment page URL.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Where to send the member. Falls back to the bot deep link on failure.
    pub url: String,
}

/// Create a checkout session for a member.
pub async fn create_checkout_session(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckoutRequest>,
) -> Json<CheckoutResponse> {
    let url = checkout_url_for(&state, MemberId::new(request.chat_id)).await;
    Json(CheckoutResponse { url })
}

/// Resolve the hosted checkout URL for a member, degrading to the bot deep
/// link when session creation fails so the conversation never dead-ends.
pub(crate) async fn checkout_url_for(state: &AppState, member_id: MemberId) -> String {
    let success_url = format!("https://t.me/{}?start=paid", state.config.bot_username);
    let cancel_url = format!("https://t.me/{}?start=cancel", state.config.bot_username);

    match state
        .stripe
        .create_checkout_session(member_id, &state.config.price_id, &success_url, &cancel_url)
        .await
    {
        Ok(session) => match session.url {
            Some(url) => url,
            None => {
                tracing::warn!(
                    member_id = %member_id,
                    session_id = %session.id,
                    "checkout session has no URL"
                );
                state.config.bot_deep_link()
            }
        },
        Err(e) => {
            tracing::warn!(member_id = %member_id, error = %e, "checkout session creation failed");
            state.config.bot_deep_link()
        }
    }
}

/// Static page the payment provider redirects to after a successful checkout.
pub async fn success_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(format!(
        r#"<html>
  <head>
    <meta charset="UTF-8">
    <title>Payment confirmed</title>
    <style>
      body {{ font-family: Arial, sans-serif; text-align: center; margin-top: 50px; background-color: #f7f7f7; }}
      .container {{ background: white; padding: 30px; border-radius: 10px; display: inline-block; box-shadow: 0 4px 10px rgba(0,0,0,0.1); }}
      h1 {{ color: #2ecc71; }}
      a.button {{ background-color: #2ecc71; color: white; padding: 15px 25px; text-decoration: none; border-radius: 5px; font-size: 18px; display: inline-block; margin-top: 20px; }}
      a.button:hover {{ background-color: #27ae60; }}
    </style>
  </head>
  <body>
    <div class="container">
      <h1>✅ Payment confirmed!</h1>
      <p>Your invite is waiting in the bot chat.</p>
      <a href="{}" class="button">Open the bot</a>
    </div>
  </body>
</html>"#,
        state.config.bot_deep_link()
    ))
}
