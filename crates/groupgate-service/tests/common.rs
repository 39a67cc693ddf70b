//! Common test utilities for groupgate integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::{TestResponse, TestServer};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use groupgate_service::{create_router, AppState, ServiceConfig};
use groupgate_store::RocksStore;

/// Webhook signing secret used by every harness.
pub const WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Bot token used by every harness.
pub const BOT_TOKEN: &str = "123456:TEST_TOKEN";

/// The gated group chat.
pub const GROUP_CHAT_ID: i64 = -1_001_234_567_890;

/// Bot username for deep links.
pub const BOT_USERNAME: &str = "groupgate_bot";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Handle on the same store the service writes to.
    pub store: Arc<RocksStore>,
    /// Stand-in for the chat-platform API.
    pub telegram: MockServer,
    /// Stand-in for the payment-provider API.
    pub stripe: MockServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database and mock APIs.
    pub async fn new() -> Self {
        let telegram = MockServer::start().await;
        let stripe = MockServer::start().await;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            telegram_token: BOT_TOKEN.into(),
            telegram_api_base: telegram.uri(),
            group_chat_id: GROUP_CHAT_ID,
            bot_username: BOT_USERNAME.into(),
            admin_chat_id: None,
            stripe_secret_key: "sk_test_xxx".into(),
            stripe_webhook_secret: WEBHOOK_SECRET.into(),
            stripe_api_base: stripe.uri(),
            price_id: "price_test".into(),
            public_base_url: "http://localhost:8080".into(),
            sample_photo_ids: vec!["photo-file-1".into(), "photo-file-2".into()],
            sweep_interval_secs: 24 * 60 * 60,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(Arc::clone(&store), config);
        let router: Router = create_router(state);
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            telegram,
            stripe,
            _temp_dir: temp_dir,
        }
    }

    /// POST a signed billing event to the webhook endpoint.
    pub async fn post_stripe_event(&self, payload: &serde_json::Value) -> TestResponse {
        let body = payload.to_string();
        let signature = stripe_signature(&body);

        self.server
            .post("/webhooks/stripe")
            .add_header("stripe-signature", signature)
            .text(body)
            .await
    }

    /// POST a bot update to the token-namespaced webhook path.
    pub async fn post_update(&self, update: &serde_json::Value) -> TestResponse {
        self.server
            .post(&format!("/telegram/{BOT_TOKEN}"))
            .json(update)
            .await
    }
}

/// Compute a valid `Stripe-Signature` header for a payload.
pub fn stripe_signature(payload: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp();

    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(WEBHOOK_SECRET.as_bytes())
        .expect("HMAC-SHA256 accepts any key size");
    mac.update(format!("{timestamp}.{payload}").as_bytes());

    format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
}

/// Bot API path for a method, as the client will request it.
pub fn tg_path(tg_method: &str) -> String {
    format!("/bot{BOT_TOKEN}/{tg_method}")
}

/// A Bot API success envelope around `result`.
pub fn tg_ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "ok": true,
        "result": result
    }))
}

/// Mount a permissive sendMessage mock for tests that only care about other
/// interactions.
pub async fn sink_send_message(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(tg_path("sendMessage")))
        .respond_with(tg_ok(serde_json::json!({ "message_id": 1 })))
        .mount(server)
        .await;
}
