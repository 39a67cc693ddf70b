//! Conversation surface tests: bot updates, checkout endpoint, landing page.

mod common;

use common::{tg_ok, tg_path, TestHarness, BOT_USERNAME};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

const CHAT: i64 = 55;

async fn mount_checkout_session(harness: &TestHarness, url: &str) {
    Mock::given(method("POST"))
        .and(path("/checkout/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_1",
            "url": url
        })))
        .mount(&harness.stripe)
        .await;
}

#[tokio::test]
async fn start_command_sends_intro_pair() {
    let harness = TestHarness::new().await;
    mount_checkout_session(&harness, "https://pay.example/cs_test_1").await;

    Mock::given(method("POST"))
        .and(path(tg_path("sendMessage")))
        .and(body_partial_json(json!({ "chat_id": CHAT })))
        .respond_with(tg_ok(json!({ "message_id": 1 })))
        .expect(2)
        .mount(&harness.telegram)
        .await;

    let update = json!({
        "update_id": 1,
        "message": { "chat": { "id": CHAT }, "text": "/start" }
    });

    harness.post_update(&update).await.assert_status_ok();
}

#[tokio::test]
async fn samples_callback_sends_photos_and_pitch() {
    let harness = TestHarness::new().await;
    mount_checkout_session(&harness, "https://pay.example/cs_test_1").await;

    Mock::given(method("POST"))
        .and(path(tg_path("answerCallbackQuery")))
        .respond_with(tg_ok(json!(true)))
        .expect(1)
        .mount(&harness.telegram)
        .await;
    // Header and footer.
    Mock::given(method("POST"))
        .and(path(tg_path("sendMessage")))
        .respond_with(tg_ok(json!({ "message_id": 1 })))
        .expect(2)
        .mount(&harness.telegram)
        .await;
    // One per configured sample.
    Mock::given(method("POST"))
        .and(path(tg_path("sendPhoto")))
        .respond_with(tg_ok(json!({ "message_id": 2 })))
        .expect(2)
        .mount(&harness.telegram)
        .await;

    let update = json!({
        "update_id": 2,
        "callback_query": {
            "id": "cb_1",
            "data": "show_samples",
            "message": { "chat": { "id": CHAT } }
        }
    });

    harness.post_update(&update).await.assert_status_ok();
}

#[tokio::test]
async fn unknown_text_gets_fallback_reply() {
    let harness = TestHarness::new().await;

    Mock::given(method("POST"))
        .and(path(tg_path("sendMessage")))
        .respond_with(tg_ok(json!({ "message_id": 1 })))
        .expect(1)
        .mount(&harness.telegram)
        .await;

    let update = json!({
        "update_id": 3,
        "message": { "chat": { "id": CHAT }, "text": "hello?" }
    });

    harness.post_update(&update).await.assert_status_ok();
}

#[tokio::test]
async fn wrong_token_path_is_not_found() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/telegram/999999:WRONG")
        .json(&json!({ "update_id": 4 }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn unparseable_update_is_acked() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post(&format!("/telegram/{}", common::BOT_TOKEN))
        .text("definitely not an update")
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn checkout_endpoint_returns_session_url() {
    let harness = TestHarness::new().await;
    mount_checkout_session(&harness, "https://pay.example/cs_test_1").await;

    let response = harness
        .server
        .post("/checkout/session")
        .json(&json!({ "chat_id": CHAT }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["url"], "https://pay.example/cs_test_1");
}

#[tokio::test]
async fn checkout_endpoint_degrades_to_deep_link() {
    let harness = TestHarness::new().await;

    Mock::given(method("POST"))
        .and(path("/checkout/sessions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "type": "api_error", "message": "upstream down" }
        })))
        .mount(&harness.stripe)
        .await;

    let response = harness
        .server
        .post("/checkout/session")
        .json(&json!({ "chat_id": CHAT }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["url"], format!("https://t.me/{BOT_USERNAME}"));
}

#[tokio::test]
async fn success_page_links_back_to_bot() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/success").await;
    response.assert_status_ok();
    assert!(response.text().contains(&format!("https://t.me/{BOT_USERNAME}")));
}
