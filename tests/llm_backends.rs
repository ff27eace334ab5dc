mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use common::fake_llm::{
    anthropic_reply, gemini_reply, spawn_fake_llm, unreachable_base_url, FakeReply,
    ONE_SESSION_JSON,
};
use study_advisor::services::anthropic::{AnthropicBackend, ANTHROPIC_VERSION};
use study_advisor::services::gemini::GeminiBackend;
use study_advisor::services::llm_provider::{http_client, LlmBackend, LlmError};

fn gemini(base_url: &str, timeout_secs: u64) -> GeminiBackend {
    GeminiBackend::new(
        http_client(timeout_secs),
        base_url,
        "g-secret",
        "gemini-2.0-flash",
    )
}

fn anthropic(base_url: &str) -> AnthropicBackend {
    AnthropicBackend::new(http_client(5), base_url, "a-secret", "claude-haiku-4.5")
}

#[tokio::test]
async fn gemini_sends_structured_output_request() {
    let fake = spawn_fake_llm(FakeReply::Json(
        StatusCode::OK,
        gemini_reply(ONE_SESSION_JSON),
    ))
    .await;

    let text = gemini(&fake.base_url, 5)
        .generate_schedule_json("the prompt")
        .await
        .expect("gemini reply");
    assert_eq!(text, ONE_SESSION_JSON);

    let req = fake.last_request();
    assert_eq!(
        req.path,
        "/v1beta/models/gemini-2.0-flash:generateContent"
    );
    assert_eq!(req.headers["x-goog-api-key"], "g-secret");
    assert_eq!(req.body["contents"][0]["parts"][0]["text"], "the prompt");
    assert_eq!(
        req.body["generationConfig"]["responseSchema"]["items"]["required"],
        json!(["subject", "topic", "startTime", "endTime", "reason"])
    );
}

#[tokio::test]
async fn gemini_joins_multiple_parts_and_trims() {
    let fake = spawn_fake_llm(FakeReply::Json(
        StatusCode::OK,
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": "  [{\"a\":" }, { "text": "1}]\n" }] }
            }]
        }),
    ))
    .await;

    let text = gemini(&fake.base_url, 5)
        .generate_schedule_json("p")
        .await
        .expect("gemini reply");
    assert_eq!(text, "[{\"a\":1}]");
}

#[tokio::test]
async fn gemini_without_candidates_is_empty_response() {
    let fake = spawn_fake_llm(FakeReply::Json(StatusCode::OK, json!({ "candidates": [] }))).await;

    let err = gemini(&fake.base_url, 5)
        .generate_schedule_json("p")
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse), "got {err:?}");
}

#[tokio::test]
async fn non_success_status_is_api_error() {
    let fake = spawn_fake_llm(FakeReply::Text(
        StatusCode::TOO_MANY_REQUESTS,
        "quota exceeded".to_string(),
    ))
    .await;

    let err = gemini(&fake.base_url, 5)
        .generate_schedule_json("p")
        .await
        .unwrap_err();
    match err {
        LlmError::ApiError { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_success_body_is_invalid_response() {
    let fake = spawn_fake_llm(FakeReply::Text(StatusCode::OK, "<html>".to_string())).await;

    let err = anthropic(&fake.base_url)
        .generate_schedule_json("p")
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::InvalidResponse(_)), "got {err:?}");
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let fake = spawn_fake_llm(FakeReply::Slow(
        Duration::from_secs(3),
        gemini_reply(ONE_SESSION_JSON),
    ))
    .await;

    let err = gemini(&fake.base_url, 1)
        .generate_schedule_json("p")
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn unreachable_upstream_is_network_error() {
    let base = unreachable_base_url().await;

    let err = anthropic(&base)
        .generate_schedule_json("p")
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn anthropic_sends_completion_request() {
    let fake = spawn_fake_llm(FakeReply::Json(
        StatusCode::OK,
        anthropic_reply(&format!("\n {ONE_SESSION_JSON} \n")),
    ))
    .await;

    let text = anthropic(&fake.base_url)
        .generate_schedule_json("the prompt")
        .await
        .expect("anthropic reply");
    assert_eq!(text, ONE_SESSION_JSON);

    let req = fake.last_request();
    assert_eq!(req.path, "/v1/complete");
    assert_eq!(req.headers["x-api-key"], "a-secret");
    assert_eq!(req.headers["anthropic-version"], ANTHROPIC_VERSION);
    assert_eq!(req.body["model"], "claude-haiku-4.5");
    assert_eq!(req.body["prompt"], "\n\nHuman: the prompt\n\nAssistant:");
    assert_eq!(req.body["max_tokens_to_sample"], 800);
}

#[tokio::test]
async fn anthropic_blank_completion_is_empty_response() {
    let fake = spawn_fake_llm(FakeReply::Json(StatusCode::OK, anthropic_reply("   "))).await;

    let err = anthropic(&fake.base_url)
        .generate_schedule_json("p")
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse), "got {err:?}");
}

#[tokio::test]
async fn anthropic_completion_without_array_is_invalid() {
    let fake = spawn_fake_llm(FakeReply::Json(
        StatusCode::OK,
        anthropic_reply("I cannot help with that."),
    ))
    .await;

    let err = anthropic(&fake.base_url)
        .generate_schedule_json("p")
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::InvalidResponse(_)), "got {err:?}");
}
