use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

/// What the fake upstream answers to every request.
#[derive(Debug, Clone)]
pub enum FakeReply {
    Json(StatusCode, Value),
    Text(StatusCode, String),
    Slow(Duration, Value),
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone)]
struct FakeState {
    reply: FakeReply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// An axum server on an ephemeral port impersonating a generation backend.
pub struct FakeLlm {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl FakeLlm {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("at least one recorded request")
    }
}

impl Drop for FakeLlm {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle(
    State(state): State<FakeState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state
        .requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            path: uri.path().to_string(),
            headers,
            body,
        });

    match state.reply {
        FakeReply::Json(status, value) => (status, axum::Json(value)).into_response(),
        FakeReply::Text(status, text) => (status, text).into_response(),
        FakeReply::Slow(delay, value) => {
            tokio::time::sleep(delay).await;
            axum::Json(value).into_response()
        }
    }
}

pub async fn spawn_fake_llm(reply: FakeReply) -> FakeLlm {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = FakeState {
        reply,
        requests: requests.clone(),
    };
    let app = Router::new().fallback(handle).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake llm");
    let addr = listener.local_addr().expect("fake llm addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake llm server");
    });

    FakeLlm {
        base_url: format!("http://{addr}"),
        requests,
        handle,
    }
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{addr}")
}

pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

pub fn anthropic_reply(completion: &str) -> Value {
    json!({
        "completion": completion,
        "stop_reason": "stop_sequence",
        "model": "claude-haiku-4.5"
    })
}

pub const ONE_SESSION_JSON: &str = r#"[{"subject":"Algorithms","topic":"Review","startTime":"09:00","endTime":"10:00","reason":"weak area"}]"#;
