use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}

/// Minimal probe kept at `/api/health` for existing clients.
pub async fn api_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let advisor = state.advisor();
    Json(serde_json::json!({
        "status": "ok",
        "uptimeSecs": state.uptime_secs(),
        "advisor": {
            "provider": advisor.provider_name(),
            "model": advisor.model(),
            "configured": advisor.is_configured(),
            "failureFallback": advisor.failure_fallback().as_str(),
        }
    }))
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

pub async fn readiness() -> StatusCode {
    StatusCode::OK
}
