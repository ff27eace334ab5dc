use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{AiConfig, AiProvider};
use crate::services::anthropic::AnthropicBackend;
use crate::services::gemini::GeminiBackend;

/// Longest slice of an upstream error body kept in `LlmError::ApiError`.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// A generation backend able to turn a schedule prompt into the JSON text of a
/// session array.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    async fn generate_schedule_json(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("llm request timed out")]
    Timeout,
    #[error("llm network error: {0}")]
    Network(String),
    #[error("llm api error: status={status}, message={message}")]
    ApiError { status: u16, message: String },
    #[error("llm returned an empty response")]
    EmptyResponse,
    #[error("llm response could not be decoded: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            LlmError::Timeout
        } else if value.is_decode() {
            LlmError::InvalidResponse(value.to_string())
        } else {
            LlmError::Network(value.to_string())
        }
    }
}

pub fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Resolve the configured backend once at startup. `None` means the advisor
/// serves the mock plan.
pub fn build_backend(config: &AiConfig) -> Option<Arc<dyn LlmBackend>> {
    let model = config.effective_model();
    match config.effective_provider() {
        AiProvider::Gemini => {
            tracing::info!(model = %model, "AI provider: Gemini (configured)");
            Some(Arc::new(GeminiBackend::new(
                http_client(config.timeout_secs),
                &config.gemini_api_url,
                &config.gemini_api_key,
                &model,
            )))
        }
        AiProvider::Anthropic => {
            tracing::info!(model = %model, "AI provider: Anthropic (configured)");
            Some(Arc::new(AnthropicBackend::new(
                http_client(config.timeout_secs),
                &config.anthropic_api_url,
                &config.anthropic_api_key,
                &model,
            )))
        }
        AiProvider::None => {
            tracing::warn!(
                requested = config.provider.as_str(),
                "No AI provider configured. AI features will use mock data."
            );
            None
        }
    }
}

/// Turn a non-2xx response into `LlmError::ApiError`, keeping a bounded slice
/// of the body for the logs.
pub(crate) async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(LlmError::ApiError {
        status: status.as_u16(),
        message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    })
}

/// Locate the outermost JSON array in free text, tolerating prose or code
/// fences around it.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let start = trimmed.find('[')?;
    let end = trimmed.rfind(']')?;
    if end <= start {
        return None;
    }
    Some(&trimmed[start..=end])
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
