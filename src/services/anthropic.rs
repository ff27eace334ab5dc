use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::services::llm_provider::{
    ensure_success, extract_json_array, join_url, LlmBackend, LlmError,
};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS_TO_SAMPLE: u32 = 800;
const TEMPERATURE: f32 = 0.2;

/// Free-text completion backend on Anthropic's `/v1/complete` endpoint. The
/// session array has to be located inside the completion text.
#[derive(Debug, Clone)]
pub struct AnthropicBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: String,
    max_tokens_to_sample: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    completion: Option<String>,
    result: Option<CompletionResult>,
}

#[derive(Debug, Deserialize)]
struct CompletionResult {
    content: Option<String>,
}

impl CompletionResponse {
    fn into_text(self) -> String {
        self.completion
            .filter(|c| !c.trim().is_empty())
            .or_else(|| self.result.and_then(|r| r.content))
            .unwrap_or_default()
    }
}

impl AnthropicBackend {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    fn request_body<'a>(&'a self, prompt: &str) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            prompt: format!("\n\nHuman: {prompt}\n\nAssistant:"),
            max_tokens_to_sample: MAX_TOKENS_TO_SAMPLE,
            temperature: TEMPERATURE,
        }
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate_schedule_json(&self, prompt: &str) -> Result<String, LlmError> {
        let resp = self
            .client
            .post(join_url(&self.base_url, "v1/complete"))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request_body(prompt))
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let body: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let text = body.into_text();
        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        extract_json_array(&text)
            .map(str::to_string)
            .ok_or_else(|| LlmError::InvalidResponse("no JSON array in completion".to_string()))
    }
}
