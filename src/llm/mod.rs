use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to language model failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("language model returned an unexpected shape: {0}")]
    BadResponse(String),
}

/// One-shot text generation against a hosted language model. Implementations
/// run each call to completion; there is no streaming, retry or cancellation.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError>;
}

/// Client for an Ollama-style `/api/generate` endpoint. The request body is
/// `{model, prompt, stream: false}` and the reply is expected to carry the
/// full answer in a single `response` field.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl LlmProvider for OllamaClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&serde_json::json!({
                "model": model,
                "prompt": prompt,
                "stream": false
            }))
            .send()
            .await?;

        let result: Value = response.json().await?;
        let text = result["response"].as_str().ok_or_else(|| {
            LlmError::BadResponse("reply has no `response` field".to_string())
        })?;

        Ok(text.to_string())
    }
}

/// Startup probe so a misconfigured endpoint shows up in the logs instead of
/// on the first user interaction.
pub async fn is_server_running(url: &str) -> bool {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(client) => client,
        Err(_) => return false,
    };

    match client.get(url).send().await {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}
