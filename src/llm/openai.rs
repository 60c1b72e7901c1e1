//! OpenAI chat-completions backend.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::llm::{CompletionBackend, CompletionError};

const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

pub struct OpenAiClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.openai.api_key.trim().to_string();
        if api_key.is_empty() {
            anyhow::bail!(
                "OpenAI API key is missing. Set openai.api_key in config or OPENAI_API_KEY."
            );
        }

        let endpoint = if settings.openai.endpoint.trim().is_empty() {
            DEFAULT_OPENAI_ENDPOINT.to_string()
        } else {
            settings
                .openai
                .endpoint
                .trim()
                .trim_end_matches('/')
                .to_string()
        };

        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(
                    settings.openai.request_timeout_secs,
                ))
                .build()
                .context("Failed to build OpenAI HTTP client")?,
            api_key,
            model: settings.openai.model.trim().to_string(),
            endpoint,
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(&self, prompt: &str) -> std::result::Result<String, CompletionError> {
        // Sampling is pinned for reproducible batch output.
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.0,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(CompletionError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .map(|body| extract_error_message(&body))
                .unwrap_or_default();
            return Err(CompletionError::from_response(status, &detail));
        }

        let payload: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Fatal(format!("malformed completion response: {e}")))?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::Fatal("completion response had no choices".to_string()))
    }
}

/// Pull the human-readable message out of an OpenAI error body, falling back
/// to the raw body when it is not the expected JSON shape.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
