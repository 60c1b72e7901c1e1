//! OpenAI Whisper API client for speech-to-text transcription.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;

use crate::config::Settings;
use crate::CallsightError;

const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

/// Remote speech-to-text adapter. Opaque collaborator from the pipeline's
/// point of view: audio path in, plain text out.
pub struct WhisperTranscriber {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl WhisperTranscriber {
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
                .context("Failed to build Whisper HTTP client")?,
            api_key,
            model: settings.openai.transcription_model.trim().to_string(),
            endpoint,
        })
    }

    /// Transcribe one audio file to plain text.
    pub async fn transcribe(&self, audio_path: &Path) -> crate::Result<String> {
        tracing::debug!("Transcribing {} with {}", audio_path.display(), self.model);

        let bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("model", self.model.clone());

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.endpoint))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CallsightError::Transcription(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CallsightError::Transcription(format!(
                "API returned {status}: {body}"
            )));
        }

        let payload: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| CallsightError::Transcription(format!("malformed response: {e}")))?;

        Ok(payload.text.trim().to_string())
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}
