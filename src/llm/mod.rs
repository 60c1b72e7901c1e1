//! LLM module for callsight
//!
//! Prompt templates, the resilient chat-completion client, and the
//! defensive response parser that feeds the report layer.

mod budget;
mod client;
mod error;
mod openai;
mod parser;
mod prompts;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::Settings;

pub use client::{CompletionClient, RetryPolicy};
pub use error::CompletionError;
pub use openai::OpenAiClient;
pub use parser::parse_structured;
pub(crate) use parser::strip_code_fence;
pub use prompts::{build_quote_prompt, build_topic_ranking_prompt, TaskKind};

/// Transport-level completion backend.
///
/// The retry state machine in [`CompletionClient`] is generic over this trait
/// so it can be exercised in tests without a network.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> std::result::Result<String, CompletionError>;
}

/// Build the completion client from runtime settings.
pub fn build_client(settings: &Settings) -> Result<CompletionClient<OpenAiClient>> {
    let backend = OpenAiClient::from_settings(settings)?;
    Ok(CompletionClient::new(
        backend,
        RetryPolicy::from_settings(settings),
        settings.report.summary_words,
    ))
}
