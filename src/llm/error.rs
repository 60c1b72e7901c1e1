//! Completion error taxonomy.
//!
//! Each kind maps to a recovery strategy in the retry loop: back off and
//! retry, truncate and re-attempt, or give up immediately.

use reqwest::StatusCode;
use thiserror::Error;

/// Signal in the endpoint's error body that the prompt overflowed the
/// context window.
const CONTEXT_LENGTH_SIGNAL: &str = "maximum context length";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// Server-side or transport hiccup; retry with backoff.
    #[error("transient API error: {0}")]
    Transient(String),

    /// Upstream quota exceeded; retry with backoff.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Prompt overflowed the context window; truncate and re-attempt.
    #[error("context length exceeded: {0}")]
    ContextTooLarge(String),

    /// Anything else; propagate without retrying.
    #[error("completion request failed: {0}")]
    Fatal(String),
}

impl CompletionError {
    /// Whether the backoff-and-retry branch applies.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::RateLimited(_))
    }

    /// Classify a non-success HTTP response from the completion endpoint.
    pub fn from_response(status: StatusCode, detail: &str) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimited(detail.to_string())
        } else if status.is_server_error() {
            Self::Transient(detail.to_string())
        } else if detail.contains(CONTEXT_LENGTH_SIGNAL) {
            Self::ContextTooLarge(detail.to_string())
        } else {
            Self::Fatal(format!("{status}: {detail}"))
        }
    }

    /// Classify a transport failure (connect, timeout, TLS).
    pub fn from_transport(err: reqwest::Error) -> Self {
        Self::Transient(err.to_string())
    }
}
