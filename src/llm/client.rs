//! Resilient completion client.
//!
//! Wraps a [`CompletionBackend`] in a retry state machine: transient and
//! rate-limit failures back off exponentially, context overflows shrink the
//! transcript and re-attempt, anything else escalates immediately.

use std::time::Duration;

use crate::config::Settings;
use crate::llm::budget::truncate_transcript;
use crate::llm::{CompletionBackend, CompletionError, TaskKind};

/// Retry budget and backoff schedule for the completion client.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum attempts across all recovery branches.
    pub max_attempts: u32,

    /// Delay before the first retry; doubles on each subsequent one.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_attempts: settings.retry.max_attempts.max(1),
            initial_delay: Duration::from_secs(settings.retry.initial_delay_secs),
        }
    }

    /// Backoff delay after the given 1-based attempt: initial * 2^(attempt-1).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.initial_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Chat-completion client with retry, backoff, and context degradation.
pub struct CompletionClient<B> {
    backend: B,
    policy: RetryPolicy,
    summary_words: usize,
}

impl<B: CompletionBackend> CompletionClient<B> {
    pub fn new(backend: B, policy: RetryPolicy, summary_words: usize) -> Self {
        Self {
            backend,
            policy,
            summary_words,
        }
    }

    /// Run one analysis task over a transcript.
    ///
    /// The prompt is rebuilt on every attempt because the ContextTooLarge
    /// branch shortens the transcript in between. Truncation consumes an
    /// attempt from the same budget as retries, so a backend that keeps
    /// rejecting an already-truncated prompt cannot loop forever.
    pub async fn complete_task(
        &self,
        kind: TaskKind,
        transcript: &str,
    ) -> Result<String, CompletionError> {
        let mut transcript = transcript.to_string();

        for attempt in 1..=self.policy.max_attempts {
            let prompt = kind.build_prompt(&transcript, self.summary_words);

            match self.backend.complete(&prompt).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() => {
                    if attempt == self.policy.max_attempts {
                        return Err(err);
                    }
                    let delay = self.policy.backoff_delay(attempt);
                    tracing::warn!(
                        "{} (attempt {}/{}), retrying in {}s",
                        err,
                        attempt,
                        self.policy.max_attempts,
                        delay.as_secs()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(CompletionError::ContextTooLarge(detail)) => {
                    if attempt == self.policy.max_attempts {
                        return Err(CompletionError::ContextTooLarge(detail));
                    }
                    let overhead = kind.prompt_overhead(self.summary_words);
                    let shortened = truncate_transcript(&transcript, &overhead).to_string();
                    tracing::warn!(
                        "Context window exceeded, truncating transcript from {} to {} chars",
                        transcript.chars().count(),
                        shortened.chars().count()
                    );
                    transcript = shortened;
                }
                Err(err) => return Err(err),
            }
        }

        // Only reachable with a zero attempt budget.
        Err(CompletionError::Fatal("no attempts configured".to_string()))
    }

    /// Issue a fully built prompt with backoff, but without truncation.
    ///
    /// Used by the second-pass topic ranking, whose corpus prompts are built
    /// by the caller.
    pub async fn complete_raw(&self, prompt: &str) -> Result<String, CompletionError> {
        for attempt in 1..=self.policy.max_attempts {
            match self.backend.complete(prompt).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.backoff_delay(attempt);
                    tracing::warn!(
                        "{} (attempt {}/{}), retrying in {}s",
                        err,
                        attempt,
                        self.policy.max_attempts,
                        delay.as_secs()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }

        // Only reachable with a zero attempt budget.
        Err(CompletionError::Fatal("no attempts configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Backend that replays a scripted sequence of outcomes and records
    /// every prompt it was handed.
    struct ScriptedBackend {
        outcomes: Mutex<VecDeque<Result<String, CompletionError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(outcomes: Vec<Result<String, CompletionError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn attempts(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        fn prompt(&self, index: usize) -> String {
            self.prompts.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted backend ran out of outcomes")
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_delay: Duration::ZERO,
        }
    }

    fn client_over(backend: ScriptedBackend, max_attempts: u32) -> CompletionClient<ScriptedBackend> {
        CompletionClient::new(backend, fast_policy(max_attempts), 100)
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(10));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(20));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(40));
    }

    #[tokio::test]
    async fn first_attempt_success_makes_one_call() {
        let client = client_over(ScriptedBackend::new(vec![Ok("done".into())]), 5);

        let result = client.complete_task(TaskKind::Summary, "a call").await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(client.backend.attempts(), 1);
    }

    #[tokio::test]
    async fn rate_limits_retry_until_success() {
        let client = client_over(
            ScriptedBackend::new(vec![
                Err(CompletionError::RateLimited("busy".into())),
                Err(CompletionError::RateLimited("busy".into())),
                Ok("done".into()),
            ]),
            5,
        );

        let result = client.complete_task(TaskKind::Summary, "a call").await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(client.backend.attempts(), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_escalate_the_last_error() {
        let client = client_over(
            ScriptedBackend::new(vec![
                Err(CompletionError::Transient("502".into())),
                Err(CompletionError::Transient("502".into())),
                Err(CompletionError::Transient("502".into())),
            ]),
            3,
        );

        let result = client.complete_task(TaskKind::Summary, "a call").await;

        assert!(matches!(result, Err(CompletionError::Transient(_))));
        assert_eq!(client.backend.attempts(), 3);
    }

    #[tokio::test]
    async fn fatal_errors_do_not_retry() {
        let client = client_over(
            ScriptedBackend::new(vec![Err(CompletionError::Fatal("401".into()))]),
            5,
        );

        let result = client.complete_task(TaskKind::Summary, "a call").await;

        assert!(matches!(result, Err(CompletionError::Fatal(_))));
        assert_eq!(client.backend.attempts(), 1);
    }

    #[tokio::test]
    async fn context_overflow_truncates_and_reattempts() {
        let client = client_over(
            ScriptedBackend::new(vec![
                Err(CompletionError::ContextTooLarge("4097 > 4090".into())),
                Ok("done".into()),
            ]),
            5,
        );

        let long_transcript = "word ".repeat(10_000);
        let result = client
            .complete_task(TaskKind::Summary, &long_transcript)
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(client.backend.attempts(), 2);

        let first = client.backend.prompt(0);
        let second = client.backend.prompt(1);
        assert!(second.len() < first.len(), "retry prompt should be shorter");
    }

    #[tokio::test]
    async fn persistent_context_overflow_is_bounded_by_the_attempt_budget() {
        let client = client_over(
            ScriptedBackend::new(vec![
                Err(CompletionError::ContextTooLarge("too big".into())),
                Err(CompletionError::ContextTooLarge("too big".into())),
                Err(CompletionError::ContextTooLarge("too big".into())),
            ]),
            3,
        );

        let long_transcript = "word ".repeat(10_000);
        let result = client
            .complete_task(TaskKind::Summary, &long_transcript)
            .await;

        assert!(matches!(result, Err(CompletionError::ContextTooLarge(_))));
        assert_eq!(client.backend.attempts(), 3);
    }

    #[tokio::test]
    async fn complete_raw_retries_without_truncating() {
        let client = client_over(
            ScriptedBackend::new(vec![
                Err(CompletionError::Transient("503".into())),
                Ok("ranked".into()),
            ]),
            5,
        );

        let result = client.complete_raw("rank these topics").await;

        assert_eq!(result.unwrap(), "ranked");
        assert_eq!(client.backend.attempts(), 2);
        assert_eq!(client.backend.prompt(0), client.backend.prompt(1));
    }
}
