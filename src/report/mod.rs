//! Report module for callsight
//!
//! Drives the per-call analysis passes over a transcript table and the
//! second-pass topic rankings, and owns CSV persistence for both.

mod table;
mod topics;

pub use table::{CallReport, TRANSCRIPT_COLUMN};
pub use topics::{concat_column, fetch_quotes, rank_topics, write_rankings, TopicRanking};

use crate::llm::{parse_structured, CompletionBackend, CompletionClient, TaskKind};
use crate::Result;

/// Run one analysis pass over every transcript in the report.
///
/// Transcripts are processed sequentially and in row order; the remote quota
/// is rate limited, so there is nothing to gain from parallel requests. A
/// response that fails to parse becomes a placeholder row, but an escalated
/// completion error halts the pass — the caller decides what survives via
/// its last checkpoint.
pub async fn run_pass<B: CompletionBackend>(
    client: &CompletionClient<B>,
    report: &mut CallReport,
    kind: TaskKind,
) -> Result<()> {
    let transcripts = report.transcripts();
    let total = transcripts.len();

    let mut records = Vec::with_capacity(total);
    for (index, transcript) in transcripts.iter().enumerate() {
        tracing::info!("{} pass: call {}/{}", kind.name(), index + 1, total);
        let raw = client.complete_task(kind, transcript).await?;
        records.push(parse_structured(&raw, kind));
    }

    report.append_pass(kind, &records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionError, RetryPolicy};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    struct ScriptedBackend {
        outcomes: Mutex<VecDeque<Result2>>,
    }

    type Result2 = std::result::Result<String, CompletionError>;

    impl ScriptedBackend {
        fn new(outcomes: Vec<Result2>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, _prompt: &str) -> Result2 {
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted backend ran out of outcomes")
        }
    }

    fn client_over(outcomes: Vec<Result2>) -> CompletionClient<ScriptedBackend> {
        CompletionClient::new(
            ScriptedBackend::new(outcomes),
            RetryPolicy {
                max_attempts: 5,
                initial_delay: Duration::ZERO,
            },
            100,
        )
    }

    #[tokio::test]
    async fn summary_pass_fills_one_row_per_transcript() {
        let client = client_over(vec![Ok(
            r#"{"Summary":"Deposit taken","Rep_name":"Jane","Sale_status":"Yes"}"#.to_string(),
        )]);

        let mut report = CallReport::new();
        report
            .push_transcript("Hi, I'm Jane, thanks for calling, a buyer put down a deposit today.")
            .unwrap();

        run_pass(&client, &mut report, TaskKind::Summary)
            .await
            .unwrap();

        assert_eq!(report.row_count(), 1);
        assert_eq!(report.column("Summary").unwrap(), vec!["Deposit taken"]);
        assert_eq!(report.column("Rep_name").unwrap(), vec!["Jane"]);
        assert_eq!(report.column("Sale_status").unwrap(), vec!["Yes"]);
    }

    #[tokio::test]
    async fn unparseable_responses_keep_the_row_count_stable() {
        let client = client_over(vec![
            Ok(r#"{"Summary":"ok","Rep_name":"Jane","Sale_status":"Yes"}"#.to_string()),
            Ok("I'm not sure".to_string()),
            Ok(r#"{"Summary":"fine","Rep_name":"Ben","Sale_status":"No"}"#.to_string()),
        ]);

        let mut report = CallReport::new();
        for transcript in ["call one", "call two", "call three"] {
            report.push_transcript(transcript).unwrap();
        }

        run_pass(&client, &mut report, TaskKind::Summary)
            .await
            .unwrap();

        assert_eq!(report.row_count(), 3);
        assert_eq!(report.column("Rep_name").unwrap(), vec!["Jane", "", "Ben"]);
    }

    #[tokio::test]
    async fn escalated_completion_errors_halt_the_pass() {
        let client = client_over(vec![Err(CompletionError::Fatal("bad key".to_string()))]);

        let mut report = CallReport::new();
        report.push_transcript("call one").unwrap();

        let result = run_pass(&client, &mut report, TaskKind::Summary).await;

        assert!(result.is_err());
        // The failed pass must not leave half-appended columns behind.
        assert_eq!(report.columns(), &["transcript"]);
    }
}
