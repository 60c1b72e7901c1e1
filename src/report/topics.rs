//! Second-pass topic rankings.
//!
//! Folds the list-valued concern/feedback columns of a finished report into
//! one corpus, asks the model for the top 5 topics with percentages, then
//! fetches supporting quotes per topic.

use serde_json::Value;
use std::path::Path;

use crate::llm::{
    build_quote_prompt, build_topic_ranking_prompt, strip_code_fence, CompletionBackend,
    CompletionClient,
};
use crate::report::CallReport;
use crate::{CallsightError, Result};

/// One ranked topic with its share of the corpus and supporting quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRanking {
    pub topic: String,
    pub percentage: String,
    pub quotes: Vec<String>,
}

/// Fold a list-valued column into one corpus string.
///
/// Takes the first element of each row's list (the reference pipeline's
/// convention) and comma-joins the non-empty results.
pub fn concat_column(report: &CallReport, column: &str) -> Result<String> {
    let cells = report.column(column).ok_or_else(|| {
        CallsightError::NotFound(format!(
            "column '{column}' not in report; run 'callsight analyze' first"
        ))
    })?;

    let parts: Vec<String> = cells
        .iter()
        .filter_map(|cell| first_list_item(cell))
        .filter(|item| !item.is_empty())
        .collect();

    Ok(parts.join(", "))
}

/// First element of a JSON-list cell; plain text cells pass through as-is.
fn first_list_item(cell: &str) -> Option<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => items.first().map(value_text),
        Ok(Value::String(s)) => Some(s),
        Ok(_) | Err(_) => Some(trimmed.to_string()),
    }
}

/// Ask the model for the top 5 topics in a corpus.
pub async fn rank_topics<B: CompletionBackend>(
    client: &CompletionClient<B>,
    corpus: &str,
) -> Result<Vec<TopicRanking>> {
    let raw = client
        .complete_raw(&build_topic_ranking_prompt(corpus))
        .await?;
    parse_rankings(&raw)
}

/// Fetch supporting quotes for one ranked topic.
pub async fn fetch_quotes<B: CompletionBackend>(
    client: &CompletionClient<B>,
    topic: &str,
    quote_corpus: &str,
) -> Result<Vec<String>> {
    let raw = client
        .complete_raw(&build_quote_prompt(topic, quote_corpus))
        .await?;
    Ok(parse_quote_list(&raw))
}

/// Write rankings out as CSV with Topic, Percentage, quotes columns.
pub fn write_rankings(rankings: &[TopicRanking], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Topic", "Percentage", "quotes"])?;
    for ranking in rankings {
        let quotes = serde_json::to_string(&ranking.quotes)
            .map_err(|e| CallsightError::Report(e.to_string()))?;
        writer.write_record([&ranking.topic, &ranking.percentage, &quotes])?;
    }
    writer.flush()?;

    Ok(())
}

/// Parse the ranking response.
///
/// The prompt asks for one object with Topic and Percentage keys, which the
/// model renders either as parallel arrays or as an array of per-topic
/// objects. Both shapes are accepted.
fn parse_rankings(raw: &str) -> Result<Vec<TopicRanking>> {
    let cleaned = strip_code_fence(raw);
    let value: Value = serde_json::from_str(cleaned).map_err(|_| {
        CallsightError::Report(format!("topic ranking response was not JSON: {raw}"))
    })?;

    let rankings = match &value {
        Value::Object(fields) => {
            let topics = list_of(fields.get("Topic"));
            let percentages = list_of(fields.get("Percentage"));
            topics
                .into_iter()
                .enumerate()
                .map(|(i, topic)| TopicRanking {
                    topic,
                    percentage: percentages.get(i).cloned().unwrap_or_default(),
                    quotes: Vec::new(),
                })
                .collect()
        }
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                let fields = item.as_object()?;
                Some(TopicRanking {
                    topic: fields.get("Topic").map(value_text)?,
                    percentage: fields.get("Percentage").map(value_text).unwrap_or_default(),
                    quotes: Vec::new(),
                })
            })
            .collect(),
        _ => Vec::new(),
    };

    if rankings.is_empty() {
        return Err(CallsightError::Report(format!(
            "could not extract topics from ranking response: {raw}"
        )));
    }

    Ok(rankings)
}

/// Parse a quote response: a JSON list when the model obliges, otherwise
/// one quote per line with bullet markers stripped.
fn parse_quote_list(raw: &str) -> Vec<String> {
    let cleaned = strip_code_fence(raw);

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(cleaned) {
        return items
            .iter()
            .map(value_text)
            .filter(|q| !q.is_empty())
            .collect();
    }

    cleaned
        .lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let line = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .unwrap_or(line);
    // "1. quote" / "2) quote"
    let line = match line.split_once(['.', ')']) {
        Some((number, rest)) if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) => {
            rest
        }
        _ => line,
    };
    line.trim().trim_matches('"').trim()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn list_of(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(value_text).collect(),
        Some(other) => vec![value_text(other)],
        None => Vec::new(),
    }
}
