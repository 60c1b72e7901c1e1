//! Tabular call report.
//!
//! One row per transcript, one column block per completed analysis pass.
//! Persisted as CSV; list-valued fields are stored as JSON text inside the
//! cell so the file stays a flat table.

use serde_json::{Map, Value};
use std::path::Path;

use crate::llm::TaskKind;
use crate::{CallsightError, Result};

/// Name of the first column, holding the raw transcript text.
pub const TRANSCRIPT_COLUMN: &str = "transcript";

#[derive(Debug, Clone, Default)]
pub struct CallReport {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CallReport {
    /// Empty report with only the transcript column.
    pub fn new() -> Self {
        Self {
            columns: vec![TRANSCRIPT_COLUMN.to_string()],
            rows: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Append one transcript row. Only valid before any pass has run.
    pub fn push_transcript(&mut self, text: &str) -> Result<()> {
        if self.columns.len() != 1 {
            return Err(CallsightError::Report(
                "cannot add transcripts after analysis passes have run".to_string(),
            ));
        }
        self.rows.push(vec![text.to_string()]);
        Ok(())
    }

    /// Values of a named column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    pub fn transcripts(&self) -> Vec<String> {
        self.column(TRANSCRIPT_COLUMN)
            .map(|cells| cells.into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Append one pass worth of records as new columns.
    ///
    /// Row-count stability is the invariant the whole report rests on: a
    /// pass must produce exactly one record per existing row.
    pub fn append_pass(&mut self, kind: TaskKind, records: &[Map<String, Value>]) -> Result<()> {
        if records.len() != self.rows.len() {
            return Err(CallsightError::Report(format!(
                "{} pass produced {} records for {} rows",
                kind.name(),
                records.len(),
                self.rows.len()
            )));
        }

        for key in kind.schema_keys() {
            self.columns.push((*key).to_string());
        }

        for (row, record) in self.rows.iter_mut().zip(records) {
            for key in kind.schema_keys() {
                row.push(cell_text(record.get(*key)));
            }
        }

        Ok(())
    }

    /// Write the report as CSV, replacing any previous file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Read a report back from CSV.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;

        let columns = reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        if columns.is_empty() {
            return Err(CallsightError::Report(format!(
                "{} has no header row",
                path.display()
            )));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        Ok(Self { columns, rows })
    }
}

/// Flatten a record value into CSV cell text. Nulls become empty cells;
/// lists and nested objects stay JSON.
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
