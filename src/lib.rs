//! callsight - Sales call transcription and AI-powered analysis reports
//!
//! Transcribes call recordings through the Whisper API, runs each transcript
//! through task-specific LLM prompts, and folds the answers into CSV reports.

pub mod cli;
pub mod config;
pub mod llm;
pub mod report;
pub mod transcription;

use thiserror::Error;

/// Main error type for callsight
#[derive(Error, Debug)]
pub enum CallsightError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Completion error: {0}")]
    Completion(#[from] llm::CompletionError),

    #[error("Report error: {0}")]
    Report(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, CallsightError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "callsight";
