//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// OpenAI API settings (transcription + completions)
    #[serde(default)]
    pub openai: OpenAiSettings,

    /// Retry policy for the completion client
    #[serde(default)]
    pub retry: RetrySettings,

    /// Report generation settings
    #[serde(default)]
    pub report: ReportSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Data directory for transcripts and reports
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiSettings {
    /// API key (or set OPENAI_API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// Chat completion model
    #[serde(default = "default_completion_model")]
    pub model: String,

    /// Speech-to-text model
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,

    /// API base URL (empty = api.openai.com)
    #[serde(default)]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Maximum completion attempts before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial backoff delay in seconds (doubles on each retry)
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Word budget for generated call summaries
    #[serde(default = "default_summary_words")]
    pub summary_words: usize,
}

// Default value functions

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "callsight", "callsight")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/callsight"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_completion_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_delay_secs() -> u64 {
    10
}

fn default_summary_words() -> usize {
    100
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_completion_model(),
            transcription_model: default_transcription_model(),
            endpoint: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_secs: default_initial_delay_secs(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            summary_words: default_summary_words(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            openai: OpenAiSettings::default(),
            retry: RetrySettings::default(),
            report: ReportSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if self.openai.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                if !key.trim().is_empty() {
                    self.openai.api_key = key;
                }
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "callsight", "callsight")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default location of the transcript table
    pub fn transcripts_path(&self) -> PathBuf {
        self.general.data_dir.join("transcripts.csv")
    }

    /// Default location of the per-call analysis report
    pub fn report_path(&self) -> PathBuf {
        self.general.data_dir.join("calls.csv")
    }

    /// Ensure all required directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.general.data_dir)?;
        Ok(())
    }
}
