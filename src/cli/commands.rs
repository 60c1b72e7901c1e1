//! CLI command implementations

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::llm::{build_client, TaskKind};
use crate::report::{
    self, concat_column, fetch_quotes, rank_topics, write_rankings, CallReport,
};
use crate::transcription::{list_audio_files, WhisperTranscriber};

/// Transcribe every matching audio file in a directory into a transcript table.
pub async fn transcribe(
    settings: &Settings,
    input: &Path,
    extension: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    settings.ensure_dirs()?;
    let output = output.unwrap_or_else(|| settings.transcripts_path());

    let files = list_audio_files(input, extension)
        .with_context(|| format!("Failed to list audio files in {}", input.display()))?;

    if files.is_empty() {
        println!("No .{} files found in {}", extension, input.display());
        return Ok(());
    }

    let transcriber = WhisperTranscriber::from_settings(settings)?;
    let mut report = CallReport::new();

    let total = files.len();
    for (index, file) in files.iter().enumerate() {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        println!("Transcribing {} ({}/{})...", name, index + 1, total);

        let text = transcriber
            .transcribe(file)
            .await
            .with_context(|| format!("Failed to transcribe {}", file.display()))?;
        report.push_transcript(&text)?;

        // Checkpoint after every file so a crash keeps what's done.
        report.save(&output)?;
    }

    println!(
        "Transcribed {} calls to {}",
        report.row_count(),
        output.display()
    );

    Ok(())
}

/// Run the three analysis passes over a transcript table.
pub async fn analyze(
    settings: &Settings,
    transcripts: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    settings.ensure_dirs()?;
    let transcripts = transcripts.unwrap_or_else(|| settings.transcripts_path());
    let output = output.unwrap_or_else(|| settings.report_path());

    let mut report = CallReport::load(&transcripts).with_context(|| {
        format!(
            "No transcript table at {}. Run 'callsight transcribe' first.",
            transcripts.display()
        )
    })?;

    if report.is_empty() {
        println!("Transcript table is empty, nothing to analyze");
        return Ok(());
    }

    let client = build_client(settings)?;

    for kind in TaskKind::all() {
        println!("Running {} pass over {} calls...", kind.name(), report.row_count());
        report::run_pass(&client, &mut report, kind)
            .await
            .with_context(|| format!("{} pass failed", kind.name()))?;

        // Checkpoint after each pass; a mid-batch crash loses only the
        // pass in flight.
        report.save(&output)?;
    }

    println!("Report written to {}", output.display());

    Ok(())
}

/// Rank the top concern and feedback topics across all analyzed calls.
pub async fn topics(
    settings: &Settings,
    report_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    settings.ensure_dirs()?;
    let report_path = report_path.unwrap_or_else(|| settings.report_path());
    let output_dir = output_dir.unwrap_or_else(|| settings.general.data_dir.clone());

    let report = CallReport::load(&report_path).with_context(|| {
        format!(
            "No call report at {}. Run 'callsight analyze' first.",
            report_path.display()
        )
    })?;

    let client = build_client(settings)?;

    // (topic column, quote column, output file)
    let rankings = [
        ("Concerns", "Quotes", "concern_topics.csv"),
        ("Improvements", "Improvement_Quotes", "feedback_topics.csv"),
    ];

    for (topic_column, quote_column, file_name) in rankings {
        println!("Ranking top {} topics...", topic_column.to_lowercase());

        let corpus = concat_column(&report, topic_column)?;
        if corpus.is_empty() {
            println!("No {} found in the report, skipping", topic_column.to_lowercase());
            continue;
        }
        let quote_corpus = concat_column(&report, quote_column)?;

        let mut ranked = rank_topics(&client, &corpus).await?;
        for ranking in &mut ranked {
            ranking.quotes = fetch_quotes(&client, &ranking.topic, &quote_corpus).await?;
        }

        let output = output_dir.join(file_name);
        write_rankings(&ranked, &output)?;
        println!("Wrote {} topics to {}", ranked.len(), output.display());
    }

    Ok(())
}

/// Full pipeline: transcribe, analyze, rank topics.
pub async fn run_all(settings: &Settings, input: &Path, extension: &str) -> Result<()> {
    transcribe(settings, input, extension, None).await?;
    analyze(settings, None, None).await?;
    topics(settings, None, None).await?;
    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let content = toml::to_string_pretty(settings)?;
            print!("{}", content);
        }
        ConfigCommand::Path => {
            println!("{}", Settings::config_path()?.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Config written to {}", path.display());
        }
    }

    Ok(())
}
