//! callsight - Sales call transcription and AI-powered analysis reports
//!
//! Entry point for the callsight CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use callsight::cli::{Cli, Commands};
use callsight::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            callsight::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;

            match command {
                Commands::Transcribe {
                    input,
                    extension,
                    output,
                } => {
                    callsight::cli::commands::transcribe(&settings, &input, &extension, output)
                        .await?;
                }
                Commands::Analyze {
                    transcripts,
                    output,
                } => {
                    callsight::cli::commands::analyze(&settings, transcripts, output).await?;
                }
                Commands::Topics { report, output_dir } => {
                    callsight::cli::commands::topics(&settings, report, output_dir).await?;
                }
                Commands::Run { input, extension } => {
                    callsight::cli::commands::run_all(&settings, &input, &extension).await?;
                }
                Commands::Config(config_cmd) => {
                    callsight::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
