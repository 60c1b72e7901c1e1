//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// callsight - Sales call transcription and AI-powered analysis reports
#[derive(Parser, Debug)]
#[command(name = "callsight")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe a directory of call recordings into a transcript table
    Transcribe {
        /// Directory containing the audio files
        #[arg(short, long)]
        input: PathBuf,

        /// Audio file extension to look for
        #[arg(short, long, default_value = "mp3")]
        extension: String,

        /// Output CSV path (defaults to transcripts.csv in the data dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the summary, question, and feedback passes over the transcripts
    Analyze {
        /// Transcript table to analyze (defaults to the data dir copy)
        #[arg(short, long)]
        transcripts: Option<PathBuf>,

        /// Output CSV path (defaults to calls.csv in the data dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rank the top concern and feedback topics across all analyzed calls
    Topics {
        /// Analyzed call report to rank (defaults to the data dir copy)
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Directory for the ranking CSVs (defaults to the data dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Transcribe, analyze, and rank topics in one go
    Run {
        /// Directory containing the audio files
        #[arg(short, long)]
        input: PathBuf,

        /// Audio file extension to look for
        #[arg(short, long, default_value = "mp3")]
        extension: String,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
