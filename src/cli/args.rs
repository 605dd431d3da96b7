//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use polyscribe_lib::transcription::PolicyKind;
use std::path::PathBuf;

/// Polyscribe - transcribe audio through a chain of providers
#[derive(Parser)]
#[command(name = "polyscribe")]
#[command(about = "Multi-provider audio transcription with retries and fallbacks", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file path (default: platform config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcribe an audio file
    Transcribe(TranscribeArgs),
    /// List registered providers
    Providers(ProvidersArgs),
    /// Inspect or initialize the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
pub struct TranscribeArgs {
    /// Audio file to transcribe
    pub input: PathBuf,

    /// Override the provider order (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub providers: Vec<String>,

    /// Override attempts per provider
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Override the per-attempt timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Override the selection policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyKind>,

    /// Override the format tag taken from the file extension
    #[arg(short, long)]
    pub format: Option<String>,

    /// Print the whole job as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the transcription to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ProvidersArgs {
    /// Only list providers accepting this format
    #[arg(short, long)]
    pub format: Option<String>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
