//! Polyscribe CLI entry point.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use polyscribe_lib::config::Settings;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("Failed to load settings")?;

    let _guard = polyscribe_lib::init_logging(&settings.logging);
    tracing::debug!("Starting Polyscribe");

    match cli.command {
        Commands::Transcribe(args) => {
            if !cli::transcribe(settings, args).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Providers(args) => cli::providers(&settings, args)?,
        Commands::Config { action } => cli::config(&settings, cli.config.as_deref(), action)?,
    }

    Ok(ExitCode::SUCCESS)
}
