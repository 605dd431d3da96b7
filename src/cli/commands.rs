//! Subcommand handlers.

use super::{ConfigAction, ProvidersArgs, TranscribeArgs};
use anyhow::{bail, Context, Result};
use polyscribe_lib::audio::{normalize_format, AudioFileRef};
use polyscribe_lib::config::{config_file, Settings};
use polyscribe_lib::transcription::{PlanExecutor, ProviderCatalog, TranscriptionJob};
use polyscribe_lib::utils::metrics;
use std::path::Path;
use std::sync::Arc;

/// Transcribe one file. Returns whether the job completed.
pub async fn transcribe(mut settings: Settings, args: TranscribeArgs) -> Result<bool> {
    let overrides = &mut settings.transcription;
    if !args.providers.is_empty() {
        overrides.providers = args.providers;
    }
    if let Some(max_attempts) = args.max_attempts {
        overrides.max_attempts = max_attempts;
    }
    if let Some(timeout) = args.timeout {
        overrides.timeout_seconds = timeout;
    }
    if let Some(policy) = args.policy {
        overrides.policy = policy;
    }

    let plan = settings.transcription.to_plan().context("Invalid transcription plan")?;

    let mut audio = AudioFileRef::from_path(&args.input)
        .with_context(|| format!("Cannot read audio file {:?}", args.input))?;
    if let Some(format) = args.format {
        audio = AudioFileRef::with_details(
            audio.path(),
            &format,
            audio.duration_seconds(),
            audio.size_bytes(),
        )?;
    }

    let catalog = Arc::new(ProviderCatalog::with_builtin_providers(&settings.providers)?);
    let policy = settings.transcription.policy.build(audio.format());
    let executor = PlanExecutor::new(catalog, policy);

    let job = executor.execute(TranscriptionJob::new(audio), &plan).await;

    let summary = metrics().read().get_summary();
    tracing::debug!(
        attempts = summary.total_attempts,
        processing_ms = summary.avg_processing_ms,
        "Execution finished"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&job)?);
    } else if let Some(text) = job.result() {
        match &args.output {
            Some(path) => {
                std::fs::write(path, text)
                    .with_context(|| format!("Cannot write transcription to {:?}", path))?;
                eprintln!("Transcription written to {}", path.display());
            }
            None => println!("{}", text),
        }
    } else {
        eprintln!(
            "Transcription failed: {}",
            job.error_message().unwrap_or("unknown error")
        );
    }

    Ok(job.is_completed())
}

/// List registered providers and their availability
pub fn providers(settings: &Settings, args: ProvidersArgs) -> Result<()> {
    let catalog = ProviderCatalog::with_builtin_providers(&settings.providers)?;

    let providers = match &args.format {
        Some(format) => catalog.list_supporting_format(format),
        None => catalog
            .list_names()
            .iter()
            .filter_map(|name| catalog.lookup(name))
            .collect(),
    };

    if let Some(format) = &args.format {
        println!("Providers supporting {}:", normalize_format(format));
    }
    for provider in providers {
        let status = if provider.is_available() { "available" } else { "unavailable" };
        println!("  {:<12} {}", provider.name(), status);
    }

    Ok(())
}

/// Handle `config` subcommands
pub fn config(settings: &Settings, path: Option<&Path>, action: ConfigAction) -> Result<()> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(config_file);

    match action {
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(settings)?);
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Settings::default().save_to(&path)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
