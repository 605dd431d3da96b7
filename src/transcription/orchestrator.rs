//! Plan Executor
//!
//! Drives a job through the providers selected for its plan, retrying each
//! provider in place and falling back to the next one on failure.

use super::{
    JobStateError, OrderPreservingPolicy, ProviderCatalog, ProviderError, SelectionPolicy,
    TranscriptionJob, TranscriptionPlan, TranscriptionProvider,
};
use crate::audio::AudioFileRef;
use crate::utils::{metrics, ExecutionRecord};
use std::sync::Arc;
use std::time::Instant;

/// Terminal execution failures, recorded as the job's error message
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecutionError {
    #[error("No provider available for requested names: {requested:?}")]
    NoProvidersResolved { requested: Vec<String> },

    #[error("All providers failed. Last error: {last_error}")]
    AllProvidersExhausted { last_error: ProviderError },
}

#[derive(Debug, Default)]
struct ExecutionStats {
    attempts: u32,
    providers_tried: u32,
}

/// Executes transcription plans against a provider catalog.
///
/// Providers are tried one at a time in policy order and the first non-empty
/// result wins. Provider failures never escape: `execute` always hands back
/// a job in a terminal state.
pub struct PlanExecutor {
    catalog: Arc<ProviderCatalog>,
    policy: Box<dyn SelectionPolicy>,
}

impl PlanExecutor {
    pub fn new(catalog: Arc<ProviderCatalog>, policy: Box<dyn SelectionPolicy>) -> Self {
        Self { catalog, policy }
    }

    /// Executor using [`OrderPreservingPolicy`]
    pub fn with_default_policy(catalog: Arc<ProviderCatalog>) -> Self {
        Self::new(catalog, Box::new(OrderPreservingPolicy))
    }

    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Run `plan` for `job` and return the finished job.
    ///
    /// The job must not already be finished; a finished job is returned
    /// unchanged.
    pub async fn execute(&self, mut job: TranscriptionJob, plan: &TranscriptionPlan) -> TranscriptionJob {
        if job.is_finished() {
            tracing::warn!("Job {} is already {:?}, not executing again", job.id(), job.status());
            return job;
        }

        let started = Instant::now();
        let mut stats = ExecutionStats::default();

        if let Err(e) = self.run(&mut job, plan, &mut stats).await {
            tracing::error!("Job {} rejected a status change: {}", job.id(), e);
        }

        let record = ExecutionRecord::builder()
            .job_id(job.id())
            .status(job.status())
            .provider(job.provider_used())
            .attempts(stats.attempts)
            .providers_tried(stats.providers_tried)
            .processing_time_ms(started.elapsed().as_millis() as u64)
            .build();
        metrics().write().record_execution(record);

        job
    }

    async fn run(
        &self,
        job: &mut TranscriptionJob,
        plan: &TranscriptionPlan,
        stats: &mut ExecutionStats,
    ) -> Result<(), JobStateError> {
        tracing::info!(
            "Executing plan for job {} ({} policy, providers: {:?})",
            job.id(),
            self.policy.name(),
            plan.provider_names()
        );

        let providers = self.policy.resolve(plan.provider_names(), &self.catalog);

        if providers.is_empty() {
            let error = ExecutionError::NoProvidersResolved {
                requested: plan.provider_names().to_vec(),
            };
            tracing::error!("Job {} failed: {}", job.id(), error);
            return job.mark_failed(error.to_string());
        }

        let mut last_error: Option<ProviderError> = None;

        for provider in &providers {
            job.mark_in_progress(provider.name())?;
            stats.providers_tried += 1;
            tracing::info!("Trying provider {}", provider.name());

            match self.try_provider(provider.as_ref(), job.audio(), plan, stats).await {
                Ok(text) => {
                    tracing::info!("Job {} completed by {}", job.id(), provider.name());
                    return job.mark_completed(text);
                }
                Err(e) => {
                    tracing::warn!("Provider {} failed: {}", provider.name(), e);
                    last_error = Some(e);
                }
            }
        }

        let message = match last_error {
            Some(last_error) => ExecutionError::AllProvidersExhausted { last_error }.to_string(),
            None => "All providers failed".to_string(),
        };
        tracing::error!("Job {} failed: {}", job.id(), message);
        job.mark_failed(message)
    }

    /// Validate, then attempt up to `max_attempts` times.
    ///
    /// Only `AttemptFailed` is retried; any other error ends this provider's turn.
    async fn try_provider(
        &self,
        provider: &dyn TranscriptionProvider,
        audio: &AudioFileRef,
        plan: &TranscriptionPlan,
        stats: &mut ExecutionStats,
    ) -> Result<String, ProviderError> {
        provider.validate(audio)?;

        let options = plan.options_for(provider.name());
        let max_attempts = plan.max_attempts();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            tracing::debug!("Attempt {}/{} with {}", attempt, max_attempts, provider.name());
            stats.attempts += 1;

            let error = match provider.attempt(audio, options, plan.timeout()).await {
                Ok(text) if !text.trim().is_empty() => return Ok(text),
                Ok(_) => ProviderError::AttemptFailed("Transcription returned an empty result".to_string()),
                Err(e) => e,
            };

            if !error.is_retryable() {
                tracing::warn!("Non-recoverable error from {}: {}", provider.name(), error);
                return Err(error);
            }

            tracing::debug!("Attempt {} failed: {}", attempt, error);
            last_error = Some(error);
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::AttemptFailed(format!(
                "{} failed after {} attempts",
                provider.name(),
                max_attempts
            ))
        }))
    }
}
