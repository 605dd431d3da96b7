//! Transcription Plan
//!
//! Immutable execution parameters: which providers to try, in what order,
//! and with what retry and timeout budget.

use super::ProviderOptions;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::time::Duration;

/// Default attempts per provider
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;

/// Default per-attempt timeout (5 minutes)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

static NO_OPTIONS: Lazy<ProviderOptions> = Lazy::new(ProviderOptions::new);

/// Plan construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("At least one provider must be specified")]
    NoProviders,

    #[error("Max attempts must be at least 1")]
    InvalidMaxAttempts,

    #[error("Timeout must be positive")]
    InvalidTimeout,
}

/// Validated, immutable transcription plan
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionPlan {
    provider_names: Vec<String>,
    max_attempts: u32,
    timeout: Duration,
    options: HashMap<String, ProviderOptions>,
}

impl TranscriptionPlan {
    /// Create a plan, validating every parameter
    pub fn new(
        provider_names: Vec<String>,
        max_attempts: u32,
        timeout: Duration,
        options: HashMap<String, ProviderOptions>,
    ) -> Result<Self, PlanError> {
        if provider_names.is_empty() {
            return Err(PlanError::NoProviders);
        }
        if max_attempts < 1 {
            return Err(PlanError::InvalidMaxAttempts);
        }
        if timeout.is_zero() {
            return Err(PlanError::InvalidTimeout);
        }

        Ok(Self {
            provider_names,
            max_attempts,
            timeout,
            options,
        })
    }

    /// Start a builder with defaults for everything but the provider list
    pub fn builder<I, S>(provider_names: I) -> TranscriptionPlanBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TranscriptionPlanBuilder::new(provider_names)
    }

    /// Primary provider with an optional single fallback
    pub fn simple(primary: &str, fallback: Option<&str>) -> Self {
        let mut names = vec![primary.to_string()];
        names.extend(fallback.map(str::to_string));
        Self {
            provider_names: names,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
            options: HashMap::new(),
        }
    }

    /// Default budget over a priority-ordered provider list
    pub fn with_fallbacks<I, S>(provider_names: I) -> Result<Self, PlanError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder(provider_names).build()
    }

    pub fn provider_names(&self) -> &[String] {
        &self.provider_names
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Per-attempt budget, relayed to providers
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Options for one provider; empty when none were configured
    pub fn options_for(&self, provider_name: &str) -> &ProviderOptions {
        self.options.get(provider_name).unwrap_or(&NO_OPTIONS)
    }

    pub fn primary_provider(&self) -> &str {
        &self.provider_names[0]
    }

    pub fn has_fallback(&self) -> bool {
        self.provider_names.len() > 1
    }

    pub fn fallback_providers(&self) -> &[String] {
        &self.provider_names[1..]
    }
}

/// Builder for TranscriptionPlan
pub struct TranscriptionPlanBuilder {
    provider_names: Vec<String>,
    max_attempts: u32,
    timeout: Duration,
    options: HashMap<String, ProviderOptions>,
}

impl TranscriptionPlanBuilder {
    fn new<I, S>(provider_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            provider_names: provider_names.into_iter().map(Into::into).collect(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
            options: HashMap::new(),
        }
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the option bag of one provider
    pub fn options(mut self, provider_name: impl Into<String>, options: ProviderOptions) -> Self {
        self.options.insert(provider_name.into(), options);
        self
    }

    /// Set a single option for one provider
    pub fn option(
        mut self,
        provider_name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.options
            .entry(provider_name.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<TranscriptionPlan, PlanError> {
        TranscriptionPlan::new(self.provider_names, self.max_attempts, self.timeout, self.options)
    }
}
