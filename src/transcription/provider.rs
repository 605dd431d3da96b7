//! Transcription Provider Trait
//!
//! Common interface for transcription backends and the error taxonomy the
//! executor branches on.

use crate::audio::AudioFileRef;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Opaque per-provider options, forwarded to the provider untouched
pub type ProviderOptions = serde_json::Map<String, serde_json::Value>;

/// Kind of a provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationFailed,
    Unavailable,
    Timeout,
    AttemptFailed,
}

/// Provider errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Attempt timed out after {0:?}")]
    Timeout(Duration),

    #[error("Attempt failed: {0}")]
    AttemptFailed(String),
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Self::Unavailable(_) => ErrorKind::Unavailable,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::AttemptFailed(_) => ErrorKind::AttemptFailed,
        }
    }

    /// Only generic attempt failures are worth retrying on the same provider.
    /// Unavailable and timed-out providers are skipped immediately.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::AttemptFailed
    }
}

/// Trait for transcription providers
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Perform one transcription attempt.
    ///
    /// `timeout` is the plan's per-attempt budget. Enforcing it is the
    /// provider's job (see [`with_deadline`]).
    async fn attempt(
        &self,
        audio: &AudioFileRef,
        options: &ProviderOptions,
        timeout: Duration,
    ) -> Result<String, ProviderError>;

    /// Stable identifier, used as the catalog key
    fn name(&self) -> &str;

    /// Cheap, side-effect-free readiness probe
    fn is_available(&self) -> bool;

    /// Check a format tag (case-insensitive, leading dot optional)
    fn supports_format(&self, format: &str) -> bool;

    /// Reject audio this provider cannot handle.
    ///
    /// Implementations that add checks should still call [`validate_audio_file`].
    fn validate(&self, audio: &AudioFileRef) -> Result<(), ProviderError> {
        validate_audio_file(self, audio)
    }
}

/// Shared format check behind [`TranscriptionProvider::validate`]
pub fn validate_audio_file<P>(provider: &P, audio: &AudioFileRef) -> Result<(), ProviderError>
where
    P: TranscriptionProvider + ?Sized,
{
    if provider.supports_format(audio.format()) {
        Ok(())
    } else {
        Err(ProviderError::ValidationFailed(format!(
            "Format {} not supported by {}",
            audio.format(),
            provider.name()
        )))
    }
}

/// Run a provider call under a deadline, mapping expiry to [`ProviderError::Timeout`]
pub async fn with_deadline<F>(timeout: Duration, call: F) -> Result<String, ProviderError>
where
    F: Future<Output = Result<String, ProviderError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(timeout)),
    }
}

/// Artificial delay requested through the `simulated_latency_ms` option
pub(crate) fn simulated_latency(options: &ProviderOptions) -> Option<Duration> {
    options
        .get("simulated_latency_ms")
        .and_then(|value| value.as_u64())
        .map(Duration::from_millis)
}
