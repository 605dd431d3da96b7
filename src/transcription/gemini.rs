//! Gemini Provider
//!
//! Simulated adapter for Google's speech-to-text service. Availability
//! depends on configured credentials; no request leaves the process.

use super::{
    simulated_latency, with_deadline, ProviderError, ProviderOptions, TranscriptionProvider,
};
use crate::audio::{is_supported_format, AudioFileRef};
use crate::config::GeminiSettings;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

const PROVIDER_NAME: &str = "gemini";
const SUPPORTED_FORMATS: &[&str] = &[".wav", ".flac", ".mp3", ".ogg", ".webm", ".m4a"];

/// Gemini speech-to-text provider
pub struct GeminiProvider {
    credentials_path: Option<PathBuf>,
    project_id: Option<String>,
}

impl GeminiProvider {
    pub fn new(credentials_path: Option<PathBuf>, project_id: Option<String>) -> Self {
        Self {
            credentials_path,
            project_id,
        }
    }

    pub fn from_settings(settings: &GeminiSettings) -> Self {
        Self::new(settings.credentials_path.clone(), settings.project_id.clone())
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn supported_formats(&self) -> &'static [&'static str] {
        SUPPORTED_FORMATS
    }

    async fn transcribe(
        &self,
        audio: &AudioFileRef,
        options: &ProviderOptions,
        timeout: Duration,
    ) -> Result<String, ProviderError> {
        let filename = audio.filename();
        tracing::info!("Transcribing {} with Gemini", filename);

        if let Some(language) = options.get("language_code").and_then(|v| v.as_str()) {
            tracing::debug!("Gemini language code: {}", language);
        }

        if let Some(latency) = simulated_latency(options) {
            tokio::time::sleep(latency).await;
        }

        let lowered = filename.to_lowercase();
        if lowered.contains("gemini_fail") {
            return Err(ProviderError::AttemptFailed(
                "Simulated Gemini API failure".to_string(),
            ));
        }
        if lowered.contains("timeout") {
            return Err(ProviderError::Timeout(timeout));
        }

        Ok(format!("[simulated {}] transcription of {}", PROVIDER_NAME, filename))
    }
}

#[async_trait]
impl TranscriptionProvider for GeminiProvider {
    async fn attempt(
        &self,
        audio: &AudioFileRef,
        options: &ProviderOptions,
        timeout: Duration,
    ) -> Result<String, ProviderError> {
        if !self.is_available() {
            return Err(ProviderError::Unavailable(
                "Gemini credentials not configured".to_string(),
            ));
        }

        self.validate(audio)?;

        with_deadline(timeout, self.transcribe(audio, options, timeout)).await
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        self.credentials_path.is_some()
            && self
                .project_id
                .as_deref()
                .map(|id| !id.trim().is_empty())
                .unwrap_or(false)
    }

    fn supports_format(&self, format: &str) -> bool {
        is_supported_format(SUPPORTED_FORMATS, format)
    }
}
