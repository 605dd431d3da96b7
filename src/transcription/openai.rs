//! OpenAI Provider
//!
//! Simulated adapter for the OpenAI Whisper API. No request leaves the
//! process; the adapter reproduces the API's availability, format and
//! failure behavior so plans can be exercised end to end.

use super::{
    simulated_latency, with_deadline, ProviderError, ProviderOptions, TranscriptionProvider,
};
use crate::audio::{is_supported_format, AudioFileRef};
use crate::config::OpenAiSettings;
use async_trait::async_trait;
use std::time::Duration;

const PROVIDER_NAME: &str = "openai";
const DEFAULT_MODEL: &str = "whisper-1";
const SUPPORTED_FORMATS: &[&str] = &[".mp3", ".mp4", ".mpeg", ".mpga", ".m4a", ".wav", ".webm"];

/// OpenAI Whisper transcription provider
pub struct OpenAiProvider {
    api_key: Option<String>,
    model: String,
}

impl OpenAiProvider {
    /// Create a new provider; `model` defaults to `whisper-1`
    pub fn new(api_key: Option<String>, model: Option<String>) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    /// Create from settings, reading the key from the configured environment
    /// variable when none is set inline
    pub fn from_settings(settings: &OpenAiSettings) -> Self {
        let api_key = Some(settings.api_key.clone())
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(&settings.api_key_env).ok());

        Self::new(api_key, Some(settings.model.clone()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn supported_formats(&self) -> &'static [&'static str] {
        SUPPORTED_FORMATS
    }

    async fn transcribe(
        &self,
        audio: &AudioFileRef,
        options: &ProviderOptions,
    ) -> Result<String, ProviderError> {
        let filename = audio.filename();
        tracing::info!("Transcribing {} with OpenAI {}", filename, self.model);

        if let Some(language) = options.get("language").and_then(|v| v.as_str()) {
            tracing::debug!("OpenAI language hint: {}", language);
        }

        if let Some(latency) = simulated_latency(options) {
            tokio::time::sleep(latency).await;
        }

        if filename.to_lowercase().contains("fail") {
            return Err(ProviderError::AttemptFailed(
                "Simulated OpenAI API failure".to_string(),
            ));
        }

        Ok(format!("[simulated {}] transcription of {}", PROVIDER_NAME, filename))
    }
}

#[async_trait]
impl TranscriptionProvider for OpenAiProvider {
    async fn attempt(
        &self,
        audio: &AudioFileRef,
        options: &ProviderOptions,
        timeout: Duration,
    ) -> Result<String, ProviderError> {
        if !self.is_available() {
            return Err(ProviderError::Unavailable(
                "OpenAI API key not configured".to_string(),
            ));
        }

        self.validate(audio)?;

        with_deadline(timeout, self.transcribe(audio, options)).await
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }

    fn supports_format(&self, format: &str) -> bool {
        is_supported_format(SUPPORTED_FORMATS, format)
    }
}
