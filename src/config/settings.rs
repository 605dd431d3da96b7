//! Settings Definition
//!
//! Application configuration schema.

use crate::transcription::{
    PlanError, PolicyKind, ProviderOptions, TranscriptionPlan, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_TIMEOUT,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main settings structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub transcription: TranscriptionSettings,
    pub providers: ProvidersSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Validate settings
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.transcription.to_plan()?;
        Ok(())
    }

    /// Load settings from the default location
    pub fn load() -> Result<Self, SettingsError> {
        super::store::load_settings()
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        super::store::load_settings_from(path)
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), SettingsError> {
        super::store::save_settings(self)
    }

    /// Save settings to an explicit file
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        super::store::save_settings_to(self, path)
    }
}

/// Default plan parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Provider names in priority order
    pub providers: Vec<String>,
    /// Attempts per provider
    pub max_attempts: u32,
    /// Per-attempt timeout in seconds
    pub timeout_seconds: u64,
    /// Candidate selection strategy
    pub policy: PolicyKind,
    /// Options forwarded to each provider, keyed by provider name
    pub options: HashMap<String, ProviderOptions>,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            providers: vec!["openai".to_string(), "gemini".to_string()],
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
            policy: PolicyKind::default(),
            options: HashMap::new(),
        }
    }
}

impl TranscriptionSettings {
    /// Build the plan these settings describe
    pub fn to_plan(&self) -> Result<TranscriptionPlan, PlanError> {
        TranscriptionPlan::new(
            self.providers.clone(),
            self.max_attempts,
            Duration::from_secs(self.timeout_seconds),
            self.options.clone(),
        )
    }
}

/// Built-in provider settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersSettings {
    pub openai: OpenAiSettings,
    pub gemini: GeminiSettings,
}

/// OpenAI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    /// Inline API key (empty = read from `api_key_env`)
    pub api_key: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Model identifier
    pub model: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "whisper-1".to_string(),
        }
    }
}

/// Gemini settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    /// Service account credentials file
    pub credentials_path: Option<PathBuf>,
    /// Cloud project identifier
    pub project_id: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, overridden by `RUST_LOG`
    pub filter: String,
    /// Directory for daily rolling log files (None = stderr only)
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "polyscribe=info".to_string(),
            directory: None,
        }
    }
}

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Invalid transcription settings: {0}")]
    Plan(#[from] PlanError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),
}
