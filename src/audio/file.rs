//! Audio File Reference
//!
//! Immutable description of an audio file submitted for transcription.

use super::{normalize_format, probe_wav_duration};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Audio file reference errors
#[derive(Debug, thiserror::Error)]
pub enum AudioFileError {
    #[error("Audio file not found: {0}")]
    NotFound(PathBuf),

    #[error("Audio format is required")]
    MissingFormat,

    #[error("Duration must be positive, got {0}")]
    InvalidDuration(f64),

    #[error("Size must be positive")]
    InvalidSize,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reference to an existing audio file.
///
/// The file must exist when the reference is created. Duration and size are
/// optional but strictly positive when present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioFileRef {
    path: PathBuf,
    format: String,
    duration_seconds: Option<f64>,
    size_bytes: Option<u64>,
}

impl AudioFileRef {
    /// Create a reference with an explicit format tag
    pub fn new(path: impl Into<PathBuf>, format: &str) -> Result<Self, AudioFileError> {
        Self::with_details(path, format, None, None)
    }

    /// Create a reference with all attributes
    pub fn with_details(
        path: impl Into<PathBuf>,
        format: &str,
        duration_seconds: Option<f64>,
        size_bytes: Option<u64>,
    ) -> Result<Self, AudioFileError> {
        let path = path.into();

        if !path.exists() {
            return Err(AudioFileError::NotFound(path));
        }

        let format = normalize_format(format);
        if format.is_empty() {
            return Err(AudioFileError::MissingFormat);
        }

        if let Some(duration) = duration_seconds {
            if !duration.is_finite() || duration <= 0.0 {
                return Err(AudioFileError::InvalidDuration(duration));
            }
        }

        if size_bytes == Some(0) {
            return Err(AudioFileError::InvalidSize);
        }

        Ok(Self {
            path,
            format,
            duration_seconds,
            size_bytes,
        })
    }

    /// Inspect a file on disk: format from the extension, size from metadata
    /// and, for WAV files, duration from the header.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, AudioFileError> {
        let path = path.into();

        if !path.exists() {
            return Err(AudioFileError::NotFound(path));
        }

        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(normalize_format)
            .unwrap_or_default();
        if format.is_empty() {
            return Err(AudioFileError::MissingFormat);
        }

        let size_bytes = Some(std::fs::metadata(&path)?.len()).filter(|len| *len > 0);

        let duration_seconds = if format == ".wav" {
            match probe_wav_duration(&path) {
                Ok(duration) => duration,
                Err(e) => {
                    tracing::warn!("Could not read WAV header of {:?}: {}", path, e);
                    None
                }
            }
        } else {
            None
        };

        Self::with_details(path, &format, duration_seconds, size_bytes)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Normalized format tag, e.g. `".mp3"`
    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration_seconds
    }

    pub fn size_bytes(&self) -> Option<u64> {
        self.size_bytes
    }

    /// File name component of the path
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Lowercased path extension with a leading dot, or an empty string
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default()
    }
}
