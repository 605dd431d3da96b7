//! Audio Format Utilities
//!
//! Format-tag normalization and header probing.

use std::path::Path;

/// Normalize a format tag to its canonical form: trimmed, lowercase, with a leading dot.
///
/// `"MP3"`, `"mp3"` and `".Mp3"` all normalize to `".mp3"`. An empty or
/// whitespace-only tag normalizes to an empty string.
pub fn normalize_format(tag: &str) -> String {
    let trimmed = tag.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return String::new();
    }
    format!(".{}", trimmed.to_lowercase())
}

/// Compare two format tags after normalization
pub fn format_matches(a: &str, b: &str) -> bool {
    let a = normalize_format(a);
    !a.is_empty() && a == normalize_format(b)
}

/// Check whether `tag` is one of `supported`
pub fn is_supported_format(supported: &[&str], tag: &str) -> bool {
    supported.iter().any(|candidate| format_matches(candidate, tag))
}

/// Calculate audio duration from sample count
pub fn duration_seconds(sample_count: usize, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    sample_count as f64 / sample_rate as f64
}

/// Read the duration of a WAV file from its header.
///
/// Returns `Ok(None)` for an empty data chunk.
pub fn probe_wav_duration(path: &Path) -> Result<Option<f64>, hound::Error> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    // duration() counts frames, i.e. samples per channel
    let seconds = duration_seconds(reader.duration() as usize, spec.sample_rate);

    if seconds > 0.0 {
        Ok(Some(seconds))
    } else {
        Ok(None)
    }
}
