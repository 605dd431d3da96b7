//! Configuration Storage
//!
//! Persist settings to disk.

use super::{Settings, SettingsError};
use std::path::{Path, PathBuf};

/// Get the configuration directory path
pub fn config_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "polyscribe", "Polyscribe")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| {
            // Fallback to current directory
            std::env::current_dir().unwrap_or_default().join("config")
        })
}

/// Get the configuration file path
pub fn config_file() -> PathBuf {
    config_dir().join("settings.toml")
}

/// Load settings from the default location
pub fn load_settings() -> Result<Settings, SettingsError> {
    load_settings_from(&config_file())
}

/// Load settings from `path`, falling back to defaults when it does not exist
pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        tracing::info!("No settings file at {:?}, using defaults", path);
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;

    tracing::info!("Settings loaded from {:?}", path);
    Ok(settings)
}

/// Save settings to the default location
pub fn save_settings(settings: &Settings) -> Result<(), SettingsError> {
    save_settings_to(settings, &config_file())
}

/// Save settings to `path`, creating parent directories
pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content)?;

    tracing::info!("Settings saved to {:?}", path);
    Ok(())
}
