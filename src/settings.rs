use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::discord::DISCORD_APP_ID;

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to get config directory")]
    NoConfigDir,
    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceSettings {
    pub enabled: bool,
    pub app_id: i64,
    pub large_image_key: String,
    pub large_image_text: String,
    pub handshake_timeout_secs: u64,
}

impl Default for PresenceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            app_id: DISCORD_APP_ID,
            large_image_key: "beatsaber".to_string(),
            large_image_text: "Using BeatPresence by Bytewave".to_string(),
            handshake_timeout_secs: 10,
        }
    }
}

fn get_settings_path() -> Result<PathBuf, SettingsError> {
    let config_dir = dirs::config_dir()
        .ok_or(SettingsError::NoConfigDir)?
        .join("BeatPresence");

    fs::create_dir_all(&config_dir)?;

    Ok(config_dir.join(SETTINGS_FILE))
}

pub fn load_settings() -> Result<PresenceSettings, SettingsError> {
    load_settings_from(&get_settings_path()?)
}

pub fn save_settings(settings: &PresenceSettings) -> Result<(), SettingsError> {
    save_settings_to(&get_settings_path()?, settings)
}

/// Missing files yield the defaults
pub fn load_settings_from(path: &Path) -> Result<PresenceSettings, SettingsError> {
    tracing::debug!("Loading settings from {}", path.display());

    if !path.exists() {
        return Ok(PresenceSettings::default());
    }

    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn save_settings_to(path: &Path, settings: &PresenceSettings) -> Result<(), SettingsError> {
    tracing::debug!("Saving settings to {}", path.display());

    let contents = serde_json::to_string_pretty(settings)?;
    fs::write(path, contents)?;
    Ok(())
}
