// Settings store - Loading and saving the persisted configuration
//
// The file is a flat JSON object. Every known key is read on its own so a
// single malformed value only resets that value to its default.

use crate::config::migration::SettingsMigrator;
use crate::config::{Configuration, MAX_VOLUME, PhaseDurations};
use crate::sequencer::program::Phase;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Directory created under the platform config directory
const APP_DIR_NAME: &str = "seven-breaths";

/// Settings file name
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Settings error types
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    #[error("Settings must be a JSON object")]
    NotAnObject,

    #[error("Invalid settings path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings store bound to one file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store for an explicit settings file
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform config directory
    pub fn in_config_dir() -> Result<Self, SettingsError> {
        Self::default_path().map(Self::new)
    }

    /// `<config dir>/seven-breaths/settings.json`
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
            .ok_or(SettingsError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration, falling back to defaults on any error
    pub fn load(&self) -> Configuration {
        match self.try_load() {
            Ok(Some(config)) => {
                tracing::debug!(path = %self.path.display(), "Loaded settings");
                config
            }
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "No settings file, using defaults");
                Configuration::default()
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Unreadable settings, using defaults");
                Configuration::default()
            }
        }
    }

    /// Load the configuration; `Ok(None)` when the file does not exist
    pub fn try_load(&self) -> Result<Option<Configuration>, SettingsError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        parse_settings(&contents).map(Some)
    }

    /// Write the configuration (temp file + rename)
    pub fn save(&self, config: &Configuration) -> Result<(), SettingsError> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| SettingsError::InvalidPath(self.path.display().to_string()))?;

        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_string_pretty(config)?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}

/// Parse a settings document, migrating legacy keys and merging defaults
pub fn parse_settings(contents: &str) -> Result<Configuration, SettingsError> {
    let value: Value = serde_json::from_str(contents)?;
    let Value::Object(object) = value else {
        return Err(SettingsError::NotAnObject);
    };

    let migration = SettingsMigrator::migrate_to_current(object);
    for message in &migration.messages {
        tracing::info!("Settings migration: {}", message);
    }

    Ok(merge_with_defaults(&migration.settings))
}

/// Build a configuration from stored keys, using defaults for missing or bad ones
pub fn merge_with_defaults(stored: &Map<String, Value>) -> Configuration {
    let defaults = Configuration::default();

    let config = Configuration {
        timing: merge_timing(stored.get("timing"), defaults.timing),
        repeat_count_per_step: read_key(stored, "repeatCountPerStep")
            .filter(|&count: &u32| count > 0)
            .unwrap_or(defaults.repeat_count_per_step),
        audio_enabled: read_key(stored, "audioEnabled").unwrap_or(defaults.audio_enabled),
        loop_enabled: read_key(stored, "loopEnabled").unwrap_or(defaults.loop_enabled),
        volume: read_key(stored, "volume")
            .filter(|&volume: &u8| volume <= MAX_VOLUME)
            .unwrap_or(defaults.volume),
    };

    config.normalized()
}

fn merge_timing(stored: Option<&Value>, defaults: PhaseDurations) -> PhaseDurations {
    let Some(value) = stored else {
        return defaults;
    };
    let Value::Object(timing) = value else {
        tracing::warn!("Ignoring malformed 'timing' setting");
        return defaults;
    };

    let mut merged = defaults;
    for phase in Phase::ALL {
        let key = phase_key(phase);
        if let Some(ticks) = read_key::<u32>(timing, key).filter(|&ticks| ticks > 0) {
            merged.set(phase, ticks);
        }
    }
    merged
}

fn phase_key(phase: Phase) -> &'static str {
    match phase {
        Phase::Rest => "rest",
        Phase::Inhale => "inhale",
        Phase::Hold => "hold",
        Phase::Exhale => "exhale",
    }
}

fn read_key<T: DeserializeOwned>(object: &Map<String, Value>, key: &str) -> Option<T> {
    let value = object.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring malformed setting");
            None
        }
    }
}
