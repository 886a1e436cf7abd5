//! Persisted settings values (`settings.toml`).

use std::path::{Path, PathBuf};

use cabin_core::prelude::*;
use serde::{Deserialize, Serialize};

const SETTINGS_FILENAME: &str = "settings.toml";

/// Settings values that survive a restart of the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSettings {
    pub wifi_enabled: bool,
    pub auto_time: bool,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            wifi_enabled: true,
            auto_time: true,
        }
    }
}

/// Toml-backed store for [`PersistedSettings`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store at the platform default location
    /// (`~/.config/cabin-settings/settings.toml`).
    pub fn at_default_path() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: base.join("cabin-settings").join(SETTINGS_FILENAME),
        }
    }

    /// Store at an explicit path (tests, `--config` override).
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted values. A missing or unparseable file falls back to
    /// defaults; parse failures are logged, not surfaced.
    pub fn load(&self) -> PersistedSettings {
        if !self.path.exists() {
            debug!("No settings file at {:?}, using defaults", self.path);
            return PersistedSettings::default();
        }

        match std::fs::read_to_string(&self.path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    debug!("Loaded settings from {:?}", self.path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", self.path, e);
                    PersistedSettings::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {:?}: {}", self.path, e);
                PersistedSettings::default()
            }
        }
    }

    /// Save persisted values. Atomic write: temp file, then rename.
    pub fn save(&self, settings: &PersistedSettings) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| Error::config(format!("Failed to create config dir: {}", e)))?;
            }
        }

        let temp_path = self.path.with_extension("toml.tmp");
        let content = toml::to_string_pretty(settings)
            .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&temp_path, &content)
            .map_err(|e| Error::config(format!("Failed to write temp file: {}", e)))?;

        std::fs::rename(&temp_path, &self.path)
            .map_err(|e| Error::config(format!("Failed to rename temp file: {}", e)))?;

        info!("Saved settings to {:?}", self.path);
        Ok(())
    }
}
