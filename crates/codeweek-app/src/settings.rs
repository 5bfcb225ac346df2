//! Persisted user settings.
//!
//! A single JSON file, `codeweek/settings.json` under the platform config
//! directory, holding the display name. Unreadable or corrupt files fall back
//! to defaults; writes go to a temporary file that is then renamed over the
//! original.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Directory under the platform config directory.
pub const SETTINGS_DIRECTORY_NAME: &str = "codeweek";

/// File name inside [`SETTINGS_DIRECTORY_NAME`].
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// User settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Display name attached to sent messages.
    #[serde(default)]
    pub name: String,
}

/// Settings could not be saved.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings directory could not be created.
    #[error("failed to create settings directory at {path:?}: {source}")]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Settings could not be serialized.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Temporary file could not be written.
    #[error("failed to write settings file at {path:?}: {source}")]
    Write {
        /// Temporary file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Temporary file could not replace the settings file.
    #[error("failed to replace settings file {to:?} with {from:?}: {source}")]
    Rename {
        /// Temporary file path.
        from: PathBuf,
        /// Settings file path.
        to: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Settings bound to a file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// `codeweek` under the platform config directory, or `.codeweek` in the
    /// working directory if the platform has none.
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .map_or_else(|| PathBuf::from(".codeweek"), |dir| dir.join(SETTINGS_DIRECTORY_NAME))
    }

    /// Default settings file path.
    pub fn default_path() -> PathBuf {
        Self::default_dir().join(SETTINGS_FILE_NAME)
    }

    /// Load settings from `path`, falling back to defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = load_from_disk(&path);
        Self { path, settings }
    }

    /// Load settings from the default path.
    pub fn load() -> Self {
        Self::open(Self::default_path())
    }

    /// File these settings are bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Stored display name.
    pub fn name(&self) -> &str {
        &self.settings.name
    }

    /// Update and save the display name. A no-op if unchanged.
    pub fn set_name(&mut self, name: &str) -> Result<(), SettingsError> {
        if self.settings.name == name {
            return Ok(());
        }
        let updated = Settings { name: name.to_string() };
        self.persist(&updated)?;
        self.settings = updated;
        Ok(())
    }

    fn persist(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|source| SettingsError::CreateDir { path: parent.to_path_buf(), source })?;
        }

        let content = serde_json::to_string_pretty(settings)?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content)
            .map_err(|source| SettingsError::Write { path: temp_path.clone(), source })?;

        std::fs::rename(&temp_path, &self.path).map_err(|source| SettingsError::Rename {
            from: temp_path,
            to: self.path.clone(),
            source,
        })?;

        debug!(path = ?self.path, "saved settings");
        Ok(())
    }
}

fn load_from_disk(path: &Path) -> Settings {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(?path, "settings file not found, using defaults");
            return Settings::default();
        },
        Err(e) => {
            warn!(?path, error = %e, "failed to read settings, using defaults");
            return Settings::default();
        },
    };

    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!(?path, error = %e, "failed to parse settings, using defaults");
        Settings::default()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(dir.path().join("settings.json"));
        assert_eq!(store.name(), "");
    }

    #[test]
    fn name_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codeweek").join("settings.json");

        let mut store = SettingsStore::open(&path);
        store.set_name("alice").unwrap();

        let reopened = SettingsStore::open(&path);
        assert_eq!(reopened.name(), "alice");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn file_holds_single_name_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        SettingsStore::open(&path).set_name("bob").unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({"name": "bob"}));
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut store = SettingsStore::open(&path);
        assert_eq!(store.settings(), &Settings::default());

        // Saving replaces the corrupt file.
        store.set_name("carol").unwrap();
        assert_eq!(SettingsStore::open(&path).name(), "carol");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"name":"dave","theme":"dark"}"#).unwrap();

        assert_eq!(SettingsStore::open(&path).name(), "dave");
    }

    #[test]
    fn default_path_is_namespaced() {
        let path = SettingsStore::default_path();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(SETTINGS_FILE_NAME));
        let dir = path.parent().and_then(Path::file_name).and_then(|n| n.to_str()).unwrap();
        assert!(dir.ends_with(SETTINGS_DIRECTORY_NAME));
    }
}
