//! User preference persistence for the asset uploader demo.
//!
//! A tiny JSON-backed store that remembers the preferred theme between runs.
//! The file lives in the standard configuration directory
//! (`~/.config/asset-uploader/preferences.json` on most platforms) unless
//! [`PREFERENCES_PATH_ENV`] points elsewhere. Nothing about uploaded files is
//! ever written here.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::expand_tilde;

/// Environment variable allowing callers to override the preferences file path.
pub const PREFERENCES_PATH_ENV: &str = "ASSET_UPLOADER_PREFERENCES_PATH";

/// Default filename for the JSON payload.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Error surfaced when reading or writing preferences fails.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("preferences serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted preference values.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesPayload {
    /// Canonical identifier of the preferred theme.
    pub preferred_theme: Option<String>,
}

/// Preferences store backed by a JSON file.
#[derive(Debug, Default)]
pub struct UserPreferences {
    path: PathBuf,
    payload: PreferencesPayload,
    persist_to_disk: bool,
}

impl UserPreferences {
    /// Opens the store at the default location.
    pub fn new() -> Result<Self, PreferencesError> {
        Self::open(default_preferences_path())
    }

    /// Opens the store at `path`; a missing file yields default values.
    pub fn open(path: PathBuf) -> Result<Self, PreferencesError> {
        let payload = load_payload(&path)?;
        Ok(Self {
            path,
            payload,
            persist_to_disk: true,
        })
    }

    /// In-memory store used when the config directory cannot be accessed.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            payload: PreferencesPayload::default(),
            persist_to_disk: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn preferred_theme(&self) -> Option<&str> {
        self.payload.preferred_theme.as_deref()
    }

    /// Records a new preferred theme and writes it through when backed by a file.
    pub fn set_preferred_theme(&mut self, theme_id: Option<String>) -> Result<(), PreferencesError> {
        self.payload.preferred_theme = theme_id;
        if self.persist_to_disk {
            self.save()?;
        }
        Ok(())
    }

    fn save(&self) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.payload)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

fn default_preferences_path() -> PathBuf {
    if let Ok(path) = env::var(PREFERENCES_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("asset-uploader")
        .join(PREFERENCES_FILE_NAME)
}

fn load_payload(path: &Path) -> Result<PreferencesPayload, PreferencesError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse preferences file; using defaults"
                );
                Ok(PreferencesPayload::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(PreferencesPayload::default()),
        Err(error) => Err(PreferencesError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let preferences = UserPreferences::open(dir.path().join("prefs.json")).unwrap();
        assert_eq!(preferences.preferred_theme(), None);
    }

    #[test]
    fn theme_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        let mut preferences = UserPreferences::open(path.clone()).unwrap();
        preferences.set_preferred_theme(Some("nord".into())).unwrap();

        let reopened = UserPreferences::open(path).unwrap();
        assert_eq!(reopened.preferred_theme(), Some("nord"));
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();
        let preferences = UserPreferences::open(path).unwrap();
        assert_eq!(preferences.preferred_theme(), None);
    }

    #[test]
    fn ephemeral_store_never_touches_disk() {
        let mut preferences = UserPreferences::ephemeral();
        preferences.set_preferred_theme(Some("dracula".into())).unwrap();
        assert_eq!(preferences.preferred_theme(), Some("dracula"));
        assert_eq!(preferences.path(), Path::new(""));
    }

    #[test]
    fn env_override_controls_default_path() {
        temp_env::with_var(PREFERENCES_PATH_ENV, Some("/tmp/uploader-prefs.json"), || {
            assert_eq!(default_preferences_path(), PathBuf::from("/tmp/uploader-prefs.json"));
        });
    }
}
