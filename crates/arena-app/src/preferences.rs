//! Local preference store: a single JSON object on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use arena_core::error::PreferenceError;

use crate::localization::DEFAULT_LANGUAGE;

/// User preferences. Only the display language today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// File name inside the per-user config directory.
const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform's per-user config directory
    /// (`~/.config/arena` on Linux). None when the platform has none.
    pub fn user_default() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("arena").join(PREFERENCES_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored preferences. A missing file is not an error.
    pub fn try_load(&self) -> Result<Preferences, PreferenceError> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }
        let json = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Like `try_load`, but a corrupt store yields defaults.
    pub fn load(&self) -> Preferences {
        self.try_load().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring unreadable preferences");
            Preferences::default()
        })
    }

    pub fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        let json = serde_json::to_string_pretty(preferences)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "arena-prefs-{}-{name}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let store = PreferenceStore::new(scratch("missing"));
        assert_eq!(store.try_load().unwrap(), Preferences::default());
        assert_eq!(store.load().language, "en");
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch("saved");
        let store = PreferenceStore::new(&path);
        store
            .save(&Preferences {
                language: "es".into(),
            })
            .unwrap();

        assert_eq!(store.load().language, "es");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_save_creates_missing_directories() {
        let dir = std::env::temp_dir().join(format!("arena-prefs-{}-nested", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let store = PreferenceStore::new(dir.join("arena").join(PREFERENCES_FILE));

        store.save(&Preferences::default()).unwrap();
        assert_eq!(store.try_load().unwrap(), Preferences::default());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_user_default_lives_in_config_dir() {
        if let Some(store) = PreferenceStore::user_default() {
            assert!(store.path().ends_with("arena/preferences.json"));
            assert!(store.path().starts_with(dirs::config_dir().unwrap()));
        }
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let path = scratch("corrupt");
        std::fs::write(&path, "{ language: ").unwrap();
        let store = PreferenceStore::new(&path);

        assert!(matches!(store.try_load(), Err(PreferenceError::Parse(_))));
        assert_eq!(store.load(), Preferences::default());
        let _ = std::fs::remove_file(path);
    }
}
