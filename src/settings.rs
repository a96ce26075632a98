//! User settings loaded from screenshot_settings.json.
//!
//! Holds the hotkey strings, the compression flag and the JPEG quality.
//! A missing file is created with defaults on first load. A malformed file
//! is left alone and defaults are used until the next explicit save.

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Hotkey strings for the three global actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shortcuts {
    /// Hotkey that captures a screenshot
    pub take_screenshot: String,
    /// Hotkey that opens the "Save PDF" flow
    pub save_pdf: String,
    /// Hotkey that asks to quit
    pub exit: String,
}

impl Default for Shortcuts {
    fn default() -> Self {
        Self {
            take_screenshot: "print_screen".to_string(),
            save_pdf: "ctrl+s".to_string(),
            exit: "esc".to_string(),
        }
    }
}

/// Complete settings document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub shortcuts: Shortcuts,
    /// JPEG quality (1-100), used only when `compress` is set
    #[serde(deserialize_with = "deserialize_quality")]
    pub quality: u8,
    /// Store captures as JPEG instead of PNG
    pub compress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shortcuts: Shortcuts::default(),
            quality: 95,
            compress: false,
        }
    }
}

impl Settings {
    /// Clamps values read from disk into their valid ranges.
    fn sanitized(mut self) -> Self {
        self.quality = self.quality.clamp(1, 100);
        self
    }
}

/// Reads any JSON number and clamps it into 1-100, so an out-of-range
/// quality does not discard the rest of the document.
fn deserialize_quality<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.round().clamp(1.0, 100.0) as u8)
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Settings bound to the file they were loaded from.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Loads settings from `path`, falling back to defaults on any failure.
    pub fn load(path: &Path) -> Self {
        let settings = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Settings>(&contents) {
                Ok(settings) => {
                    log::info!("Settings loaded from {}", path.display());
                    settings.sanitized()
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse {}: {}. Using defaults.",
                        path.display(),
                        e
                    );
                    Settings::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("{} not found. Writing defaults.", path.display());
                let settings = Settings::default();
                if let Err(e) = write_settings(path, &settings) {
                    log::warn!("{}", e);
                }
                settings
            }
            Err(e) => {
                log::warn!(
                    "Failed to read {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Settings::default()
            }
        };

        Self {
            path: path.to_path_buf(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current settings to disk, overwriting whatever is there.
    pub fn save(&self) -> Result<(), SettingsError> {
        write_settings(&self.path, &self.settings)
    }

    /// Applies `change` and persists the result.
    ///
    /// The in-memory value is updated even if the write fails.
    pub fn update(&mut self, change: impl FnOnce(&mut Settings)) -> Result<(), SettingsError> {
        change(&mut self.settings);
        self.settings = self.settings.clone().sanitized();
        self.save()
    }
}

fn write_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::load(&path);

        assert_eq!(store.settings(), &Settings::default());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"take_screenshot\": \"print_screen\""));
        assert!(content.contains("\"quality\": 95"));
        assert!(content.contains("\"compress\": false"));
    }

    #[test]
    fn test_malformed_file_uses_defaults_without_overwriting() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let store = SettingsStore::load(&path);

        assert_eq!(store.settings(), &Settings::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");

        store.save().unwrap();
        let reloaded: Settings =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded, Settings::default());
    }

    #[test]
    fn test_partial_file_fills_missing_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "compress": true, "shortcuts": { "exit": "ctrl+q" } }"#).unwrap();

        let store = SettingsStore::load(&path);

        assert!(store.settings().compress);
        assert_eq!(store.settings().quality, 95);
        assert_eq!(store.settings().shortcuts.exit, "ctrl+q");
        assert_eq!(store.settings().shortcuts.save_pdf, "ctrl+s");
    }

    #[test]
    fn test_quality_is_clamped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "quality": 0 }"#).unwrap();

        let store = SettingsStore::load(&path);
        assert_eq!(store.settings().quality, 1);
    }

    #[test]
    fn test_out_of_range_quality_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        fs::write(
            &path,
            r#"{ "quality": 300, "compress": true, "shortcuts": { "exit": "ctrl+q" } }"#,
        )
        .unwrap();
        let store = SettingsStore::load(&path);
        assert_eq!(store.settings().quality, 100);
        assert!(store.settings().compress);
        assert_eq!(store.settings().shortcuts.exit, "ctrl+q");

        fs::write(&path, r#"{ "quality": -5, "shortcuts": { "save_pdf": "ctrl+p" } }"#).unwrap();
        let store = SettingsStore::load(&path);
        assert_eq!(store.settings().quality, 1);
        assert_eq!(store.settings().shortcuts.save_pdf, "ctrl+p");
    }

    #[test]
    fn test_update_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = SettingsStore::load(&path);
        store.update(|s| s.compress = true).unwrap();

        let reloaded = SettingsStore::load(&path);
        assert!(reloaded.settings().compress);
    }
}
