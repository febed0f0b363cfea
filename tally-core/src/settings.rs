use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::color::{self, ProjectColor, DEFAULT_PALETTE};

/// Frontend settings, persisted to `<config dir>/tally/settings.json`.
///
/// `#[serde(default)]` fills any fields missing from an older settings file
/// with their `Default` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ── Projects ─────────────────────────────────────────────────────────
    pub default_project_color: String,
    pub project_palette: Vec<String>,
    pub public_by_default: bool,

    // ── Project creation form ────────────────────────────────────────────
    pub compact_form_height: f64,
    pub expanded_form_height: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            default_project_color: DEFAULT_PALETTE[0].to_string(),
            project_palette: DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect(),
            public_by_default: false,

            compact_form_height: 200.0,
            expanded_form_height: 400.0,
        }
    }
}

impl Settings {
    /// The configured default color, or the built-in default if malformed.
    pub fn default_color(&self) -> ProjectColor {
        ProjectColor::parse(&self.default_project_color).unwrap_or_else(|e| {
            log::warn!("{}; using built-in default", e);
            ProjectColor::default()
        })
    }

    pub fn palette(&self) -> Vec<ProjectColor> {
        let palette = color::parse_palette(&self.project_palette);
        if palette.is_empty() {
            color::default_palette()
        } else {
            palette
        }
    }
}

fn settings_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(std::env::temp_dir);
    let tally_dir = base.join("tally");
    let _ = std::fs::create_dir_all(&tally_dir);
    tally_dir.join("settings.json")
}

pub fn load() -> Settings {
    load_from(&settings_path())
}

pub fn load_from(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("Invalid settings at {}: {}", path.display(), e);
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

pub fn save(settings: &Settings) {
    save_to(settings, &settings_path());
}

pub fn save_to(settings: &Settings, path: &Path) {
    match serde_json::to_string_pretty(settings) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                log::warn!("Failed to write settings to {}: {}", path.display(), e);
            }
        }
        Err(e) => log::error!("Settings serialization failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_from(&dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"public_by_default": true}"#).unwrap();
        let settings = load_from(&path);
        assert!(settings.public_by_default);
        assert_eq!(settings.compact_form_height, 200.0);
        assert_eq!(settings.default_color().hex(), "#0b83d9");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::default();
        settings.default_project_color = "#d92b2b".to_string();
        save_to(&settings, &path);
        assert_eq!(load_from(&path).default_color().hex(), "#d92b2b");
    }

    #[test]
    fn malformed_color_falls_back() {
        let settings = Settings {
            default_project_color: "blue".to_string(),
            project_palette: vec!["bad".to_string()],
            ..Settings::default()
        };
        assert_eq!(settings.default_color(), ProjectColor::default());
        assert_eq!(settings.palette().len(), DEFAULT_PALETTE.len());
    }
}
