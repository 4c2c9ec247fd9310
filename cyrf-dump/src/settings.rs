//! Application settings

use std::path::{Path, PathBuf};

use cyrf_protocol::WiringMode;
use serde::{Deserialize, Serialize};

/// How annotations are printed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One aligned line per annotation
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Wiring mode at the start of the capture
    #[serde(default)]
    pub wiring: WiringMode,
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
    /// Print register value descriptions next to data
    #[serde(default = "default_true")]
    pub show_decoded: bool,
    /// Print an ASCII rendering of data payloads
    #[serde(default)]
    pub show_ascii: bool,
    /// Print warning annotations
    #[serde(default = "default_true")]
    pub show_warnings: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wiring: WiringMode::FourWire,
            format: OutputFormat::Text,
            show_decoded: true,
            show_ascii: false,
            show_warnings: true,
        }
    }
}

impl Settings {
    /// Get the XDG config directory for cyrf-dump
    /// Uses $XDG_CONFIG_HOME/cyrf-dump, falls back to ~/.config/cyrf-dump
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("cyrf-dump"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("cyrf-dump"))
    }

    /// Get the default settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::settings_path()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Load settings from an explicit file; errors are reported
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings {}: {}", path.display(), e))?;
        serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse settings {}: {}", path.display(), e))
    }
}
