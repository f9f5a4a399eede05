//! Persistent user settings.
//!
//! Settings are a small JSON object stored in the per-user config directory.
//! Missing keys fall back to their defaults, and a missing or unreadable file
//! simply yields the defaults.

use anyhow::Context;
use quickimg_core::{Hotkey, HotkeyError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// File name of the settings blob inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const DEFAULT_HOTKEY: &str = "ctrl+shift+b";
pub const DEFAULT_MIN_SCALE: u32 = 10;
pub const DEFAULT_MAX_SCALE: u32 = 200;
/// Largest slider bound accepted from the settings file or the options window.
pub const MAX_SCALE_LIMIT: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Shortcut that toggles the editor window.
    pub hotkey: String,
    /// Lower bound of the scale slider, in percent.
    pub min_scale: u32,
    /// Upper bound of the scale slider, in percent.
    pub max_scale: u32,
    /// Launch at login.
    pub run_at_startup: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hotkey: DEFAULT_HOTKEY.to_string(),
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            run_at_startup: false,
        }
    }
}

impl Settings {
    /// Apply the option dialog rules: lowercase hotkey, `min_scale >= 1`,
    /// `max_scale > min_scale`, both bounded by [`MAX_SCALE_LIMIT`].
    pub fn normalized(mut self) -> Self {
        self.hotkey = self.hotkey.trim().to_lowercase();
        self.min_scale = self.min_scale.clamp(1, MAX_SCALE_LIMIT - 1);
        self.max_scale = self
            .max_scale
            .clamp(self.min_scale.saturating_add(1), MAX_SCALE_LIMIT);
        self
    }

    pub fn parsed_hotkey(&self) -> Result<Hotkey, HotkeyError> {
        self.hotkey.parse()
    }
}

/// `<config dir>/QuickImg/settings.json` for the current user.
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "quickimg", "QuickImg")
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
}

/// Load settings, falling back to defaults on any failure.
pub fn load(path: impl AsRef<Path>) -> Settings {
    let path = path.as_ref();
    match try_load(path) {
        Ok(Some(settings)) => {
            debug!(path = %path.display(), "settings loaded");
            settings.normalized()
        }
        Ok(None) => {
            debug!(path = %path.display(), "no settings file, using defaults");
            Settings::default()
        }
        Err(e) => {
            error!("Error loading settings: {:#}", e);
            Settings::default()
        }
    }
}

/// Load settings; `Ok(None)` when the file does not exist.
pub fn try_load(path: impl AsRef<Path>) -> anyhow::Result<Option<Settings>> {
    let path = path.as_ref();
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("read settings file: {}", path.display()))
        }
    };
    let settings = serde_json::from_str(&data).context("parse settings json")?;
    Ok(Some(settings))
}

/// Save settings as pretty JSON, creating the directory if needed.
pub fn save(path: impl AsRef<Path>, settings: &Settings) -> anyhow::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create settings dir: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(settings).context("serialize settings to json")?;
    fs::write(path, json).with_context(|| format!("write settings file: {}", path.display()))?;
    info!(path = %path.display(), "settings saved");
    Ok(())
}
