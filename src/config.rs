//! Data directory layout and persisted preferences

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::theme::Theme;

/// Overrides the data directory when set
pub const DATA_DIR_ENV: &str = "ANALOG_CLOCK_DATA_DIR";

pub const FACTOR_FILENAME: &str = "factor.txt";
pub const POSITION_FILENAME: &str = "window_position.csv";
pub const SETTINGS_FILENAME: &str = "settings.json";
pub const TICK_FILENAME: &str = "tick.wav";

/// Application data directory
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("analog-clock")
}

/// Locations of every file the clock reads or writes
#[derive(Clone, Debug)]
pub struct Paths {
    pub factor: PathBuf,
    pub position: PathBuf,
    pub settings: PathBuf,
    pub tick: PathBuf,
}

impl Paths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            factor: dir.join(FACTOR_FILENAME),
            position: dir.join(POSITION_FILENAME),
            settings: dir.join(SETTINGS_FILENAME),
            tick: dir.join(TICK_FILENAME),
        }
    }

    pub fn resolve() -> Self {
        Self::in_dir(&data_dir())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub auto_theme: bool,
    pub theme: Theme,
    pub tick_sound: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_theme: true,
            theme: Theme::Light,
            tick_sound: false,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Missing or broken file gives defaults
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|err| {
            log::warn!("{err:#}; using default settings");
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }
}
