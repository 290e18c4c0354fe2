use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::apple::ApplePlacement;
use crate::config::{GridSize, MAX_GRID_SIDE};

const APP_DIR_NAME: &str = "grid-snake";
const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// User settings as stored on disk. Every field is optional.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<ApplePlacement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl SettingsFile {
    /// Returns a copy where every value present in `overrides` wins.
    #[must_use]
    pub fn merged_with(self, overrides: SettingsFile) -> Self {
        Self {
            width: overrides.width.or(self.width),
            height: overrides.height.or(self.height),
            placement: overrides.placement.or(self.placement),
            log_level: overrides.log_level.or(self.log_level),
        }
    }

    /// Resolves optional values against built-in defaults.
    ///
    /// Grid sides above [`MAX_GRID_SIDE`] are clamped to it.
    #[must_use]
    pub fn resolve(self) -> Settings {
        let defaults = GridSize::default();
        Settings {
            grid: GridSize::new(
                clamp_side("width", self.width.unwrap_or(defaults.width)),
                clamp_side("height", self.height.unwrap_or(defaults.height)),
            ),
            placement: self.placement.unwrap_or_default(),
            log_level: self.log_level.unwrap_or_else(|| "info".to_owned()),
        }
    }
}

fn clamp_side(name: &str, value: u16) -> u16 {
    if value > MAX_GRID_SIDE {
        log::warn!("grid {name} {value} exceeds {MAX_GRID_SIDE}, clamping");
        MAX_GRID_SIDE
    } else {
        value
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Settings {
    pub grid: GridSize,
    pub placement: ApplePlacement,
    pub log_level: String,
}

/// Returns the platform-correct settings file path.
#[must_use]
pub fn settings_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SETTINGS_FILE_NAME);
    base
}

/// Loads settings from `path`.
///
/// A missing file yields empty settings; an unreadable or malformed file is
/// an error so the caller can report it before taking over the terminal.
pub fn load_settings(path: &Path) -> Result<SettingsFile, SettingsError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("no settings file at {}", path.display());
            return Ok(SettingsFile::default());
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_owned(),
                source,
            });
        }
    };

    serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
        path: path.to_owned(),
        source,
    })
}
