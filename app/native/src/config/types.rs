//! Configuration types for Orientation Lock.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::orientation::{LandscapeDirection, LockMode, PortraitDirection};

/// Directory and file names used when searching for the configuration.
const APP_DIR: &str = "orientation-lock";
const CONFIG_FILE: &str = "config.json";
const LEGACY_CONFIG_FILE: &str = ".orientation-lock.json";

/// Lock applied when the controller is created.
///
/// Mirrors the orientation an application declares in its platform manifest
/// so the controller starts out agreeing with the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum InitialLock {
    /// All orientations allowed. This is the default.
    #[default]
    Unlocked,
    /// Locked to portrait.
    Portrait,
    /// Locked to upside-down portrait.
    PortraitUpsideDown,
    /// Locked to landscape with the device rotated left.
    LandscapeLeft,
    /// Locked to landscape with the device rotated right.
    LandscapeRight,
}

impl From<InitialLock> for LockMode {
    fn from(lock: InitialLock) -> Self {
        match lock {
            InitialLock::Unlocked => Self::Unlocked,
            InitialLock::Portrait => Self::LockedPortrait { direction: PortraitDirection::Up },
            InitialLock::PortraitUpsideDown => {
                Self::LockedPortrait { direction: PortraitDirection::Down }
            }
            InitialLock::LandscapeLeft => {
                Self::LockedLandscape { direction: LandscapeDirection::Left }
            }
            InitialLock::LandscapeRight => {
                Self::LockedLandscape { direction: LandscapeDirection::Right }
            }
        }
    }
}

/// Root configuration.
///
/// Example:
/// ```json
/// {
///   "initialLock": "portrait",
///   "trackOnStart": true,
///   "angleHysteresis": 10
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct OrientationConfig {
    /// JSON Schema reference for editor support.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Lock applied when the controller is created.
    /// Default: "unlocked"
    pub initial_lock: InitialLock,

    /// Whether to subscribe to the orientation sensor as soon as the
    /// controller is created.
    /// Default: false
    pub track_on_start: bool,

    /// Degrees a rotation reading must travel into a new orientation band
    /// before the tracker switches to it. `0` disables filtering; values
    /// above 44 are clamped.
    /// Default: 0
    pub angle_hysteresis: u16,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.orientation-lock.json or $XDG_CONFIG_HOME/orientation-lock/config.json"
    )]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations:
/// 1. `$XDG_CONFIG_HOME/orientation-lock/config.json` (if `XDG_CONFIG_HOME` is set)
/// 2. `~/.config/orientation-lock/config.json`
/// 3. The platform configuration directory (`~/Library/Application Support` on macOS)
/// 4. `~/.orientation-lock.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        paths.push(PathBuf::from(xdg_config).join(APP_DIR).join(CONFIG_FILE));
    }

    if let Some(home) = dirs::home_dir() {
        let path = home.join(".config").join(APP_DIR).join(CONFIG_FILE);
        if !paths.contains(&path) {
            paths.push(path);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join(APP_DIR).join(CONFIG_FILE);
        if !paths.contains(&path) {
            paths.push(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(LEGACY_CONFIG_FILE));
    }

    paths
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist.
/// Returns `ConfigError::IoError` if the file could not be read.
/// Returns `ConfigError::ParseError` if the file contains invalid JSON.
pub fn load_config_from_path(path: &Path) -> Result<(OrientationConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    let config: OrientationConfig = serde_json::from_reader(reader)?;
    Ok((config, path.to_path_buf()))
}

/// Loads the configuration from the first existing default location.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of
/// the expected locations, or the errors of [`load_config_from_path`].
pub fn load_config() -> Result<(OrientationConfig, PathBuf), ConfigError> {
    config_paths()
        .into_iter()
        .find(|path| path.exists())
        .map_or(Err(ConfigError::NotFound), |path| load_config_from_path(&path))
}
