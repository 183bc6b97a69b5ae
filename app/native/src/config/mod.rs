//! Configuration module for Orientation Lock.
//!
//! This module provides configuration types and loading functionality.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod template;
pub mod types;

use std::path::Path;

pub use types::{
    ConfigError, InitialLock, OrientationConfig, config_paths, load_config as load_config_default,
    load_config_from_path,
};

/// Loads the configuration, falling back to defaults.
///
/// A `custom_path` replaces the default search paths. A missing file yields
/// the default configuration silently; unreadable or invalid files are logged
/// and also yield the defaults.
#[must_use]
pub fn load_or_default(custom_path: Option<&Path>) -> OrientationConfig {
    let result = custom_path.map_or_else(load_config_default, load_config_from_path);

    match result {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            config
        }
        Err(ConfigError::NotFound) => {
            tracing::debug!("no configuration file found, using defaults");
            OrientationConfig::default()
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            OrientationConfig::default()
        }
    }
}
