//! Error types for Orientation Lock.
//!
//! This module provides the unified error type returned by the controller,
//! the tracker and the CLI. The enum serializes as `{ kind, message }` so a
//! bridging layer can forward failures to application code unchanged.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while tracking or locking orientation.
///
/// Only [`SensorUnavailable`](Self::SensorUnavailable) and
/// [`InvalidDirection`](Self::InvalidDirection) can come out of the
/// orientation core; the remaining variants belong to parsing, configuration
/// and the CLI.
#[derive(Debug, Error, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "message")]
pub enum OrientationError {
    /// The host orientation sensor could not be subscribed to.
    #[error("Sensor unavailable: {0}")]
    SensorUnavailable(String),
    /// A lock command received a direction outside its accepted values.
    #[error("Invalid direction: {0}")]
    InvalidDirection(String),
    /// An orientation token could not be parsed.
    #[error("Invalid orientation: {0}")]
    InvalidOrientation(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for OrientationError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for OrientationError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<crate::config::ConfigError> for OrientationError {
    fn from(err: crate::config::ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<String> for OrientationError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for OrientationError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}
