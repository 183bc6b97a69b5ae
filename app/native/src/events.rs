//! Centralized event definitions for application-facing notifications.
//!
//! Every notification the controller raises is named here together with its
//! payload, so the bridging layer can forward them under stable names.
//!
//! ## Naming Convention
//!
//! All events follow the pattern: `orientation://<module>/<event-name>`
//!
//! - `orientation://` - Prefix identifying this as an Orientation Lock event
//! - `<module>` - The part of the controller that owns the event
//! - `<event-name>` - Descriptive kebab-case name for the event

use serde::{Deserialize, Serialize};

use crate::orientation::{LockMode, Orientation, OrientationMask};

/// Effective orientation events.
pub mod orientation {
    /// Emitted when the effective (post-lock) orientation changes.
    ///
    /// Payload: [`OrientationEvent`](super::OrientationEvent), or the bare
    /// orientation token for legacy subscribers.
    pub const CHANGED: &str = "orientation://orientation/changed";
}

/// Lock policy events.
pub mod lock {
    /// Emitted after every lock or unlock command.
    ///
    /// Payload: [`LockEvent`](super::LockEvent)
    pub const CHANGED: &str = "orientation://lock/changed";
}

/// Structured payload for an effective orientation change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationEvent {
    /// The new effective orientation.
    pub orientation: Orientation,
    /// Whether a lock produced this orientation.
    pub is_locked: bool,
    /// The interface mask in force when the change happened.
    pub supported_orientations: OrientationMask,
}

impl OrientationEvent {
    #[must_use]
    pub fn new(orientation: Orientation, mode: LockMode) -> Self {
        Self {
            orientation,
            is_locked: mode.is_locked(),
            supported_orientations: OrientationMask::for_lock(mode),
        }
    }
}

/// Payload for a lock policy change.
///
/// `orientation` is the orientation the lock forces, or `null` when unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockEvent {
    pub orientation: Option<Orientation>,
    pub is_locked: bool,
}

impl From<LockMode> for LockEvent {
    fn from(mode: LockMode) -> Self {
        Self { orientation: mode.forced_orientation(), is_locked: mode.is_locked() }
    }
}
