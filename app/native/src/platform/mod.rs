//! Host platform abstractions for Orientation Lock.
//!
//! The orientation core never talks to an operating system directly. The
//! host (the application's native layer) is injected as an [`OrientationHost`]
//! which supplies two capabilities:
//!
//! - a sensor subscription that delivers [`RawOrientation`] readings, and
//! - a fire-and-forget hint telling the host which interface orientations
//!   it may rotate to.
//!
//! [`simulated::SimulatedHost`] implements the trait in-process for tests
//! and the `replay` CLI command.

pub mod simulated;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::OrientationError;
use crate::orientation::{Orientation, OrientationMask};

/// A reading as delivered by the host orientation sensor.
///
/// Hosts report attitude in different shapes; the tracker normalizes all of
/// them into an [`Orientation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawOrientation {
    /// Clockwise rotation in degrees from natural portrait, `-1` when the
    /// device is too flat to tell.
    Degrees(i32),
    /// Device orientation code: `0` unknown, `1` portrait, `2` portrait
    /// upside down, `3` landscape left, `4` landscape right, `5` face up,
    /// `6` face down.
    Device(i64),
    /// A reading the host has already normalized.
    Logical(Orientation),
}

/// Callback the host invokes for every sensor reading.
pub type ReadingCallback = Arc<dyn Fn(RawOrientation) + Send + Sync>;

/// Whether the host can rotate automatically at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoRotateStatus {
    /// The user-level auto-rotate setting.
    pub is_auto_rotate_enabled: bool,
    /// Whether the host has a sensor able to detect orientation.
    pub can_detect_orientation: bool,
}

impl Default for AutoRotateStatus {
    fn default() -> Self { Self { is_auto_rotate_enabled: true, can_detect_orientation: true } }
}

/// Capabilities the host platform provides to the orientation core.
///
/// Implementations must deliver readings on the same sequencing context the
/// application uses to call the controller.
pub trait OrientationHost: Send + Sync {
    /// Subscribes to raw orientation readings.
    ///
    /// The returned guard unsubscribes when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`OrientationError::SensorUnavailable`] when the sensor cannot
    /// be used (missing hardware, permission denied, ...).
    fn subscribe(&self, on_reading: ReadingCallback) -> Result<SensorSubscription, OrientationError>;

    /// Tells the host which interface orientations it may use. No
    /// acknowledgment is expected.
    fn set_allowed_orientations(&self, mask: OrientationMask);

    /// Reports the host's auto-rotate capabilities.
    fn auto_rotate_status(&self) -> AutoRotateStatus { AutoRotateStatus::default() }
}

/// RAII guard for a host sensor subscription.
///
/// Dropping the guard (or calling [`cancel`](Self::cancel)) runs the
/// unsubscribe action exactly once.
pub struct SensorSubscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl SensorSubscription {
    /// Creates a guard that runs `unsubscribe` when released.
    pub fn new<F>(unsubscribe: F) -> Self
    where F: FnOnce() + Send + 'static {
        Self { unsubscribe: Some(Box::new(unsubscribe)) }
    }

    /// Creates a guard with nothing to release.
    #[must_use]
    pub fn detached() -> Self { Self { unsubscribe: None } }

    /// Unsubscribes immediately.
    pub fn cancel(mut self) { self.release(); }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for SensorSubscription {
    fn drop(&mut self) { self.release(); }
}

impl fmt::Debug for SensorSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorSubscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
