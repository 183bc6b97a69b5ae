//! Scripted controller sessions.
//!
//! A replay script is a JSONC document listing the commands an application
//! would issue and the readings a host sensor would deliver. Running it
//! against a [`SimulatedHost`] records every notification the controller
//! raises, in order, tagged with the step that caused it.
//!
//! ```json
//! {
//!   "steps": [
//!     { "action": "startTracking" },
//!     { "action": "reading", "raw": { "device": 1 } },
//!     { "action": "lockToLandscape", "direction": "right" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::OrientationConfig;
use crate::error::OrientationError;
use crate::events::{self, LockEvent, OrientationEvent};
use crate::orientation::{
    LockMode, Orientation, OrientationCallback, OrientationController, OrientationMask,
    TrackingState,
};
use crate::platform::RawOrientation;
use crate::platform::simulated::SimulatedHost;

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Step {
    StartTracking,
    StopTracking,
    /// Lock to portrait; a missing direction means up.
    LockToPortrait {
        #[serde(default)]
        direction: Option<String>,
    },
    LockToLandscape {
        direction: String,
    },
    Unlock,
    /// Deliver a raw sensor reading to every live subscription.
    Reading {
        raw: RawOrientation,
    },
    /// Make the sensor accept or refuse new subscriptions.
    SensorAvailable {
        available: bool,
        #[serde(default)]
        reason: Option<String>,
    },
}

/// A replay script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    /// Parses a script from JSONC text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid script.
    pub fn parse(text: &str) -> Result<Self, OrientationError> {
        let reader = json_comments::StripComments::new(text.as_bytes());
        Ok(serde_json::from_reader(reader)?)
    }

    /// Reads and parses a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid script.
    pub fn load(path: &Path) -> Result<Self, OrientationError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

/// A notification raised while replaying, tagged with its 1-based step.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ReplayEvent {
    OrientationChanged {
        step: usize,
        #[serde(flatten)]
        payload: OrientationEvent,
    },
    LockChanged {
        step: usize,
        #[serde(flatten)]
        payload: LockEvent,
    },
    StepFailed {
        step: usize,
        error: OrientationError,
    },
}

impl ReplayEvent {
    /// The step that raised this event.
    #[must_use]
    pub const fn step(&self) -> usize {
        match self {
            Self::OrientationChanged { step, .. }
            | Self::LockChanged { step, .. }
            | Self::StepFailed { step, .. } => *step,
        }
    }

    /// The event name a bridging layer would forward this under.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OrientationChanged { .. } => events::orientation::CHANGED,
            Self::LockChanged { .. } => events::lock::CHANGED,
            Self::StepFailed { .. } => "error",
        }
    }
}

/// Controller state once the script has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub lock_mode: LockMode,
    pub current_orientation: Orientation,
    pub device_orientation: Orientation,
    pub supported_orientations: OrientationMask,
    pub tracking: TrackingState,
    pub mask_hints_sent: usize,
}

/// Everything a replay produced.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub events: Vec<ReplayEvent>,
    pub summary: ReplaySummary,
}

impl ReplayReport {
    /// Orientations reported by change notifications, in order.
    #[must_use]
    pub fn orientation_changes(&self) -> Vec<Orientation> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReplayEvent::OrientationChanged { payload, .. } => Some(payload.orientation),
                _ => None,
            })
            .collect()
    }
}

/// Runs `script` against a fresh simulated host and controller.
///
/// Failing steps are recorded as [`ReplayEvent::StepFailed`] and the replay
/// carries on with the next step.
#[must_use]
pub fn run(script: &Script, config: &OrientationConfig) -> ReplayReport {
    let host = SimulatedHost::new();
    let events = Arc::new(Mutex::new(Vec::new()));
    let current_step = Arc::new(AtomicUsize::new(0));

    let controller = OrientationController::from_config(Arc::new(host.clone()), config);

    let sink = Arc::clone(&events);
    let step = Arc::clone(&current_step);
    controller.set_on_orientation_change(Some(OrientationCallback::structured(move |payload| {
        sink.lock().push(ReplayEvent::OrientationChanged {
            step: step.load(Ordering::SeqCst),
            payload: *payload,
        });
    })));

    let sink = Arc::clone(&events);
    let step = Arc::clone(&current_step);
    controller.set_on_lock_change(Some(Arc::new(move |payload: &LockEvent| {
        sink.lock().push(ReplayEvent::LockChanged {
            step: step.load(Ordering::SeqCst),
            payload: *payload,
        });
    })));

    for (index, action) in script.steps.iter().enumerate() {
        let number = index + 1;
        current_step.store(number, Ordering::SeqCst);
        tracing::debug!(step = number, ?action, "replaying step");

        if let Err(error) = apply(&controller, &host, action) {
            tracing::debug!(step = number, %error, "step failed");
            events.lock().push(ReplayEvent::StepFailed { step: number, error });
        }
    }

    let summary = ReplaySummary {
        lock_mode: controller.lock_mode(),
        current_orientation: controller.current_orientation(),
        device_orientation: controller.device_orientation(),
        supported_orientations: controller.supported_interface_orientations(),
        tracking: controller.tracking_state(),
        mask_hints_sent: host.mask_history().len(),
    };

    controller.stop_orientation_tracking();
    let events = std::mem::take(&mut *events.lock());

    ReplayReport { events, summary }
}

fn apply(
    controller: &OrientationController,
    host: &SimulatedHost,
    step: &Step,
) -> Result<(), OrientationError> {
    match step {
        Step::StartTracking => controller.start_orientation_tracking()?,
        Step::StopTracking => controller.stop_orientation_tracking(),
        Step::LockToPortrait { direction } => {
            controller.lock_to_portrait_named(direction.as_deref())?;
        }
        Step::LockToLandscape { direction } => controller.lock_to_landscape_named(direction)?,
        Step::Unlock => controller.unlock_all_orientations(),
        Step::Reading { raw } => {
            host.emit(*raw);
        }
        Step::SensorAvailable { available, reason } => {
            let reason = reason.as_deref().unwrap_or("sensor disabled by script");
            host.set_unavailable((!available).then_some(reason));
        }
    }

    Ok(())
}
