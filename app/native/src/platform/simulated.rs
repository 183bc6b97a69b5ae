//! In-process host used by tests and the `replay` command.
//!
//! The simulated host behaves like a real platform sensor from the
//! controller's point of view: subscriptions are guarded, readings are only
//! delivered to live subscribers and every mask hint is recorded so callers
//! can assert on what the host was told.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::{AutoRotateStatus, OrientationHost, RawOrientation, ReadingCallback, SensorSubscription};
use crate::error::OrientationError;
use crate::orientation::OrientationMask;

#[derive(Default)]
struct HostState {
    /// Reason reported when subscribing while the sensor is unavailable.
    unavailable: Option<String>,
    listeners: Vec<(u64, ReadingCallback)>,
    next_listener_id: u64,
    subscribe_calls: usize,
    masks: Vec<OrientationMask>,
    auto_rotate: AutoRotateStatus,
}

/// A scriptable [`OrientationHost`].
#[derive(Clone, Default)]
pub struct SimulatedHost {
    state: Arc<Mutex<HostState>>,
}

impl SimulatedHost {
    /// Creates a host with a working sensor.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Creates a host whose sensor refuses subscriptions.
    #[must_use]
    pub fn unavailable(reason: &str) -> Self {
        let host = Self::new();
        host.set_unavailable(Some(reason));
        host
    }

    /// Makes future subscriptions fail with `reason`, or succeed again with `None`.
    ///
    /// Existing subscriptions are left untouched.
    pub fn set_unavailable(&self, reason: Option<&str>) {
        self.state.lock().unavailable = reason.map(str::to_string);
    }

    pub fn set_auto_rotate_status(&self, status: AutoRotateStatus) {
        self.state.lock().auto_rotate = status;
    }

    /// Delivers a reading to every live subscriber.
    ///
    /// Returns the number of subscribers that received it. Listeners run
    /// after the host lock is released, so they may call back into the host.
    pub fn emit(&self, reading: RawOrientation) -> usize {
        let listeners: Vec<ReadingCallback> =
            self.state.lock().listeners.iter().map(|(_, listener)| Arc::clone(listener)).collect();

        for listener in &listeners {
            listener(reading);
        }

        listeners.len()
    }

    /// Number of live sensor subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize { self.state.lock().listeners.len() }

    /// Number of successful `subscribe` calls since creation.
    #[must_use]
    pub fn subscribe_calls(&self) -> usize { self.state.lock().subscribe_calls }

    /// Every mask hint received, oldest first.
    #[must_use]
    pub fn mask_history(&self) -> Vec<OrientationMask> { self.state.lock().masks.clone() }

    /// The most recent mask hint, if any.
    #[must_use]
    pub fn last_mask(&self) -> Option<OrientationMask> { self.state.lock().masks.last().copied() }
}

fn remove_listener(state: &Weak<Mutex<HostState>>, id: u64) {
    if let Some(state) = state.upgrade() {
        state.lock().listeners.retain(|(listener_id, _)| *listener_id != id);
        tracing::trace!(listener = id, "simulated sensor listener removed");
    }
}

impl OrientationHost for SimulatedHost {
    fn subscribe(&self, on_reading: ReadingCallback) -> Result<SensorSubscription, OrientationError> {
        let mut state = self.state.lock();

        if let Some(reason) = &state.unavailable {
            return Err(OrientationError::SensorUnavailable(reason.clone()));
        }

        let id = state.next_listener_id;
        state.next_listener_id += 1;
        state.subscribe_calls += 1;
        state.listeners.push((id, on_reading));

        let weak = Arc::downgrade(&self.state);
        Ok(SensorSubscription::new(move || remove_listener(&weak, id)))
    }

    fn set_allowed_orientations(&self, mask: OrientationMask) {
        tracing::trace!(%mask, "simulated host received orientation mask");
        self.state.lock().masks.push(mask);
    }

    fn auto_rotate_status(&self) -> AutoRotateStatus { self.state.lock().auto_rotate }
}
