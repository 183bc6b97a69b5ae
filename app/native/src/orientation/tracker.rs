//! Orientation tracker.
//!
//! Subscribes to the host sensor, normalizes raw readings into an
//! [`Orientation`] and forwards every normalized reading, repeats included,
//! to a single listener. The tracker knows nothing about locks; deciding
//! whether a reading is an observable change belongs to the controller.
//!
//! # Delivery gating
//!
//! Each subscription is stamped with a generation number. The sensor
//! callback only delivers while its generation is the live one, so a reading
//! the host had already queued when tracking stopped is dropped instead of
//! reaching the listener.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use super::types::{Orientation, TrackingState};
use crate::error::OrientationError;
use crate::platform::{OrientationHost, RawOrientation, ReadingCallback, SensorSubscription};

/// Receives every normalized reading.
pub type OrientationListener = Arc<dyn Fn(Orientation) + Send + Sync>;

/// Clockwise angle bands, in degrees, for each orientation.
///
/// Each band is 90 degrees wide and centred on a multiple of 90.
pub mod angle_ranges {
    pub const PORTRAIT_PRIMARY_START: i32 = 0;
    pub const PORTRAIT_PRIMARY_END: i32 = 44;
    pub const LANDSCAPE_RIGHT_START: i32 = 45;
    pub const LANDSCAPE_RIGHT_END: i32 = 134;
    pub const PORTRAIT_INVERTED_START: i32 = 135;
    pub const PORTRAIT_INVERTED_END: i32 = 224;
    pub const LANDSCAPE_LEFT_START: i32 = 225;
    pub const LANDSCAPE_LEFT_END: i32 = 314;
    pub const PORTRAIT_SECONDARY_START: i32 = 315;
    pub const PORTRAIT_SECONDARY_END: i32 = 359;

    /// Half the width of a band; the largest usable hysteresis is one less.
    pub const HALF_BAND: i32 = 45;
}

/// Largest accepted hysteresis, in degrees.
pub const MAX_HYSTERESIS: u16 = 44;

/// Maps a clockwise angle to its orientation band.
#[must_use]
pub fn orientation_from_degrees(degrees: i32) -> Orientation {
    use angle_ranges::{
        LANDSCAPE_LEFT_END, LANDSCAPE_LEFT_START, LANDSCAPE_RIGHT_END, LANDSCAPE_RIGHT_START,
        PORTRAIT_INVERTED_END, PORTRAIT_INVERTED_START, PORTRAIT_PRIMARY_END,
        PORTRAIT_PRIMARY_START, PORTRAIT_SECONDARY_END, PORTRAIT_SECONDARY_START,
    };

    match degrees {
        PORTRAIT_PRIMARY_START..=PORTRAIT_PRIMARY_END
        | PORTRAIT_SECONDARY_START..=PORTRAIT_SECONDARY_END => Orientation::PortraitUp,
        LANDSCAPE_RIGHT_START..=LANDSCAPE_RIGHT_END => Orientation::LandscapeRight,
        PORTRAIT_INVERTED_START..=PORTRAIT_INVERTED_END => Orientation::PortraitDown,
        LANDSCAPE_LEFT_START..=LANDSCAPE_LEFT_END => Orientation::LandscapeLeft,
        _ => Orientation::Unknown,
    }
}

/// Maps a host device-orientation code.
#[must_use]
pub const fn orientation_from_device_code(code: i64) -> Orientation {
    match code {
        1 => Orientation::PortraitUp,
        2 => Orientation::PortraitDown,
        3 => Orientation::LandscapeLeft,
        4 => Orientation::LandscapeRight,
        5 => Orientation::FaceUp,
        6 => Orientation::FaceDown,
        _ => Orientation::Unknown,
    }
}

/// Normalizes a raw reading without any filtering.
#[must_use]
pub fn normalize(raw: RawOrientation) -> Orientation {
    match raw {
        RawOrientation::Degrees(degrees) => orientation_from_degrees(degrees),
        RawOrientation::Device(code) => orientation_from_device_code(code),
        RawOrientation::Logical(orientation) => orientation,
    }
}

/// Centre angle of a band orientation.
const fn band_center(orientation: Orientation) -> Option<i32> {
    match orientation {
        Orientation::PortraitUp => Some(0),
        Orientation::LandscapeRight => Some(90),
        Orientation::PortraitDown => Some(180),
        Orientation::LandscapeLeft => Some(270),
        Orientation::FaceUp | Orientation::FaceDown | Orientation::Unknown => None,
    }
}

/// Normalizes a raw reading, keeping `previous` when a degree reading has not
/// crossed far enough into a new band.
#[must_use]
pub fn normalize_filtered(raw: RawOrientation, previous: Orientation, hysteresis: u16) -> Orientation {
    let candidate = normalize(raw);

    let RawOrientation::Degrees(degrees) = raw else {
        return candidate;
    };

    if hysteresis == 0 || candidate == previous || band_center(previous).is_none() {
        return candidate;
    }

    let Some(center) = band_center(candidate) else {
        return candidate;
    };

    let offset = (degrees - center).rem_euclid(360);
    let distance_from_center = offset.min(360 - offset);
    let depth_into_band = angle_ranges::HALF_BAND - distance_from_center;

    if depth_into_band >= i32::from(hysteresis.min(MAX_HYSTERESIS)) {
        candidate
    } else {
        previous
    }
}

struct TrackerShared {
    current: RwLock<Orientation>,
    /// Generation of the live subscription, `0` while stopped.
    live_generation: AtomicU64,
    listener: RwLock<Option<OrientationListener>>,
    hysteresis: u16,
}

impl TrackerShared {
    fn receive(&self, generation: u64, raw: RawOrientation) {
        if self.live_generation.load(Ordering::SeqCst) != generation {
            tracing::trace!(?raw, generation, "dropping reading from stale subscription");
            return;
        }

        let orientation = {
            let mut current = self.current.write();
            let next = normalize_filtered(raw, *current, self.hysteresis);
            *current = next;
            next
        };

        tracing::trace!(?raw, %orientation, "orientation reading");

        let listener = self.listener.read().clone();
        if let Some(listener) = listener {
            listener(orientation);
        }
    }
}

struct Subscription {
    generation: u64,
    guard: SensorSubscription,
}

/// Tracks the device orientation reported by the host sensor.
pub struct OrientationTracker {
    host: Arc<dyn OrientationHost>,
    shared: Arc<TrackerShared>,
    subscription: Mutex<Option<Subscription>>,
    next_generation: AtomicU64,
}

impl OrientationTracker {
    /// Creates a stopped tracker with no angle filtering.
    #[must_use]
    pub fn new(host: Arc<dyn OrientationHost>) -> Self { Self::with_hysteresis(host, 0) }

    /// Creates a stopped tracker that applies `hysteresis` degrees of angle
    /// filtering. Values above [`MAX_HYSTERESIS`] are clamped.
    #[must_use]
    pub fn with_hysteresis(host: Arc<dyn OrientationHost>, hysteresis: u16) -> Self {
        Self {
            host,
            shared: Arc::new(TrackerShared {
                current: RwLock::new(Orientation::Unknown),
                live_generation: AtomicU64::new(0),
                listener: RwLock::new(None),
                hysteresis: hysteresis.min(MAX_HYSTERESIS),
            }),
            subscription: Mutex::new(None),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Subscribes to the host sensor.
    ///
    /// Does nothing when already tracking.
    ///
    /// # Errors
    ///
    /// Returns [`OrientationError::SensorUnavailable`] when the host refuses
    /// the subscription; the tracker stays stopped.
    pub fn start_tracking(&self) -> Result<(), OrientationError> {
        let mut subscription = self.subscription.lock();

        if subscription.is_some() {
            tracing::debug!("orientation tracking already active");
            return Ok(());
        }

        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let weak: Weak<TrackerShared> = Arc::downgrade(&self.shared);
        let on_reading: ReadingCallback = Arc::new(move |raw| {
            if let Some(shared) = weak.upgrade() {
                shared.receive(generation, raw);
            }
        });

        // Live before subscribing so a host that reports the current attitude
        // from inside `subscribe` is not ignored.
        self.shared.live_generation.store(generation, Ordering::SeqCst);

        match self.host.subscribe(on_reading) {
            Ok(guard) => {
                *subscription = Some(Subscription { generation, guard });
                tracing::debug!(generation, "orientation tracking started");
                Ok(())
            }
            Err(err) => {
                self.shared.live_generation.store(0, Ordering::SeqCst);
                tracing::warn!(error = %err, "failed to start orientation tracking");
                Err(err)
            }
        }
    }

    /// Unsubscribes from the host sensor. Does nothing when already stopped.
    pub fn stop_tracking(&self) {
        let Some(Subscription { generation, guard }) = self.subscription.lock().take() else {
            return;
        };

        self.shared.live_generation.store(0, Ordering::SeqCst);
        guard.cancel();
        tracing::debug!(generation, "orientation tracking stopped");
    }

    /// Lock-free so listeners may query it while a reading is delivered.
    #[must_use]
    pub fn tracking_state(&self) -> TrackingState {
        if self.shared.live_generation.load(Ordering::SeqCst) == 0 {
            TrackingState::Stopped
        } else {
            TrackingState::Active
        }
    }

    /// The last normalized reading, or `UNKNOWN` if nothing was ever read.
    #[must_use]
    pub fn current_orientation(&self) -> Orientation { *self.shared.current.read() }

    /// Replaces the listener that receives normalized readings.
    pub fn set_listener(&self, listener: Option<OrientationListener>) {
        *self.shared.listener.write() = listener;
    }
}

impl Drop for OrientationTracker {
    fn drop(&mut self) { self.stop_tracking(); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::simulated::SimulatedHost;

    fn recording_tracker(host: &SimulatedHost) -> (OrientationTracker, Arc<Mutex<Vec<Orientation>>>) {
        let tracker = OrientationTracker::new(Arc::new(host.clone()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        tracker.set_listener(Some(Arc::new(move |orientation| sink.lock().push(orientation))));
        (tracker, seen)
    }

    #[test]
    fn test_degree_bands() {
        assert_eq!(orientation_from_degrees(0), Orientation::PortraitUp);
        assert_eq!(orientation_from_degrees(44), Orientation::PortraitUp);
        assert_eq!(orientation_from_degrees(45), Orientation::LandscapeRight);
        assert_eq!(orientation_from_degrees(134), Orientation::LandscapeRight);
        assert_eq!(orientation_from_degrees(180), Orientation::PortraitDown);
        assert_eq!(orientation_from_degrees(225), Orientation::LandscapeLeft);
        assert_eq!(orientation_from_degrees(314), Orientation::LandscapeLeft);
        assert_eq!(orientation_from_degrees(315), Orientation::PortraitUp);
        assert_eq!(orientation_from_degrees(359), Orientation::PortraitUp);
    }

    #[test]
    fn test_unrecognized_raw_values_map_to_unknown() {
        assert_eq!(orientation_from_degrees(-1), Orientation::Unknown);
        assert_eq!(orientation_from_degrees(360), Orientation::Unknown);
        assert_eq!(orientation_from_device_code(0), Orientation::Unknown);
        assert_eq!(orientation_from_device_code(42), Orientation::Unknown);
        assert_eq!(orientation_from_device_code(-3), Orientation::Unknown);
    }

    #[test]
    fn test_device_codes() {
        assert_eq!(orientation_from_device_code(3), Orientation::LandscapeLeft);
        assert_eq!(orientation_from_device_code(5), Orientation::FaceUp);
        assert_eq!(orientation_from_device_code(6), Orientation::FaceDown);
    }

    #[test]
    fn test_hysteresis_holds_previous_near_boundary() {
        let previous = Orientation::PortraitUp;
        // 50 degrees is 5 degrees inside the landscape-right band.
        assert_eq!(
            normalize_filtered(RawOrientation::Degrees(50), previous, 10),
            Orientation::PortraitUp
        );
        assert_eq!(
            normalize_filtered(RawOrientation::Degrees(60), previous, 10),
            Orientation::LandscapeRight
        );
        // Disabled filter switches immediately.
        assert_eq!(
            normalize_filtered(RawOrientation::Degrees(50), previous, 0),
            Orientation::LandscapeRight
        );
    }

    #[test]
    fn test_hysteresis_wraps_around_zero() {
        let previous = Orientation::LandscapeLeft;
        assert_eq!(
            normalize_filtered(RawOrientation::Degrees(318), previous, 10),
            Orientation::LandscapeLeft
        );
        assert_eq!(
            normalize_filtered(RawOrientation::Degrees(350), previous, 10),
            Orientation::PortraitUp
        );
    }

    #[test]
    fn test_hysteresis_ignored_from_non_band_orientation() {
        assert_eq!(
            normalize_filtered(RawOrientation::Degrees(46), Orientation::Unknown, 20),
            Orientation::LandscapeRight
        );
        assert_eq!(
            normalize_filtered(RawOrientation::Degrees(-1), Orientation::PortraitUp, 20),
            Orientation::Unknown
        );
    }

    #[test]
    fn test_current_orientation_defaults_to_unknown() {
        let host = SimulatedHost::new();
        let tracker = OrientationTracker::new(Arc::new(host));
        assert_eq!(tracker.current_orientation(), Orientation::Unknown);
        assert_eq!(tracker.tracking_state(), TrackingState::Stopped);
    }

    #[test]
    fn test_start_is_idempotent() {
        let host = SimulatedHost::new();
        let (tracker, _) = recording_tracker(&host);

        tracker.start_tracking().unwrap();
        tracker.start_tracking().unwrap();

        assert_eq!(host.subscribe_calls(), 1);
        assert_eq!(host.subscriber_count(), 1);
        assert_eq!(tracker.tracking_state(), TrackingState::Active);
    }

    #[test]
    fn test_forwards_every_reading_including_repeats() {
        let host = SimulatedHost::new();
        let (tracker, seen) = recording_tracker(&host);
        tracker.start_tracking().unwrap();

        host.emit(RawOrientation::Degrees(90));
        host.emit(RawOrientation::Degrees(100));
        host.emit(RawOrientation::Device(1));

        assert_eq!(
            *seen.lock(),
            vec![Orientation::LandscapeRight, Orientation::LandscapeRight, Orientation::PortraitUp]
        );
        assert_eq!(tracker.current_orientation(), Orientation::PortraitUp);
    }

    #[test]
    fn test_stop_discards_later_readings() {
        let host = SimulatedHost::new();
        let (tracker, seen) = recording_tracker(&host);
        tracker.start_tracking().unwrap();
        host.emit(RawOrientation::Device(3));

        tracker.stop_tracking();
        tracker.stop_tracking();
        host.emit(RawOrientation::Device(4));

        assert_eq!(*seen.lock(), vec![Orientation::LandscapeLeft]);
        assert_eq!(tracker.current_orientation(), Orientation::LandscapeLeft);
        assert_eq!(host.subscriber_count(), 0);
        assert_eq!(tracker.tracking_state(), TrackingState::Stopped);
    }

    #[test]
    fn test_sensor_unavailable_leaves_tracker_stopped() {
        let host = SimulatedHost::unavailable("no gyroscope");
        let (tracker, _) = recording_tracker(&host);

        let err = tracker.start_tracking().unwrap_err();
        assert!(matches!(err, OrientationError::SensorUnavailable(_)));
        assert_eq!(tracker.tracking_state(), TrackingState::Stopped);

        host.set_unavailable(None);
        tracker.start_tracking().unwrap();
        assert_eq!(tracker.tracking_state(), TrackingState::Active);
    }

    #[test]
    fn test_restart_ignores_old_generation() {
        let host = SimulatedHost::new();
        let (tracker, seen) = recording_tracker(&host);
        tracker.start_tracking().unwrap();

        // A reading captured by the first subscription arrives after restart.
        let stale = Arc::clone(&tracker.shared);
        tracker.stop_tracking();
        tracker.start_tracking().unwrap();
        stale.receive(1, RawOrientation::Device(5));

        host.emit(RawOrientation::Device(6));
        assert_eq!(*seen.lock(), vec![Orientation::FaceDown]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let host = SimulatedHost::new();
        let (tracker, _) = recording_tracker(&host);
        tracker.start_tracking().unwrap();

        drop(tracker);
        assert_eq!(host.subscriber_count(), 0);
    }
}
