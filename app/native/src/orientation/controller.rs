//! Orientation lock controller.
//!
//! Owns the [`LockMode`], reconciles it with the tracker's readings and
//! notifies the application when the effective orientation changes.
//!
//! # Transitions
//!
//! Every lock command and every tracker reading recomputes the effective
//! orientation. State is mutated under the state lock; the host mask hint
//! and the callbacks run after that lock is released, so a callback may call
//! back into the controller. A dispatch lock, reentrant on the calling
//! thread, serializes transitions and callback replacement across threads,
//! so callbacks run in the order their transitions were computed and a
//! cleared callback never fires afterwards.
//!
//! The reported orientation starts at `PORTRAIT_UP`, the attitude an app is
//! launched in. A callback fires whenever a recomputation yields a different
//! effective orientation than the one last reported.

use std::fmt;
use std::sync::{Arc, Weak};

use eyeball::{Observable, Subscriber};
use parking_lot::{Mutex, ReentrantMutex};

use super::mask::OrientationMask;
use super::subscription::{LockCallback, OrientationCallback};
use super::tracker::OrientationTracker;
use super::types::{LandscapeDirection, LockMode, Orientation, PortraitDirection, TrackingState};
use crate::config::OrientationConfig;
use crate::error::OrientationError;
use crate::events::{LockEvent, OrientationEvent};
use crate::platform::{AutoRotateStatus, OrientationHost};

// ============================================================================
// State
// ============================================================================

struct ControllerState {
    lock_mode: LockMode,
    /// Last effective orientation reported to subscribers.
    reported: Observable<Orientation>,
    on_change: Option<OrientationCallback>,
    on_lock_change: Option<LockCallback>,
}

impl ControllerState {
    /// Recomputes the effective orientation and returns the change
    /// notification to deliver, if any.
    fn recompute(&mut self, tracked: Orientation) -> Option<(OrientationCallback, OrientationEvent)> {
        let effective = self.lock_mode.effective(tracked);
        let previous = Observable::set_if_not_eq(&mut self.reported, effective)?;

        tracing::debug!(from = %previous, to = %effective, lock = %self.lock_mode, "effective orientation changed");
        let event = OrientationEvent::new(effective, self.lock_mode);
        self.on_change.clone().map(|callback| (callback, event))
    }
}

/// Side effects of one transition, run once the state lock is released.
#[derive(Default)]
struct Effects {
    mask: Option<OrientationMask>,
    change: Option<(OrientationCallback, OrientationEvent)>,
    lock: Option<(LockCallback, LockEvent)>,
}

impl Effects {
    fn run(self, host: &dyn OrientationHost) {
        if let Some(mask) = self.mask {
            host.set_allowed_orientations(mask);
        }

        if let Some((callback, event)) = self.change {
            callback.invoke(&event);
        }

        if let Some((callback, event)) = self.lock {
            callback(&event);
        }
    }
}

struct ControllerShared {
    host: Arc<dyn OrientationHost>,
    tracker: OrientationTracker,
    state: Mutex<ControllerState>,
    dispatch: ReentrantMutex<()>,
}

impl ControllerShared {
    fn apply_lock(&self, mode: LockMode) {
        let _dispatch = self.dispatch.lock();

        let effects = {
            let mut state = self.state.lock();
            let previous = state.lock_mode;
            state.lock_mode = mode;
            tracing::debug!(from = %previous, to = %mode, "lock mode set");

            Effects {
                mask: Some(OrientationMask::for_lock(mode)),
                change: state.recompute(self.tracker.current_orientation()),
                lock: state.on_lock_change.clone().map(|callback| (callback, LockEvent::from(mode))),
            }
        };

        effects.run(self.host.as_ref());
    }

    /// Recomputes from the tracker's latest value rather than the reading
    /// that triggered the call, which another thread may have superseded
    /// while this one waited for the dispatch lock.
    fn on_reading(&self) {
        let _dispatch = self.dispatch.lock();

        let effects = {
            let mut state = self.state.lock();
            Effects {
                change: state.recompute(self.tracker.current_orientation()),
                ..Effects::default()
            }
        };

        effects.run(self.host.as_ref());
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Handle to the orientation lock controller.
///
/// Construct one at startup and clone the handle to every call site; all
/// clones share the same lock state, tracker and callbacks.
#[derive(Clone)]
pub struct OrientationController {
    shared: Arc<ControllerShared>,
}

impl OrientationController {
    /// Creates an unlocked controller with tracking stopped.
    ///
    /// No mask hint is sent until the first lock command.
    #[must_use]
    pub fn new(host: Arc<dyn OrientationHost>) -> Self {
        Self::build(host, 0)
    }

    /// Creates a controller from configuration.
    ///
    /// A configured initial lock is applied immediately, mask hint included.
    /// When `trackOnStart` is set and the sensor is unavailable, the failure
    /// is logged and the controller is returned with tracking stopped.
    #[must_use]
    pub fn from_config(host: Arc<dyn OrientationHost>, config: &OrientationConfig) -> Self {
        let controller = Self::build(host, config.angle_hysteresis);

        let mode = LockMode::from(config.initial_lock);
        if mode.is_locked() {
            controller.shared.apply_lock(mode);
        }

        if config.track_on_start
            && let Err(err) = controller.start_orientation_tracking()
        {
            tracing::warn!(error = %err, "tracking on start failed, continuing with tracking stopped");
        }

        controller
    }

    fn build(host: Arc<dyn OrientationHost>, hysteresis: u16) -> Self {
        let tracker = OrientationTracker::with_hysteresis(Arc::clone(&host), hysteresis);
        let shared = Arc::new(ControllerShared {
            host,
            tracker,
            state: Mutex::new(ControllerState {
                lock_mode: LockMode::Unlocked,
                reported: Observable::new(Orientation::PortraitUp),
                on_change: None,
                on_lock_change: None,
            }),
            dispatch: ReentrantMutex::new(()),
        });

        let weak: Weak<ControllerShared> = Arc::downgrade(&shared);
        shared.tracker.set_listener(Some(Arc::new(move |_: Orientation| {
            if let Some(shared) = weak.upgrade() {
                shared.on_reading();
            }
        })));

        Self { shared }
    }

    // ------------------------------------------------------------------------
    // Lock commands
    // ------------------------------------------------------------------------

    /// Locks to portrait. The direction selects the host mask bit only; the
    /// reported orientation is `PORTRAIT_UP` either way.
    pub fn lock_to_portrait(&self, direction: PortraitDirection) {
        self.shared.apply_lock(LockMode::LockedPortrait { direction });
    }

    /// Locks to portrait from a direction name, `None` meaning up.
    ///
    /// # Errors
    ///
    /// Returns [`OrientationError::InvalidDirection`] for anything but
    /// `up` or `down`; the lock mode is left unchanged.
    pub fn lock_to_portrait_named(&self, direction: Option<&str>) -> Result<(), OrientationError> {
        let direction = direction.map_or(Ok(PortraitDirection::Up), str::parse)?;
        self.lock_to_portrait(direction);
        Ok(())
    }

    /// Locks to landscape on the given side.
    pub fn lock_to_landscape(&self, direction: LandscapeDirection) {
        self.shared.apply_lock(LockMode::LockedLandscape { direction });
    }

    /// Locks to landscape from a direction name.
    ///
    /// # Errors
    ///
    /// Returns [`OrientationError::InvalidDirection`] for anything but
    /// `left` or `right`; the lock mode is left unchanged.
    pub fn lock_to_landscape_named(&self, direction: &str) -> Result<(), OrientationError> {
        let direction: LandscapeDirection = direction.parse()?;
        self.lock_to_landscape(direction);
        Ok(())
    }

    /// Removes any lock, allowing every orientation.
    pub fn unlock_all_orientations(&self) { self.shared.apply_lock(LockMode::Unlocked); }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn is_locked(&self) -> bool { self.lock_mode().is_locked() }

    #[must_use]
    pub fn lock_mode(&self) -> LockMode { self.shared.state.lock().lock_mode }

    /// The orientation the current lock forces, or `None` when unlocked.
    #[must_use]
    pub fn locked_orientation(&self) -> Option<Orientation> { self.lock_mode().forced_orientation() }

    /// The effective orientation: the forced one while locked, otherwise the
    /// latest tracker reading.
    #[must_use]
    pub fn current_orientation(&self) -> Orientation {
        let mode = self.lock_mode();
        mode.effective(self.shared.tracker.current_orientation())
    }

    /// The latest tracker reading, ignoring any lock.
    #[must_use]
    pub fn device_orientation(&self) -> Orientation { self.shared.tracker.current_orientation() }

    /// The interface-orientation mask for the current lock.
    #[must_use]
    pub fn supported_interface_orientations(&self) -> OrientationMask {
        OrientationMask::for_lock(self.lock_mode())
    }

    #[must_use]
    pub fn auto_rotate_status(&self) -> AutoRotateStatus { self.shared.host.auto_rotate_status() }

    #[must_use]
    pub fn tracking_state(&self) -> TrackingState { self.shared.tracker.tracking_state() }

    // ------------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------------

    /// Replaces the orientation-change callback. Neither the old nor the new
    /// callback is invoked; `None` clears it.
    pub fn set_on_orientation_change(&self, callback: Option<OrientationCallback>) {
        let _dispatch = self.shared.dispatch.lock();
        self.shared.state.lock().on_change = callback;
    }

    /// Replaces the callback fired after every lock or unlock command.
    pub fn set_on_lock_change(&self, callback: Option<LockCallback>) {
        let _dispatch = self.shared.dispatch.lock();
        self.shared.state.lock().on_lock_change = callback;
    }

    /// Subscribes to the last reported orientation, the same value the
    /// change callback receives.
    ///
    /// Intermediate values may be skipped; use the change callback to see
    /// every transition.
    #[must_use]
    pub fn subscribe(&self) -> Subscriber<Orientation> {
        Observable::subscribe(&self.shared.state.lock().reported)
    }

    // ------------------------------------------------------------------------
    // Tracking
    // ------------------------------------------------------------------------

    /// Starts orientation tracking. Does nothing when already tracking.
    ///
    /// # Errors
    ///
    /// Returns [`OrientationError::SensorUnavailable`] when the host refuses
    /// the sensor subscription.
    pub fn start_orientation_tracking(&self) -> Result<(), OrientationError> {
        self.shared.tracker.start_tracking()
    }

    /// Stops orientation tracking. The lock mode and callbacks are kept.
    pub fn stop_orientation_tracking(&self) { self.shared.tracker.stop_tracking(); }
}

impl fmt::Debug for OrientationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("OrientationController")
            .field("lock_mode", &state.lock_mode)
            .field("reported", &*Observable::get(&state.reported))
            .field("on_change", &state.on_change)
            .field("tracking", &self.shared.tracker.tracking_state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InitialLock;
    use crate::platform::RawOrientation;
    use crate::platform::simulated::SimulatedHost;

    fn controller() -> (OrientationController, SimulatedHost) {
        let host = SimulatedHost::new();
        (OrientationController::new(Arc::new(host.clone())), host)
    }

    fn record_changes(controller: &OrientationController) -> Arc<Mutex<Vec<Orientation>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        controller.set_on_orientation_change(Some(OrientationCallback::structured(move |event| {
            sink.lock().push(event.orientation);
        })));
        seen
    }

    #[test]
    fn test_new_controller_is_unlocked_and_silent() {
        let (controller, host) = controller();

        assert!(!controller.is_locked());
        assert_eq!(controller.current_orientation(), Orientation::Unknown);
        assert_eq!(controller.supported_interface_orientations(), OrientationMask::ALL);
        assert_eq!(controller.tracking_state(), TrackingState::Stopped);
        assert!(host.mask_history().is_empty());
    }

    #[test]
    fn test_fresh_controller_landscape_lock_fires_once() {
        let (controller, _host) = controller();
        let seen = record_changes(&controller);

        controller.lock_to_landscape(LandscapeDirection::Left);

        assert_eq!(controller.current_orientation(), Orientation::LandscapeLeft);
        assert_eq!(*seen.lock(), vec![Orientation::LandscapeLeft]);
    }

    #[test]
    fn test_first_reading_fires_when_it_differs_from_portrait() {
        let (controller, host) = controller();
        let seen = record_changes(&controller);
        let subscriber = controller.subscribe();
        controller.start_orientation_tracking().unwrap();

        host.emit(RawOrientation::Device(3));

        assert_eq!(*seen.lock(), vec![Orientation::LandscapeLeft]);
        assert_eq!(subscriber.get(), Orientation::LandscapeLeft);
    }

    #[test]
    fn test_concurrent_readings_report_latest_value() {
        let (controller, host) = controller();
        let seen = record_changes(&controller);
        controller.start_orientation_tracking().unwrap();

        let dispatch = controller.shared.dispatch.lock();
        let background = {
            let host = host.clone();
            std::thread::spawn(move || {
                host.emit(RawOrientation::Device(3));
            })
        };

        // The background reading is stored, its dispatch waits on this thread.
        while controller.device_orientation() != Orientation::LandscapeLeft {
            std::thread::yield_now();
        }
        host.emit(RawOrientation::Device(4));
        drop(dispatch);
        background.join().unwrap();

        assert_eq!(controller.current_orientation(), Orientation::LandscapeRight);
        assert_eq!(*seen.lock(), vec![Orientation::LandscapeRight]);
        assert_eq!(controller.subscribe().get(), Orientation::LandscapeRight);
    }

    #[test]
    fn test_callback_may_clear_itself() {
        let (controller, _host) = controller();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handle = controller.clone();
        controller.set_on_orientation_change(Some(OrientationCallback::structured(move |event| {
            sink.lock().push(event.orientation);
            handle.set_on_orientation_change(None);
        })));

        controller.lock_to_landscape(LandscapeDirection::Right);
        controller.unlock_all_orientations();

        assert_eq!(*seen.lock(), vec![Orientation::LandscapeRight]);
    }

    #[test]
    fn test_lock_sends_mask_hint() {
        let (controller, host) = controller();

        controller.lock_to_portrait(PortraitDirection::Down);
        controller.lock_to_landscape(LandscapeDirection::Left);
        controller.unlock_all_orientations();

        assert_eq!(
            host.mask_history(),
            vec![
                OrientationMask::PORTRAIT_UPSIDE_DOWN,
                OrientationMask::LANDSCAPE_LEFT,
                OrientationMask::ALL
            ]
        );
    }

    #[test]
    fn test_portrait_lock_reports_portrait_up_for_either_direction() {
        let (controller, host) = controller();
        controller.start_orientation_tracking().unwrap();
        host.emit(RawOrientation::Degrees(270));

        controller.lock_to_portrait(PortraitDirection::Down);
        assert_eq!(controller.current_orientation(), Orientation::PortraitUp);
        assert_eq!(controller.locked_orientation(), Some(Orientation::PortraitUp));
        assert_eq!(controller.device_orientation(), Orientation::LandscapeLeft);
    }

    #[test]
    fn test_invalid_landscape_direction_keeps_lock() {
        let (controller, host) = controller();
        controller.lock_to_portrait(PortraitDirection::Up);

        let err = controller.lock_to_landscape_named("up").unwrap_err();

        assert!(matches!(err, OrientationError::InvalidDirection(_)));
        assert_eq!(controller.lock_mode(), LockMode::LockedPortrait { direction: PortraitDirection::Up });
        assert_eq!(host.mask_history().len(), 1);
    }

    #[test]
    fn test_named_portrait_defaults_to_up() {
        let (controller, host) = controller();

        controller.lock_to_portrait_named(None).unwrap();
        assert_eq!(host.last_mask(), Some(OrientationMask::PORTRAIT));

        controller.lock_to_portrait_named(Some("down")).unwrap();
        assert_eq!(host.last_mask(), Some(OrientationMask::PORTRAIT_UPSIDE_DOWN));

        assert!(controller.lock_to_portrait_named(Some("sideways")).is_err());
        assert_eq!(controller.lock_mode(), LockMode::LockedPortrait { direction: PortraitDirection::Down });
    }

    #[test]
    fn test_readings_masked_by_lock_are_silent() {
        let (controller, host) = controller();
        let seen = record_changes(&controller);
        controller.start_orientation_tracking().unwrap();

        controller.lock_to_landscape(LandscapeDirection::Right);
        host.emit(RawOrientation::Device(1));
        host.emit(RawOrientation::Device(3));

        assert_eq!(*seen.lock(), vec![Orientation::LandscapeRight]);
        assert_eq!(controller.current_orientation(), Orientation::LandscapeRight);
    }

    #[test]
    fn test_repeated_lock_command_does_not_refire_change() {
        let (controller, host) = controller();
        let seen = record_changes(&controller);
        controller.start_orientation_tracking().unwrap();
        host.emit(RawOrientation::Device(1));

        controller.lock_to_landscape(LandscapeDirection::Left);
        controller.lock_to_landscape(LandscapeDirection::Left);

        assert_eq!(*seen.lock(), vec![Orientation::LandscapeLeft]);
        assert_eq!(host.mask_history().len(), 2);
    }

    #[test]
    fn test_lock_callback_fires_for_every_command() {
        let (controller, _host) = controller();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        controller.set_on_lock_change(Some(Arc::new(move |event: &LockEvent| sink.lock().push(*event))));

        controller.lock_to_landscape(LandscapeDirection::Right);
        controller.lock_to_landscape(LandscapeDirection::Right);
        controller.unlock_all_orientations();

        let events = events.lock();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].orientation, Some(Orientation::LandscapeRight));
        assert_eq!(events[2], LockEvent { orientation: None, is_locked: false });
    }

    #[test]
    fn test_callback_may_reenter_controller() {
        let (controller, host) = controller();
        controller.start_orientation_tracking().unwrap();
        host.emit(RawOrientation::Device(1));

        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        let handle = controller.clone();
        controller.set_on_orientation_change(Some(OrientationCallback::structured(move |event| {
            sink.lock().push((event.orientation, handle.current_orientation(), handle.is_locked()));
        })));

        controller.lock_to_landscape(LandscapeDirection::Left);

        assert_eq!(
            *observed.lock(),
            vec![(Orientation::LandscapeLeft, Orientation::LandscapeLeft, true)]
        );
    }

    #[test]
    fn test_stop_keeps_lock_and_callbacks() {
        let (controller, host) = controller();
        let seen = record_changes(&controller);
        controller.start_orientation_tracking().unwrap();
        host.emit(RawOrientation::Device(1));
        controller.lock_to_landscape(LandscapeDirection::Left);

        controller.stop_orientation_tracking();
        host.emit(RawOrientation::Device(4));

        assert!(controller.is_locked());
        assert_eq!(controller.device_orientation(), Orientation::PortraitUp);

        controller.unlock_all_orientations();
        assert_eq!(*seen.lock(), vec![Orientation::LandscapeLeft, Orientation::PortraitUp]);
    }

    #[test]
    fn test_subscriber_sees_latest_effective_orientation() {
        let (controller, host) = controller();
        let mut subscriber = controller.subscribe();
        assert_eq!(subscriber.get(), Orientation::PortraitUp);

        controller.start_orientation_tracking().unwrap();
        host.emit(RawOrientation::Device(2));
        assert_eq!(subscriber.next_now(), Orientation::PortraitDown);

        controller.lock_to_portrait(PortraitDirection::Up);
        assert_eq!(subscriber.next_now(), Orientation::PortraitUp);
    }

    #[test]
    fn test_from_config_applies_initial_lock() {
        let host = SimulatedHost::new();
        let config = OrientationConfig {
            initial_lock: InitialLock::LandscapeRight,
            track_on_start: true,
            ..OrientationConfig::default()
        };

        let controller = OrientationController::from_config(Arc::new(host.clone()), &config);

        assert_eq!(controller.current_orientation(), Orientation::LandscapeRight);
        assert_eq!(host.mask_history(), vec![OrientationMask::LANDSCAPE_RIGHT]);
        assert_eq!(controller.tracking_state(), TrackingState::Active);
    }

    #[test]
    fn test_from_config_survives_unavailable_sensor() {
        let host = SimulatedHost::unavailable("no accelerometer");
        let config = OrientationConfig { track_on_start: true, ..OrientationConfig::default() };

        let controller = OrientationController::from_config(Arc::new(host), &config);

        assert_eq!(controller.tracking_state(), TrackingState::Stopped);
        assert!(!controller.is_locked());
    }

    #[test]
    fn test_auto_rotate_status_is_delegated() {
        let (controller, host) = controller();
        let status = AutoRotateStatus { is_auto_rotate_enabled: false, can_detect_orientation: true };
        host.set_auto_rotate_status(status);

        assert_eq!(controller.auto_rotate_status(), status);
    }

    #[test]
    fn test_dropping_last_handle_unsubscribes() {
        let (controller, host) = controller();
        let clone = controller.clone();
        controller.start_orientation_tracking().unwrap();

        drop(controller);
        assert_eq!(host.subscriber_count(), 1);

        drop(clone);
        assert_eq!(host.subscriber_count(), 0);
    }
}
