//! Orientation tracking and locking.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    OrientationHost                          │
//! │  (sensor subscription, allowed-orientation mask hint)       │
//! └─────────────────────────────────────────────────────────────┘
//!            │ RawOrientation                     ▲ OrientationMask
//!            ▼                                    │
//! ┌──────────────────────────┐      ┌──────────────────────────────┐
//! │   OrientationTracker     │ ───▶ │   OrientationController      │
//! │  - normalizes readings   │      │  - owns LockMode             │
//! │  - single listener slot  │      │  - effective orientation     │
//! └──────────────────────────┘      │  - change / lock callbacks   │
//!                                   └──────────────────────────────┘
//! ```

pub mod controller;
pub mod mask;
pub mod subscription;
pub mod tracker;
pub mod types;

pub use controller::OrientationController;
pub use mask::OrientationMask;
pub use subscription::{LockCallback, OrientationCallback};
pub use tracker::{OrientationListener, OrientationTracker};
pub use types::{LandscapeDirection, LockMode, Orientation, PortraitDirection, TrackingState};
