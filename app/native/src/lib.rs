//! Orientation Lock - screen orientation tracking and locking.
//!
//! The library tracks the device orientation reported by an injected host,
//! lets the application lock the interface to portrait or to one landscape
//! side, and notifies subscribers whenever the effective orientation
//! changes. The binary replays scripted sessions against a simulated host.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use orientation_lock::orientation::{LandscapeDirection, OrientationCallback, OrientationController};
//! use orientation_lock::platform::simulated::SimulatedHost;
//!
//! let controller = OrientationController::new(Arc::new(SimulatedHost::new()));
//! controller.set_on_orientation_change(Some(OrientationCallback::legacy(|token| {
//!     println!("orientation is now {token}");
//! })));
//! controller.lock_to_landscape(LandscapeDirection::Right);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod orientation;
pub mod platform;
pub mod replay;
pub mod schema;

pub use error::OrientationError;
pub use orientation::OrientationController;
