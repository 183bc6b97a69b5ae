//! Callback shapes accepted by the controller.
//!
//! Two payload shapes exist for orientation changes. The structured form is
//! canonical and receives the full [`OrientationEvent`]; the legacy form
//! receives only the orientation token (`"LANDSCAPE_LEFT"`, ...). Both are
//! fed from the same transition, so switching shapes never changes when a
//! callback fires.

use std::fmt;
use std::sync::Arc;

use crate::events::{LockEvent, OrientationEvent};

/// The single orientation-change subscriber.
#[derive(Clone)]
pub enum OrientationCallback {
    Structured(Arc<dyn Fn(&OrientationEvent) + Send + Sync>),
    Legacy(Arc<dyn Fn(&str) + Send + Sync>),
}

impl OrientationCallback {
    /// Wraps a callback that receives the structured payload.
    pub fn structured<F>(callback: F) -> Self
    where F: Fn(&OrientationEvent) + Send + Sync + 'static {
        Self::Structured(Arc::new(callback))
    }

    /// Wraps a callback that receives the bare orientation token.
    pub fn legacy<F>(callback: F) -> Self
    where F: Fn(&str) + Send + Sync + 'static {
        Self::Legacy(Arc::new(callback))
    }

    pub(crate) fn invoke(&self, event: &OrientationEvent) {
        match self {
            Self::Structured(callback) => callback(event),
            Self::Legacy(callback) => callback(event.orientation.as_str()),
        }
    }
}

impl fmt::Debug for OrientationCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured(_) => f.write_str("OrientationCallback::Structured"),
            Self::Legacy(_) => f.write_str("OrientationCallback::Legacy"),
        }
    }
}

/// Subscriber for lock policy changes.
pub type LockCallback = Arc<dyn Fn(&LockEvent) + Send + Sync>;
