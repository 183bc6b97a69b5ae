//! Core orientation value types.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::OrientationError;

/// Normalized device attitude.
///
/// Serialized as the SCREAMING_SNAKE tokens exposed to application code
/// (`PORTRAIT_UP`, `LANDSCAPE_LEFT`, ...). Parsing also accepts the older
/// `PORTRAIT` and `PORTRAIT_UPSIDE_DOWN` tokens.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Orientation {
    #[serde(alias = "PORTRAIT")]
    PortraitUp,
    #[serde(alias = "PORTRAIT_UPSIDE_DOWN")]
    PortraitDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
    #[default]
    Unknown,
}

impl Orientation {
    /// All orientations, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::PortraitUp,
        Self::PortraitDown,
        Self::LandscapeLeft,
        Self::LandscapeRight,
        Self::FaceUp,
        Self::FaceDown,
        Self::Unknown,
    ];

    /// Returns the string token for this orientation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PortraitUp => "PORTRAIT_UP",
            Self::PortraitDown => "PORTRAIT_DOWN",
            Self::LandscapeLeft => "LANDSCAPE_LEFT",
            Self::LandscapeRight => "LANDSCAPE_RIGHT",
            Self::FaceUp => "FACE_UP",
            Self::FaceDown => "FACE_DOWN",
            Self::Unknown => "UNKNOWN",
        }
    }

    #[must_use]
    pub const fn is_landscape(self) -> bool {
        matches!(self, Self::LandscapeLeft | Self::LandscapeRight)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Orientation {
    type Err = OrientationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PORTRAIT_UP" | "PORTRAIT" => Ok(Self::PortraitUp),
            "PORTRAIT_DOWN" | "PORTRAIT_UPSIDE_DOWN" => Ok(Self::PortraitDown),
            "LANDSCAPE_LEFT" => Ok(Self::LandscapeLeft),
            "LANDSCAPE_RIGHT" => Ok(Self::LandscapeRight),
            "FACE_UP" => Ok(Self::FaceUp),
            "FACE_DOWN" => Ok(Self::FaceDown),
            "UNKNOWN" => Ok(Self::Unknown),
            _ => Err(OrientationError::InvalidOrientation(s.to_string())),
        }
    }
}

/// Which way up a portrait lock should hold the interface.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum PortraitDirection {
    #[default]
    Up,
    Down,
}

impl FromStr for PortraitDirection {
    type Err = OrientationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" | "upside_down" => Ok(Self::Down),
            _ => Err(OrientationError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for PortraitDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
        })
    }
}

/// Which landscape side a landscape lock should hold the interface on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LandscapeDirection {
    Left,
    Right,
}

impl LandscapeDirection {
    /// The orientation a landscape lock in this direction reports.
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::Left => Orientation::LandscapeLeft,
            Self::Right => Orientation::LandscapeRight,
        }
    }
}

impl FromStr for LandscapeDirection {
    type Err = OrientationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(OrientationError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for LandscapeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// The locking policy owned by the controller.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum LockMode {
    #[default]
    Unlocked,
    /// Portrait lock. The direction only selects the host mask bit; the
    /// reported orientation is always [`Orientation::PortraitUp`].
    LockedPortrait { direction: PortraitDirection },
    LockedLandscape { direction: LandscapeDirection },
}

impl LockMode {
    #[must_use]
    pub const fn is_locked(self) -> bool { !matches!(self, Self::Unlocked) }

    /// The orientation this lock forces, or `None` when unlocked.
    #[must_use]
    pub const fn forced_orientation(self) -> Option<Orientation> {
        match self {
            Self::Unlocked => None,
            Self::LockedPortrait { .. } => Some(Orientation::PortraitUp),
            Self::LockedLandscape { direction } => Some(direction.orientation()),
        }
    }

    /// Applies this lock to a tracked orientation.
    ///
    /// Unlocked passes the reading through unchanged, including
    /// `FACE_UP`, `FACE_DOWN` and `UNKNOWN`.
    #[must_use]
    pub const fn effective(self, tracked: Orientation) -> Orientation {
        match self.forced_orientation() {
            Some(forced) => forced,
            None => tracked,
        }
    }
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlocked => f.write_str("unlocked"),
            Self::LockedPortrait { direction } => write!(f, "portrait ({direction})"),
            Self::LockedLandscape { direction } => write!(f, "landscape ({direction})"),
        }
    }
}

/// Whether the tracker is subscribed to the host sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingState {
    #[default]
    Stopped,
    Active,
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stopped => "stopped",
            Self::Active => "active",
        })
    }
}
