//! Interface-orientation mask handed to the host rotation system.
//!
//! Bit values follow the host's interface-orientation mask layout, where each
//! bit is `1 << interface_orientation`:
//!
//! | Orientation          | Bit  |
//! |----------------------|------|
//! | portrait             | `2`  |
//! | portrait upside down | `4`  |
//! | landscape right      | `8`  |
//! | landscape left       | `16` |

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{LandscapeDirection, LockMode, PortraitDirection};

/// Bitset of orientations the host may rotate its interface to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrientationMask(u32);

impl OrientationMask {
    pub const PORTRAIT: Self = Self(1 << 1);
    pub const PORTRAIT_UPSIDE_DOWN: Self = Self(1 << 2);
    pub const LANDSCAPE_RIGHT: Self = Self(1 << 3);
    pub const LANDSCAPE_LEFT: Self = Self(1 << 4);
    pub const ALL: Self = Self(
        Self::PORTRAIT.0 | Self::PORTRAIT_UPSIDE_DOWN.0 | Self::LANDSCAPE_RIGHT.0 | Self::LANDSCAPE_LEFT.0,
    );

    #[must_use]
    pub const fn bits(self) -> u32 { self.0 }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }

    /// Computes the mask for a lock mode.
    ///
    /// Unlocked allows all four primary orientations, a portrait lock allows
    /// the single portrait bit for its direction and a landscape lock allows
    /// the single bit for its side.
    #[must_use]
    pub const fn for_lock(mode: LockMode) -> Self {
        match mode {
            LockMode::Unlocked => Self::ALL,
            LockMode::LockedPortrait { direction: PortraitDirection::Up } => Self::PORTRAIT,
            LockMode::LockedPortrait { direction: PortraitDirection::Down } => {
                Self::PORTRAIT_UPSIDE_DOWN
            }
            LockMode::LockedLandscape { direction: LandscapeDirection::Left } => {
                Self::LANDSCAPE_LEFT
            }
            LockMode::LockedLandscape { direction: LandscapeDirection::Right } => {
                Self::LANDSCAPE_RIGHT
            }
        }
    }
}

impl fmt::Display for OrientationMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::PORTRAIT, "portrait"),
            (Self::PORTRAIT_UPSIDE_DOWN, "portraitUpsideDown"),
            (Self::LANDSCAPE_RIGHT, "landscapeRight"),
            (Self::LANDSCAPE_LEFT, "landscapeLeft"),
        ];
        let parts: Vec<&str> =
            names.iter().filter(|(bit, _)| self.contains(*bit)).map(|(_, name)| *name).collect();

        if parts.is_empty() {
            write!(f, "none ({})", self.0)
        } else {
            write!(f, "{} ({})", parts.join("|"), self.0)
        }
    }
}
