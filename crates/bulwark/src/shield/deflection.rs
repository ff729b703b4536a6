//! # Shield Deflection
//!
//! Decides what a shield does to a projectile that touches it.
//!
//! ## Bands
//!
//! Everything is measured by how far the two bearings are from being
//! exactly opposed (`off`, in degrees):
//!
//! ```text
//!   off:   0 ─────── 22.5 ─────────── 67.5 ────────────── 180
//!          │ head-on  │     oblique     │   not blocked     │
//!          │ reverse  │  rotate ±90°    │   destroy         │
//! ```
//!
//! A projectile reflects at most once. A second shield contact destroys it.

use bulwark_shared::{bearing_degrees, Vec3};

/// Widest `off` angle that still counts as a head-on hit.
pub const HEAD_ON_TOLERANCE: f32 = 22.5;

/// Widest `off` angle the shield blocks at all.
pub const BLOCK_TOLERANCE: f32 = 67.5;

/// What a shield contact does to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeflectionOutcome {
    /// Not blocked, or already reflected once.
    Destroy,
    /// Sent straight back.
    HeadOn,
    /// Turned 90° clockwise (bearing + 90).
    Clockwise,
    /// Turned 90° counter-clockwise (bearing - 90).
    CounterClockwise,
}

impl DeflectionOutcome {
    /// Returns true if the projectile survives the contact.
    #[inline]
    #[must_use]
    pub const fn is_reflection(self) -> bool {
        !matches!(self, Self::Destroy)
    }

    /// Applies the outcome to a velocity. `None` means the projectile dies.
    #[must_use]
    pub fn apply(self, velocity: Vec3) -> Option<Vec3> {
        match self {
            Self::Destroy => None,
            Self::HeadOn => Some(-velocity),
            Self::Clockwise => Some(velocity.rotated_clockwise()),
            Self::CounterClockwise => Some(velocity.rotated_counter_clockwise()),
        }
    }
}

/// Classifies a contact between a projectile heading and a shield facing,
/// both bearings in [0, 360).
#[must_use]
pub fn classify(projectile_bearing: f32, shield_facing: f32) -> DeflectionOutcome {
    let angle_diff = (projectile_bearing - shield_facing).abs();
    let off = (angle_diff - 180.0).abs();

    if off > BLOCK_TOLERANCE {
        DeflectionOutcome::Destroy
    } else if off <= HEAD_ON_TOLERANCE {
        DeflectionOutcome::HeadOn
    } else if (angle_diff > 180.0) == (projectile_bearing > shield_facing) {
        DeflectionOutcome::Clockwise
    } else {
        DeflectionOutcome::CounterClockwise
    }
}

/// Resolves a shield contact for a projectile moving at `velocity`.
///
/// `already_resolved` is the projectile's one-shot flag; when set the
/// result is always [`DeflectionOutcome::Destroy`].
#[must_use]
pub fn resolve(velocity: Vec3, shield_facing: f32, already_resolved: bool) -> DeflectionOutcome {
    if already_resolved {
        return DeflectionOutcome::Destroy;
    }
    classify(bearing_degrees(velocity), shield_facing)
}
