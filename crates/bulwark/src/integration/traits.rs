//! # Integration Traits
//!
//! What the combat core needs from the engine around it.
//!
//! ```text
//! Engine provides:         Combat core consumes:
//! ┌──────────────────┐     ┌──────────────────────────┐
//! │ impl InputSource │ ──► │ ClientSimulation::tick   │
//! │ impl Clock       │ ──► │ (driver picks Δt)        │
//! │ impl Transport   │ ◄── │ outgoing frames          │
//! └──────────────────┘     └──────────────────────────┘
//! ```

use crate::shield::DirectionalFlags;

/// Per-tick player intent.
pub trait InputSource {
    /// Four-way shield intent.
    fn directional_flags(&self) -> DirectionalFlags;

    /// Movement stick as (x, z), each in [-1, 1]. Up on the stick is +z.
    fn movement_axes(&self) -> (f32, f32);

    /// True while the fire button is held.
    fn fire_requested(&self) -> bool;
}

/// Source of simulation time.
pub trait Clock {
    /// Seconds since the previous tick.
    fn delta_time(&self) -> f32;

    /// Nominal seconds per tick.
    fn fixed_delta_time(&self) -> f32;
}

/// A captured input snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputFrame {
    /// Shield intent.
    pub shield: DirectionalFlags,
    /// Movement stick (x, z).
    pub movement: (f32, f32),
    /// Fire held.
    pub fire: bool,
}

impl InputFrame {
    /// No input at all.
    pub const IDLE: Self = Self {
        shield: DirectionalFlags::NONE,
        movement: (0.0, 0.0),
        fire: false,
    };

    /// Idle except for the fire button.
    #[must_use]
    pub const fn firing() -> Self {
        Self {
            fire: true,
            ..Self::IDLE
        }
    }
}

impl InputSource for InputFrame {
    fn directional_flags(&self) -> DirectionalFlags {
        self.shield
    }

    fn movement_axes(&self) -> (f32, f32) {
        self.movement
    }

    fn fire_requested(&self) -> bool {
        self.fire
    }
}
