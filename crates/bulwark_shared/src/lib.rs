//! # BULWARK Shared
//!
//! Common types used by both client and server.
//!
//! Everything here is plain data: the ground-plane vector type, the bearing
//! helpers every angle in the game goes through, and the reference tuning
//! values.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{
    FIRE_COOLDOWN_SECS, FRAME_TIME, MAX_PLAYERS, MOVEMENT_SPEED, PROJECTILE_SLOTS,
    PROJECTILE_SPEED, PROJECTILE_TTL_SECS, SHIELD_ANGULAR_SPEED, SPAWN_OFFSET, TICK_RATE,
};
pub use math::{bearing_degrees, bearing_to_direction, normalize_degrees, Vec3};
