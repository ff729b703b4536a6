//! # Tuning Constants
//!
//! Reference values for a duel. These are the defaults the configuration
//! layer falls back to; a config file can override every one of them.

// =============================================================================
// SIMULATION
// =============================================================================

/// Tick rate (updates per second)
pub const TICK_RATE: u32 = 60;

/// Fixed simulation step in seconds (1 / `TICK_RATE`)
pub const FRAME_TIME: f32 = 1.0 / 60.0;

// =============================================================================
// PROJECTILES
// =============================================================================

/// Number of projectile slots each client owns
pub const PROJECTILE_SLOTS: usize = 5;

/// Projectile travel speed (world units per second)
pub const PROJECTILE_SPEED: f32 = 20.0;

/// Seconds a projectile lives before it expires
pub const PROJECTILE_TTL_SECS: f32 = 5.0;

/// Distance from the avatar at which projectiles spawn
pub const SPAWN_OFFSET: f32 = 7.0;

/// Minimum seconds between two shots
pub const FIRE_COOLDOWN_SECS: f32 = 1.0;

// =============================================================================
// AVATAR
// =============================================================================

/// Avatar movement speed (world units per second)
pub const MOVEMENT_SPEED: f32 = 10.0;

/// Shield rotation speed (degrees per second)
pub const SHIELD_ANGULAR_SPEED: f32 = 180.0;

// =============================================================================
// LOBBY
// =============================================================================

/// Maximum players the relay server admits
pub const MAX_PLAYERS: usize = 4;
