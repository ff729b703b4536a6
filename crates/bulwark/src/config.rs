//! # Combat Configuration
//!
//! Every tuning value the combat core reads, loaded once at startup.
//!
//! ```toml
//! slot_count = 5
//! projectile_speed = 20.0
//! shield_angular_speed = 180.0
//! ```
//!
//! Missing keys fall back to the defaults in `bulwark_shared::constants`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use bulwark_shared::{
    FIRE_COOLDOWN_SECS, FRAME_TIME, MOVEMENT_SPEED, PROJECTILE_SLOTS, PROJECTILE_SPEED,
    PROJECTILE_TTL_SECS, SHIELD_ANGULAR_SPEED, SPAWN_OFFSET,
};

/// Combat tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Locally owned projectiles alive at once.
    pub slot_count: usize,
    /// Projectile speed (units per second).
    pub projectile_speed: f32,
    /// Projectile lifetime (seconds).
    pub projectile_ttl: f32,
    /// Distance in front of the avatar where projectiles spawn.
    pub spawn_offset: f32,
    /// Seconds between shots.
    pub fire_cooldown: f32,
    /// Avatar speed (units per second).
    pub movement_speed: f32,
    /// Stick deflection below which an axis counts as centered.
    pub input_dead_zone: f32,
    /// Shield turn rate (degrees per second).
    pub shield_angular_speed: f32,
    /// Nominal frame time used for the shield snap threshold (seconds).
    pub frame_time: f32,
    /// Capacity of the combat event channel.
    pub event_capacity: usize,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            slot_count: PROJECTILE_SLOTS,
            projectile_speed: PROJECTILE_SPEED,
            projectile_ttl: PROJECTILE_TTL_SECS,
            spawn_offset: SPAWN_OFFSET,
            fire_cooldown: FIRE_COOLDOWN_SECS,
            movement_speed: MOVEMENT_SPEED,
            input_dead_zone: 0.1,
            shield_angular_speed: SHIELD_ANGULAR_SPEED,
            frame_time: FRAME_TIME,
            event_capacity: 256,
        }
    }
}

impl CombatConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`CombatConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!("Loaded combat config from {}", path.display());
        Ok(config)
    }

    /// Checks every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slot_count == 0 {
            return Err(ConfigError::Invalid("slot_count must be at least 1".into()));
        }
        // Slot ids travel as i32
        if i32::try_from(self.slot_count).is_err() {
            return Err(ConfigError::Invalid(format!(
                "slot_count {} does not fit a wire slot id",
                self.slot_count
            )));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid("event_capacity must be at least 1".into()));
        }

        let positive = [
            ("projectile_speed", self.projectile_speed),
            ("movement_speed", self.movement_speed),
            ("shield_angular_speed", self.shield_angular_speed),
            ("frame_time", self.frame_time),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("projectile_ttl", self.projectile_ttl),
            ("spawn_offset", self.spawn_offset),
            ("fire_cooldown", self.fire_cooldown),
            ("input_dead_zone", self.input_dead_zone),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        Ok(())
    }
}
