//! # Avatar
//!
//! The player's body: where it is, where it shoots, and when it may shoot
//! again.
//!
//! ## Fire Direction
//!
//! Each stick axis past the dead zone contributes its sign, so the avatar
//! shoots in one of eight directions. A centered stick keeps the last
//! direction; a fresh avatar shoots along +Z.

use bulwark_shared::Vec3;

use crate::config::CombatConfig;
use crate::error::CombatResult;
use crate::projectiles::{ProjectileManager, SlotId};

/// A player avatar.
#[derive(Clone, Debug)]
pub struct Avatar {
    /// World position.
    position: Vec3,
    /// Velocity from the last update.
    velocity: Vec3,
    /// Unit fire direction in the ground plane.
    fire_direction: Vec3,
    /// Seconds until the next shot is allowed.
    cooldown_remaining: f32,
    movement_speed: f32,
    dead_zone: f32,
    fire_cooldown: f32,
    spawn_offset: f32,
}

impl Avatar {
    /// Creates an avatar at `position`, ready to fire along +Z.
    #[must_use]
    pub fn new(position: Vec3, config: &CombatConfig) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            fire_direction: Vec3::Z,
            cooldown_remaining: 0.0,
            movement_speed: config.movement_speed,
            dead_zone: config.input_dead_zone,
            fire_cooldown: config.fire_cooldown,
            spawn_offset: config.spawn_offset,
        }
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Velocity applied by the last update.
    #[inline]
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Direction the next shot will take.
    #[inline]
    #[must_use]
    pub const fn fire_direction(&self) -> Vec3 {
        self.fire_direction
    }

    /// Returns true if the cooldown has elapsed.
    #[inline]
    #[must_use]
    pub fn can_fire(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    /// Where the next projectile will appear.
    #[must_use]
    pub fn spawn_point(&self) -> Vec3 {
        self.position + self.fire_direction * self.spawn_offset
    }

    /// Applies one tick of stick input `(x, z)`.
    pub fn update(&mut self, dt: f32, (x, z): (f32, f32)) {
        self.velocity = Vec3::new(x, 0.0, z) * self.movement_speed;
        self.position = self.position + self.velocity * dt;

        let sign = |value: f32| {
            if value.abs() > self.dead_zone {
                value.signum()
            } else {
                0.0
            }
        };
        let aim = Vec3::new(sign(x), 0.0, sign(z));
        if aim != Vec3::ZERO {
            self.fire_direction = aim.normalized();
        }

        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
    }

    /// Fires through `projectiles` if the cooldown allows.
    ///
    /// Returns `Ok(None)` while cooling down. The cooldown only starts when
    /// a projectile was actually created.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::CombatError::Full`] from the manager.
    pub fn fire(&mut self, projectiles: &mut ProjectileManager) -> CombatResult<Option<SlotId>> {
        if !self.can_fire() {
            return Ok(None);
        }
        let slot_id = projectiles.fire(self.fire_direction, self.spawn_point())?;
        self.cooldown_remaining = self.fire_cooldown;
        Ok(Some(slot_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CombatError;
    use crate::integration::EventChannel;

    fn setup() -> (Avatar, ProjectileManager, EventChannel<crate::CombatEvent>) {
        let config = CombatConfig::default();
        let events = EventChannel::new(64);
        let manager = ProjectileManager::new(&config, events.publisher());
        (Avatar::new(Vec3::ZERO, &config), manager, events)
    }

    #[test]
    fn test_default_fire_direction_is_forward() {
        let (avatar, _, _) = setup();
        assert_eq!(avatar.fire_direction(), Vec3::Z);
        assert_eq!(avatar.spawn_point(), Vec3::new(0.0, 0.0, 7.0));
    }

    #[test]
    fn test_dead_zone_keeps_last_direction() {
        let (mut avatar, _, _) = setup();
        avatar.update(0.0, (1.0, 0.0));
        assert_eq!(avatar.fire_direction(), Vec3::X);

        avatar.update(0.0, (0.05, -0.09));
        assert_eq!(avatar.fire_direction(), Vec3::X);

        avatar.update(0.0, (-0.5, -0.3));
        let d = avatar.fire_direction();
        assert!((d.x + std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
        assert!((d.z + std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn test_movement() {
        let (mut avatar, _, _) = setup();
        avatar.update(0.5, (0.0, -1.0));
        assert_eq!(avatar.velocity(), Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(avatar.position(), Vec3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn test_cooldown_blocks_second_shot() {
        let (mut avatar, mut manager, _) = setup();
        assert_eq!(avatar.fire(&mut manager), Ok(Some(0)));
        assert_eq!(avatar.fire(&mut manager), Ok(None));

        avatar.update(0.5, (0.0, 0.0));
        assert_eq!(avatar.fire(&mut manager), Ok(None));
        avatar.update(0.5, (0.0, 0.0));
        assert_eq!(avatar.fire(&mut manager), Ok(Some(1)));
    }

    #[test]
    fn test_full_rejection_does_not_start_cooldown() {
        let config = CombatConfig {
            slot_count: 1,
            ..CombatConfig::default()
        };
        let events = EventChannel::new(8);
        let mut manager = ProjectileManager::new(&config, events.publisher());
        let mut avatar = Avatar::new(Vec3::ZERO, &config);

        avatar.fire(&mut manager).unwrap();
        avatar.update(1.0, (0.0, 0.0));
        assert_eq!(avatar.fire(&mut manager), Err(CombatError::Full { capacity: 1 }));
        assert!(avatar.can_fire());

        manager.destroy(0);
        assert_eq!(avatar.fire(&mut manager), Ok(Some(0)));
    }
}
