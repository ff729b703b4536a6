//! # Shield Orientation
//!
//! Turns four-way directional intent into a smoothly turning facing.
//!
//! ## State Machine
//!
//! ```text
//!   flags ──► target (only on a clean, non-conflicting press)
//!                │
//!   tick(Δt) ───►│ |current − target| ≤ 2·speed·frame_time ? snap
//!                │                                         : step speed·Δt
//!                │ (a step never carries past the target)
//!                ▼
//!             current
//! ```

use bulwark_shared::{bearing_degrees, normalize_degrees, Vec3};

/// Four-way directional intent for the shield.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionalFlags {
    /// Toward +Z.
    pub up: bool,
    /// Toward -Z.
    pub down: bool,
    /// Toward -X.
    pub left: bool,
    /// Toward +X.
    pub right: bool,
}

impl DirectionalFlags {
    /// Nothing pressed.
    pub const NONE: Self = Self::new(false, false, false, false);

    /// Creates flags from the four buttons.
    #[must_use]
    pub const fn new(up: bool, down: bool, left: bool, right: bool) -> Self {
        Self {
            up,
            down,
            left,
            right,
        }
    }

    /// Bearing the flags point at.
    ///
    /// `None` when nothing is pressed or an axis has both directions held.
    #[must_use]
    pub fn target_bearing(self) -> Option<f32> {
        if (self.up && self.down) || (self.left && self.right) {
            return None;
        }
        let dx = f32::from(u8::from(self.right)) - f32::from(u8::from(self.left));
        let dz = f32::from(u8::from(self.up)) - f32::from(u8::from(self.down));
        if dx == 0.0 && dz == 0.0 {
            return None;
        }
        Some(bearing_degrees(Vec3::new(dx, 0.0, dz)))
    }
}

/// Interpolating shield facing.
#[derive(Clone, Debug)]
pub struct ShieldController {
    /// Facing now, degrees in [0, 360).
    current: f32,
    /// Facing being turned toward.
    target: f32,
    /// Degrees per second.
    angular_speed: f32,
    /// Snap distance in degrees.
    snap_threshold: f32,
}

impl ShieldController {
    /// Creates a controller facing bearing 0.
    #[must_use]
    pub fn new(angular_speed: f32, frame_time: f32) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            angular_speed,
            snap_threshold: 2.0 * angular_speed * frame_time,
        }
    }

    /// Starts facing `bearing` with nothing left to turn.
    #[must_use]
    pub fn facing(mut self, bearing: f32) -> Self {
        self.current = normalize_degrees(bearing);
        self.target = self.current;
        self
    }

    /// Current facing.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Target facing.
    #[inline]
    #[must_use]
    pub const fn target(&self) -> f32 {
        self.target
    }

    /// Distance within which the next update lands exactly on target.
    #[inline]
    #[must_use]
    pub const fn snap_threshold(&self) -> f32 {
        self.snap_threshold
    }

    /// Takes this tick's intent. Conflicting or empty intent keeps the old
    /// target.
    pub fn set_input(&mut self, flags: DirectionalFlags) {
        if let Some(target) = flags.target_bearing() {
            self.target = target;
        }
    }

    /// Advances by `dt` seconds. Returns the new facing if it moved.
    pub fn update(&mut self, dt: f32) -> Option<f32> {
        let previous = self.current;
        let distance = (self.current - self.target).abs();

        if distance <= self.snap_threshold {
            self.current = self.target;
        } else {
            let arc = distance.min(360.0 - distance);
            let step = self.angular_speed * dt;
            if step >= arc {
                self.current = self.target;
            } else {
                let sign = if (self.current > self.target) == (distance > 180.0) {
                    1.0
                } else {
                    -1.0
                };
                self.current = normalize_degrees(self.current + sign * step);
            }
        }

        #[allow(clippy::float_cmp)]
        let moved = self.current != previous;
        moved.then_some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_shared::FRAME_TIME;

    fn controller() -> ShieldController {
        ShieldController::new(180.0, FRAME_TIME)
    }

    #[test]
    fn test_flag_bearings() {
        let up = DirectionalFlags::new(true, false, false, false);
        let down = DirectionalFlags::new(false, true, false, false);
        let left = DirectionalFlags::new(false, false, true, false);
        let right = DirectionalFlags::new(false, false, false, true);
        let up_right = DirectionalFlags::new(true, false, false, true);

        assert!((right.target_bearing().unwrap() - 0.0).abs() < 1e-4);
        assert!((down.target_bearing().unwrap() - 90.0).abs() < 1e-4);
        assert!((left.target_bearing().unwrap() - 180.0).abs() < 1e-4);
        assert!((up.target_bearing().unwrap() - 270.0).abs() < 1e-4);
        assert!((up_right.target_bearing().unwrap() - 315.0).abs() < 1e-4);
    }

    #[test]
    fn test_conflicting_or_empty_flags_keep_target() {
        let mut shield = controller();
        shield.set_input(DirectionalFlags::new(false, true, false, false));
        assert!((shield.target() - 90.0).abs() < 1e-4);

        shield.set_input(DirectionalFlags::new(true, true, false, false));
        shield.set_input(DirectionalFlags::new(false, false, true, true));
        shield.set_input(DirectionalFlags::new(true, true, true, true));
        shield.set_input(DirectionalFlags::NONE);
        assert!((shield.target() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_snap_threshold() {
        let shield = controller();
        assert!((shield.snap_threshold() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_snaps_exactly_within_threshold() {
        let mut shield = controller().facing(84.5);
        shield.set_input(DirectionalFlags::new(false, true, false, false));
        let target = shield.target();

        assert_eq!(shield.update(FRAME_TIME), Some(target));
        assert_eq!(shield.current().to_bits(), target.to_bits());
        // Already there: nothing moves
        assert_eq!(shield.update(FRAME_TIME), None);
    }

    #[test]
    fn test_steps_at_angular_speed() {
        let mut shield = controller();
        shield.set_input(DirectionalFlags::new(false, true, false, false));

        let step = 180.0 * FRAME_TIME;
        shield.update(FRAME_TIME);
        assert!((shield.current() - step).abs() < 1e-4);
    }

    #[test]
    fn test_turns_the_short_way_across_zero() {
        // 350 → 10: the short way is up through 360
        let mut shield = controller().facing(350.0);
        shield.target = 10.0;
        shield.update(FRAME_TIME);
        assert!((shield.current() - 353.0).abs() < 1e-3);

        // 10 → 350: the short way is down through 0
        let mut shield = controller().facing(10.0);
        shield.target = 350.0;
        shield.update(FRAME_TIME);
        assert!((shield.current() - 7.0).abs() < 1e-3);
    }

    #[test]
    fn test_long_frames_land_on_target() {
        // 0.1 s steps are 18 degrees, three times the snap threshold
        let mut shield = controller();
        shield.target = 10.0;
        assert_eq!(shield.update(0.1), Some(10.0));
        for _ in 0..8 {
            assert_eq!(shield.update(0.1), None);
        }

        let mut shield = controller().facing(355.0);
        shield.set_input(DirectionalFlags::new(false, true, false, false));
        let mut seen = Vec::new();
        for _ in 0..10 {
            shield.update(0.1);
            seen.push(shield.current());
        }
        let target = shield.target();
        assert_eq!(seen.last().map(|a| a.to_bits()), Some(target.to_bits()));
        // Approaches across zero without swinging past the target
        assert!(seen.iter().all(|&a| a <= target || a >= 355.0));
    }

    #[test]
    fn test_reaches_target_and_stays() {
        let mut shield = controller();
        shield.set_input(DirectionalFlags::new(true, false, true, false));
        let target = shield.target();

        for _ in 0..120 {
            shield.update(FRAME_TIME);
        }
        assert_eq!(shield.current().to_bits(), target.to_bits());
        assert!(shield.current() >= 0.0 && shield.current() < 360.0);
    }
}
