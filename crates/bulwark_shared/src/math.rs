//! Mathematical types shared between client and server.
//!
//! ## Bearings
//!
//! Every angle in the game is a *bearing*: degrees from the +X axis,
//! increasing clockwise when viewed from above, in `[0, 360)`.
//!
//! ```text
//!              +Z (270°)
//!                 │
//!   -X (180°) ────┼──── +X (0°)
//!                 │
//!              -Z (90°)
//! ```
//!
//! The ground plane is (x, z). The y component rides along untouched.

/// 3D Vector - position, velocity, direction
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit X vector
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Z vector ("forward")
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON {
            Self::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    /// Rotates 90° clockwise in the ground plane (bearing + 90).
    #[must_use]
    pub fn rotated_clockwise(self) -> Self {
        Self::new(self.z, self.y, -self.x)
    }

    /// Rotates 90° counter-clockwise in the ground plane (bearing - 90).
    #[must_use]
    pub fn rotated_counter_clockwise(self) -> Self {
        Self::new(-self.z, self.y, self.x)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped + 0.0
    }
}

/// Bearing of a ground-plane vector in degrees.
///
/// A zero vector has bearing 0.
#[must_use]
pub fn bearing_degrees(v: Vec3) -> f32 {
    normalize_degrees(-v.z.atan2(v.x).to_degrees())
}

/// Unit ground-plane vector pointing along `bearing` degrees.
#[must_use]
pub fn bearing_to_direction(bearing: f32) -> Vec3 {
    let radians = bearing.to_radians();
    Vec3::new(radians.cos(), 0.0, -radians.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0); // 1*4 + 2*5 + 3*6
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn test_normalized_zero_stays_zero() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
        assert!(approx(Vec3::new(3.0, 0.0, 4.0).normalized().length(), 1.0));
    }

    #[test]
    fn test_bearing_axes() {
        assert!(approx(bearing_degrees(Vec3::X), 0.0));
        assert!(approx(bearing_degrees(Vec3::new(0.0, 0.0, -1.0)), 90.0));
        assert!(approx(bearing_degrees(Vec3::new(-1.0, 0.0, 0.0)), 180.0));
        assert!(approx(bearing_degrees(Vec3::Z), 270.0));
        assert_eq!(bearing_degrees(Vec3::ZERO), 0.0);
    }

    #[test]
    fn test_bearing_direction_roundtrip() {
        for bearing in [0.0_f32, 45.0, 130.0, 170.0, 225.0, 359.0] {
            let back = bearing_degrees(bearing_to_direction(bearing));
            assert!(approx(back, bearing), "{bearing} came back as {back}");
        }
    }

    #[test]
    fn test_rotations_shift_bearing() {
        let v = bearing_to_direction(130.0);
        assert!(approx(bearing_degrees(v.rotated_clockwise()), 220.0));
        assert!(approx(bearing_degrees(v.rotated_counter_clockwise()), 40.0));
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert!(normalize_degrees(-1e-7) < 360.0);
        assert!(normalize_degrees(-0.0).is_sign_positive());
    }
}
