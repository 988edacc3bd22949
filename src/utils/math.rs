//! # Movement Mathematics
//!
//! Fractional world positions and yaw arithmetic.

use serde::{Deserialize, Serialize};

/// A point in continuous world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPos {
    /// Creates a new world position.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Straight-line distance to another point.
    pub fn distance(self, other: WorldPos) -> f64 {
        let d = other - self;
        (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
    }

    /// Distance ignoring the vertical axis.
    pub fn horizontal_distance(self, other: WorldPos) -> f64 {
        let d = other - self;
        (d.x * d.x + d.z * d.z).sqrt()
    }
}

impl std::ops::Sub for WorldPos {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl std::ops::Add for WorldPos {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

/// Wraps an angle in degrees into `(-180, 180]`.
///
/// # Examples
///
/// ```
/// use voxpath::wrap_degrees;
///
/// assert_eq!(wrap_degrees(190.0), -170.0);
/// assert_eq!(wrap_degrees(-180.0), 180.0);
/// assert_eq!(wrap_degrees(540.0), 180.0);
/// ```
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Yaw in degrees that faces along the horizontal vector `(dx, dz)`.
///
/// Yaw 0 faces `+z` and yaw 90 faces `-x`.
pub fn yaw_towards(dx: f64, dz: f64) -> f64 {
    wrap_degrees(dz.atan2(dx).to_degrees() - 90.0)
}

/// Unit horizontal vector `(x, z)` the given yaw faces along.
pub fn facing_vector(yaw: f64) -> (f64, f64) {
    let radians = yaw.to_radians();
    (-radians.sin(), radians.cos())
}
