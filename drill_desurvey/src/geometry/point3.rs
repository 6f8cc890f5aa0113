//! Basic 3D point type used throughout the crate.

use nalgebra::Vector3;

/// Representation of a 3D point in collar grid units (east, north, elevation).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the point displaced by `offset` scaled by `length`.
    pub fn offset(self, offset: &Vector3<f64>, length: f64) -> Self {
        Self::new(
            self.x + offset.x * length,
            self.y + offset.y * length,
            self.z + offset.z * length,
        )
    }

    /// Linear interpolation towards `other`; `ratio` of 0 returns `self`.
    pub fn lerp(self, other: Point3, ratio: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * ratio,
            self.y + (other.y - self.y) * ratio,
            self.z + (other.z - self.z) * ratio,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}
