//! Orientation of a hole at a survey station, stored as a unit quaternion.
//!
//! The canonical along-hole direction is horizontal, pointing grid north
//! (`+Y`). A station's orientation first tilts that vector about `+X` by the
//! dip and then swings it about `+Z` by the negated azimuth, so azimuths turn
//! clockwise from north when viewed from above.

use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};

/// Along-hole reference direction before any rotation.
pub fn along_hole() -> Vector3<f64> {
    Vector3::new(0.0, 1.0, 0.0)
}

/// Unit quaternion rotating [`along_hole`] onto the hole direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation(UnitQuaternion<f64>);

impl Orientation {
    pub fn quaternion(&self) -> &Quaternion<f64> {
        self.0.quaternion()
    }

    /// Component-wise dot product of the two quaternions.
    pub fn dot(&self, other: &Orientation) -> f64 {
        self.0.coords.dot(&other.0.coords)
    }

    /// The same rotation expressed with all four components negated.
    pub fn negated(&self) -> Self {
        Self(UnitQuaternion::new_unchecked(-self.0.into_inner()))
    }

    /// Unit direction of the hole.
    pub fn direction(&self) -> Vector3<f64> {
        self.0.transform_vector(&along_hole())
    }
}

/// Dip that points straight down under the given sign convention.
pub fn vertical_dip(down_dip_negative: bool) -> f64 {
    if down_dip_negative {
        -90.0
    } else {
        90.0
    }
}

/// Builds the orientation for an azimuth and dip given in degrees.
pub fn orientation_for(azimuth_deg: f64, dip_deg: f64, down_dip_negative: bool) -> Orientation {
    let dip = if down_dip_negative { dip_deg } else { -dip_deg };
    let q_dip = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), dip.to_radians());
    let q_az = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -azimuth_deg.to_radians());
    // azimuth after dip
    let q = q_az * q_dip;
    Orientation(UnitQuaternion::new_normalize(q.into_inner()))
}

/// Flips signs so each orientation lies in the same hemisphere as the
/// corrected one before it. Applied in order; the first is left untouched.
pub fn enforce_continuity(orientations: &mut [Orientation]) {
    for j in 1..orientations.len() {
        if orientations[j - 1].dot(&orientations[j]) < 0.0 {
            orientations[j] = orientations[j].negated();
        }
    }
}

/// Spherical linear interpolation from `q0` (t = 0) to `q1` (t = 1).
///
/// No hemisphere check is made; callers pass continuity-corrected pairs.
pub fn slerp(q0: &Orientation, q1: &Orientation, t: f64) -> Orientation {
    if t <= 0.0 {
        return *q0;
    }
    if t >= 1.0 {
        return *q1;
    }
    let a = q0.0.coords;
    let b = q1.0.coords;
    let cos_theta = a.dot(&b).clamp(-1.0, 1.0);
    let coords = if cos_theta > 1.0 - 1e-12 {
        // nearly parallel, fall back to normalized lerp
        a * (1.0 - t) + b * t
    } else {
        let theta = cos_theta.acos();
        let sin_theta = theta.sin();
        a * (((1.0 - t) * theta).sin() / sin_theta) + b * ((t * theta).sin() / sin_theta)
    };
    let unit = Unit::new_normalize(coords);
    Orientation(UnitQuaternion::new_unchecked(Quaternion::from(unit.into_inner())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_dir(v: Vector3<f64>, x: f64, y: f64, z: f64) {
        assert!((v.x - x).abs() < 1e-9, "x {} != {}", v.x, x);
        assert!((v.y - y).abs() < 1e-9, "y {} != {}", v.y, y);
        assert!((v.z - z).abs() < 1e-9, "z {} != {}", v.z, z);
    }

    #[test]
    fn vertical_down_both_conventions() {
        let neg = orientation_for(0.0, vertical_dip(true), true);
        assert_dir(neg.direction(), 0.0, 0.0, -1.0);
        let pos = orientation_for(0.0, vertical_dip(false), false);
        assert_dir(pos.direction(), 0.0, 0.0, -1.0);
    }

    #[test]
    fn azimuth_turns_clockwise_from_north() {
        assert_dir(orientation_for(0.0, 0.0, true).direction(), 0.0, 1.0, 0.0);
        assert_dir(orientation_for(90.0, 0.0, true).direction(), 1.0, 0.0, 0.0);
        assert_dir(orientation_for(180.0, 0.0, true).direction(), 0.0, -1.0, 0.0);
        assert_dir(orientation_for(270.0, 0.0, true).direction(), -1.0, 0.0, 0.0);
    }

    #[test]
    fn inclined_hole_east_and_down() {
        let s = 60f64.to_radians().sin();
        let c = 60f64.to_radians().cos();
        assert_dir(orientation_for(90.0, -60.0, true).direction(), c, 0.0, -s);
        assert_dir(orientation_for(90.0, 60.0, false).direction(), c, 0.0, -s);
    }

    #[test]
    fn orientation_is_unit() {
        let q = orientation_for(123.4, -56.7, true);
        assert!((q.quaternion().norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn continuity_across_north() {
        let mut qs = vec![
            orientation_for(359.0, -60.0, true),
            orientation_for(1.0, -60.0, true),
        ];
        assert!(qs[0].dot(&qs[1]) < 0.0);
        enforce_continuity(&mut qs);
        assert!(qs[0].dot(&qs[1]) >= 0.0);
        // halfway between 359 and 1 is north, not south
        let mid = slerp(&qs[0], &qs[1], 0.5).direction();
        assert!(mid.y > 0.0);
        assert!(mid.x.abs() < 1e-9);
    }

    #[test]
    fn continuity_uses_corrected_predecessor() {
        let mut qs = vec![
            orientation_for(358.0, -60.0, true),
            orientation_for(2.0, -60.0, true),
            orientation_for(4.0, -60.0, true),
        ];
        enforce_continuity(&mut qs);
        assert!(qs[0].dot(&qs[1]) >= 0.0);
        assert!(qs[1].dot(&qs[2]) >= 0.0);
        // second was flipped, so the third is compared against the flipped one
        assert!(qs[1].dot(&orientation_for(2.0, -60.0, true)) < 0.0);
    }

    #[test]
    fn slerp_endpoints() {
        let a = orientation_for(10.0, -80.0, true);
        let b = orientation_for(40.0, -50.0, true);
        assert_eq!(slerp(&a, &b, 0.0), a);
        assert_eq!(slerp(&a, &b, 1.0), b);
        let mid = slerp(&a, &b, 0.5);
        assert!((mid.quaternion().norm() - 1.0).abs() < 1e-12);
        assert!((mid.dot(&a) - mid.dot(&b)).abs() < 1e-9);
    }

    #[test]
    fn slerp_identical() {
        let a = orientation_for(45.0, -70.0, true);
        let m = slerp(&a, &a, 0.3);
        assert!((m.dot(&a) - 1.0).abs() < 1e-12);
    }
}
