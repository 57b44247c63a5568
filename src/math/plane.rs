//! Oriented plane used for clipping.

use super::vec3::Vec3;

/// A plane through `point` with unit `normal`.
///
/// The normal points into the half-space that is kept: a position is inside
/// when its signed distance is non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    /// Builds a plane, normalising `normal`. Returns `None` for a zero normal.
    pub fn new(point: Vec3, normal: Vec3) -> Option<Self> {
        Some(Self {
            point,
            normal: normal.try_normalize()?,
        })
    }

    pub fn signed_distance(&self, p: Vec3) -> f32 {
        (p - self.point).dot(self.normal)
    }

    pub fn contains(&self, p: Vec3) -> bool {
        self.signed_distance(p) >= 0.0
    }

    /// Parameter `t` in `[0, 1]` at which the segment `a -> b` meets the plane,
    /// given the endpoints' signed distances. The caller guarantees they differ
    /// in sign.
    pub fn crossing(d_a: f32, d_b: f32) -> f32 {
        (d_a / (d_a - d_b)).clamp(0.0, 1.0)
    }

    /// Flips the normal if needed so that `interior` is on the kept side.
    pub fn facing(mut self, interior: Vec3) -> Self {
        if self.signed_distance(interior) < 0.0 {
            self.normal = -self.normal;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn signed_distance_follows_normal() {
        let plane = Plane::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 2.0)).unwrap();
        assert_relative_eq!(plane.signed_distance(Vec3::new(5.0, 5.0, 3.0)), 2.0);
        assert!(!plane.contains(Vec3::ZERO));
        assert!(plane.contains(Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn facing_flips_toward_interior() {
        let plane = Plane::new(Vec3::ZERO, Vec3::X).unwrap().facing(Vec3::NEG_X);
        assert_relative_eq!(plane.normal, Vec3::NEG_X);
    }

    #[test]
    fn crossing_parameter() {
        assert_relative_eq!(Plane::crossing(1.0, -3.0), 0.25);
        assert_relative_eq!(Plane::crossing(-2.0, 2.0), 0.5);
    }
}
