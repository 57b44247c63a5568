//! 4x4 transformation matrix.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//!
//! Matrices here are always rebuilt from their inputs (origin, frame, scale,
//! projection extents); nothing accumulates incremental products.

use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};

use super::vec3::Vec3;
use super::vec4::Vec4;

/// Two directions closer than this (in `1 - |cos|`) are treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// 4x4 matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        data: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub fn translation(offset: Vec3) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, offset.x],
            [0.0, 1.0, 0.0, offset.y],
            [0.0, 0.0, 1.0, offset.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scaling(scale: Vec3) -> Self {
        Mat4::new([
            [scale.x, 0.0, 0.0, 0.0],
            [0.0, scale.y, 0.0, 0.0],
            [0.0, 0.0, scale.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Counter-clockwise rotation of `angle` radians about `axis` (Rodrigues).
    ///
    /// `axis` need not be normalised. A zero axis yields the identity.
    pub fn rotation_axis_angle(axis: Vec3, angle: f32) -> Self {
        let Some(k) = axis.try_normalize() else {
            return Self::IDENTITY;
        };
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        Mat4::new([
            [
                t * k.x * k.x + c,
                t * k.x * k.y - s * k.z,
                t * k.x * k.z + s * k.y,
                0.0,
            ],
            [
                t * k.x * k.y + s * k.z,
                t * k.y * k.y + c,
                t * k.y * k.z - s * k.x,
                0.0,
            ],
            [
                t * k.x * k.z - s * k.y,
                t * k.y * k.z + s * k.x,
                t * k.z * k.z + c,
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Shortest rotation taking direction `from` onto direction `to`.
    ///
    /// When the two are antiparallel the rotation is half a turn about
    /// `fallback` (made perpendicular to `from` first), so callers choose
    /// which way the frame flips.
    pub fn rotation_between(from: Vec3, to: Vec3, fallback: Vec3) -> Self {
        let (Some(a), Some(b)) = (from.try_normalize(), to.try_normalize()) else {
            return Self::IDENTITY;
        };
        let cos = a.dot(b).clamp(-1.0, 1.0);
        let axis = a.cross(b);
        let sin = axis.magnitude();

        if sin > PARALLEL_EPSILON {
            return Self::rotation_axis_angle(axis, sin.atan2(cos));
        }
        if cos > 0.0 {
            return Self::IDENTITY;
        }

        let perpendicular = (fallback - a * fallback.dot(a))
            .try_normalize()
            .unwrap_or_else(|| any_perpendicular(a));
        Self::rotation_axis_angle(perpendicular, std::f32::consts::PI)
    }

    pub fn transpose(&self) -> Self {
        let mut out = [[0.0f32; 4]; 4];
        for (row, values) in out.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = self.data[col][row];
            }
        }
        Mat4::new(out)
    }

    /// Gauss-Jordan inverse with partial pivoting.
    /// Returns `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Mat4> {
        let mut a = self.data;
        let mut inv = Self::IDENTITY.data;

        for col in 0..4 {
            let pivot = (col..4).max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))?;
            if a[pivot][col].abs() < f32::EPSILON {
                return None;
            }
            a.swap(col, pivot);
            inv.swap(col, pivot);

            let scale = 1.0 / a[col][col];
            for k in 0..4 {
                a[col][k] *= scale;
                inv[col][k] *= scale;
            }

            for row in 0..4 {
                if row == col {
                    continue;
                }
                let factor = a[row][col];
                if factor == 0.0 {
                    continue;
                }
                for k in 0..4 {
                    a[row][k] -= factor * a[col][k];
                    inv[row][k] -= factor * inv[col][k];
                }
            }
        }

        Some(Mat4::new(inv))
    }

    /// Transforms a point (implicit `w = 1`) without a perspective divide.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(p, 1.0)).xyz()
    }

    /// Transforms a direction (implicit `w = 0`); translation is ignored.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(v, 0.0)).xyz()
    }
}

fn any_perpendicular(v: Vec3) -> Vec3 {
    let helper = if v.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    v.cross(helper).normalize()
}

/// For column vectors, `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for (row, values) in result.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = (0..4).map(|k| self.data[row][k] * rhs.data[k][col]).sum();
            }
        }

        Mat4::new(result)
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let row = |r: usize| {
            self.data[r][0] * v.x + self.data[r][1] * v.y + self.data[r][2] * v.z + self.data[r][3] * v.w
        };
        Vec4::new(row(0), row(1), row(2), row(3))
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.data
            .iter()
            .flatten()
            .zip(other.data.iter().flatten())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.data
            .iter()
            .flatten()
            .zip(other.data.iter().flatten())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
