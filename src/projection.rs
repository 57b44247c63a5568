//! Projection variants.
//!
//! A [`Projection`] only knows how to turn the camera's near-plane window
//! (`width` x `height` at distance `near`) and depth range into a matrix that
//! maps camera space onto the canonical cube `[-1, 1]^3`. Camera space looks
//! down `-Z`; the near plane maps to depth `-1` and the far plane to `+1`.

use crate::math::Mat4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Frustum converging at the camera origin.
    #[default]
    Perspective,
    /// Parallel box; the far window equals the near window.
    Orthogonal,
}

impl Projection {
    /// Camera-space to clip-space matrix.
    pub fn matrix(&self, width: f32, height: f32, near: f32, far: f32) -> Mat4 {
        let depth = far - near;
        match self {
            Projection::Perspective => Mat4::new([
                [2.0 * near / width, 0.0, 0.0, 0.0],
                [0.0, 2.0 * near / height, 0.0, 0.0],
                [0.0, 0.0, -(far + near) / depth, -2.0 * far * near / depth],
                [0.0, 0.0, -1.0, 0.0],
            ]),
            Projection::Orthogonal => Mat4::new([
                [2.0 / width, 0.0, 0.0, 0.0],
                [0.0, 2.0 / height, 0.0, 0.0],
                [0.0, 0.0, -2.0 / depth, -(far + near) / depth],
                [0.0, 0.0, 0.0, 1.0],
            ]),
        }
    }

    /// Size of the far-plane window relative to the near-plane window.
    pub fn far_window_ratio(&self, near: f32, far: f32) -> f32 {
        match self {
            Projection::Perspective => far / near,
            Projection::Orthogonal => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;
    use approx::assert_relative_eq;

    fn ndc(m: Mat4, x: f32, y: f32, z: f32) -> (f32, f32, f32) {
        let p = (m * Vec4::point(x, y, z)).project().unwrap();
        (p.x, p.y, p.z)
    }

    #[test]
    fn perspective_maps_near_and_far_to_cube_faces() {
        let m = Projection::Perspective.matrix(2.0, 1.0, 1.0, 10.0);
        let (x, y, z) = ndc(m, 1.0, 0.5, -1.0);
        assert_relative_eq!(x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(z, -1.0, epsilon = 1e-6);

        let (x, y, z) = ndc(m, -10.0, -5.0, -10.0);
        assert_relative_eq!(x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(y, -1.0, epsilon = 1e-5);
        assert_relative_eq!(z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn perspective_w_is_negated_depth() {
        let m = Projection::Perspective.matrix(1.0, 1.0, 0.5, 50.0);
        assert_relative_eq!((m * Vec4::point(0.0, 0.0, -7.0)).w, 7.0);
    }

    #[test]
    fn orthogonal_keeps_w_one() {
        let m = Projection::Orthogonal.matrix(4.0, 2.0, 1.0, 3.0);
        let clip = m * Vec4::point(2.0, -1.0, -3.0);
        assert_relative_eq!(clip.w, 1.0);
        assert_relative_eq!(clip.x, 1.0);
        assert_relative_eq!(clip.y, -1.0);
        assert_relative_eq!(clip.z, 1.0);
        assert_relative_eq!((m * Vec4::point(0.0, 0.0, -1.0)).z, -1.0);
    }

    #[test]
    fn far_window_ratio() {
        assert_relative_eq!(Projection::Perspective.far_window_ratio(0.5, 100.0), 200.0);
        assert_relative_eq!(Projection::Orthogonal.far_window_ratio(0.5, 100.0), 1.0);
    }
}
