//! Two-stage clipping from world space to normalized device coordinates.
//!
//! Stage one clips against the camera frustum in world space, so nothing
//! behind the eye ever reaches the perspective divide. The survivors are
//! multiplied by the world-to-screen matrix and divided by `w`. Stage two
//! clips against the canonical cube `[-1, 1]^3` to remove whatever rounding
//! pushed slightly outside.
//!
//! Texture coordinates `(u, v, 1)` are divided by the same `w` as the
//! position. The result `(u/w, v/w, 1/w)` varies linearly across the screen,
//! which is what perspective-correct interpolation needs.

use crate::camera::Camera;
use crate::math::{Mat4, Plane, Vec3, Vec4};

use super::primitive::{
    clip_segment_against, clip_triangle_against, ClipTriangle, ClipVertex, Segment,
};

/// Inward-facing planes of the NDC cube.
pub const CANONICAL_CUBE: [Plane; 6] = [
    Plane {
        point: Vec3::new(-1.0, -1.0, -1.0),
        normal: Vec3::Z,
    },
    Plane {
        point: Vec3::new(1.0, 1.0, 1.0),
        normal: Vec3::NEG_Z,
    },
    Plane {
        point: Vec3::new(-1.0, -1.0, -1.0),
        normal: Vec3::X,
    },
    Plane {
        point: Vec3::new(1.0, 1.0, 1.0),
        normal: Vec3::NEG_X,
    },
    Plane {
        point: Vec3::new(1.0, 1.0, 1.0),
        normal: Vec3::NEG_Y,
    },
    Plane {
        point: Vec3::new(-1.0, -1.0, -1.0),
        normal: Vec3::Y,
    },
];

/// Clips and projects world-space primitives for one camera.
#[derive(Clone, Copy, Debug)]
pub struct ClipPipeline<'a> {
    frustum: &'a [Plane; 6],
    world_to_screen: &'a Mat4,
}

impl<'a> ClipPipeline<'a> {
    pub fn new(camera: &'a Camera) -> Self {
        Self::from_parts(camera.clip_planes(), camera.world_to_screen())
    }

    pub fn from_parts(frustum: &'a [Plane; 6], world_to_screen: &'a Mat4) -> Self {
        Self {
            frustum,
            world_to_screen,
        }
    }

    /// Projects a world point, or `None` if it lies outside the view volume.
    pub fn point(&self, p: Vec3) -> Option<Vec3> {
        if !self.frustum.iter().all(|plane| plane.contains(p)) {
            return None;
        }
        let (ndc, _) = self.project(p)?;
        CANONICAL_CUBE
            .iter()
            .all(|plane| plane.contains(ndc))
            .then_some(ndc)
    }

    /// Clips a world segment and returns the visible part in NDC.
    pub fn segment(&self, start: Vec3, end: Vec3) -> Option<Segment> {
        let visible = clip_segment_against(Segment::new(start, end), self.frustum)?;
        let (start, _) = self.project(visible.start)?;
        let (end, _) = self.project(visible.end)?;
        clip_segment_against(Segment::new(start, end), &CANONICAL_CUBE)
    }

    /// Clips a world triangle and returns the visible pieces in NDC, each
    /// wound like the input.
    pub fn triangle(&self, triangle: ClipTriangle) -> Vec<ClipTriangle> {
        clip_triangle_against(triangle, self.frustum)
            .into_iter()
            .filter_map(|t| self.project_triangle(&t))
            .flat_map(|t| clip_triangle_against(t, &CANONICAL_CUBE))
            .collect()
    }

    fn project_triangle(&self, triangle: &ClipTriangle) -> Option<ClipTriangle> {
        let mut out = *triangle;
        for vertex in &mut out.vertices {
            let (ndc, w) = self.project(vertex.position)?;
            *vertex = ClipVertex::new(ndc, vertex.uv / w);
        }
        Some(out)
    }

    /// Homogeneous transform followed by the divide. Drops points with `w == 0`.
    fn project(&self, p: Vec3) -> Option<(Vec3, f32)> {
        let clip = *self.world_to_screen * Vec4::from(p);
        let ndc = clip.project()?;
        Some((ndc, clip.w))
    }
}
