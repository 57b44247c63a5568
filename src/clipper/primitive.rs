//! Single-plane and multi-plane clipping of segments and triangles.
//!
//! Everything here is stateless: inputs are taken by value and fresh
//! primitives are returned. A primitive that ends up entirely outside is
//! simply dropped.

use std::collections::VecDeque;

use crate::math::{Plane, Vec3};

/// A line segment. Clipping keeps the endpoint order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
}

impl Segment {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }
}

/// Triangle corner with the attributes that are interpolated when clipping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipVertex {
    pub position: Vec3,
    /// Homogeneous texture coordinate `(u, v, 1)`; unused for untextured faces.
    pub uv: Vec3,
}

impl ClipVertex {
    pub fn new(position: Vec3, uv: Vec3) -> Self {
        Self { position, uv }
    }

    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            uv: self.uv.lerp(other.uv, t),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipTriangle {
    pub vertices: [ClipVertex; 3],
}

impl ClipTriangle {
    pub fn new(vertices: [ClipVertex; 3]) -> Self {
        Self { vertices }
    }

    /// Triangle without texture coordinates.
    pub fn from_points(points: [Vec3; 3]) -> Self {
        Self::new(points.map(|p| ClipVertex::new(p, Vec3::Z)))
    }

    pub fn positions(&self) -> [Vec3; 3] {
        self.vertices.map(|v| v.position)
    }

    /// Same vertices starting from index `first`, keeping their cyclic order
    /// and therefore the winding.
    fn rotated(&self, first: usize) -> [ClipVertex; 3] {
        [0, 1, 2].map(|k| self.vertices[(first + k) % 3])
    }
}

/// Result of clipping a triangle against one plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriangleClip {
    /// Entirely outside.
    Discarded,
    /// Unchanged (all inside) or shrunk to a smaller triangle (one vertex inside).
    One(ClipTriangle),
    /// Two vertices inside: the remaining quadrilateral, split in two.
    Two(ClipTriangle, ClipTriangle),
}

/// Clips a segment against one plane.
pub fn clip_segment(segment: Segment, plane: &Plane) -> Option<Segment> {
    let d_start = plane.signed_distance(segment.start);
    let d_end = plane.signed_distance(segment.end);

    match (d_start >= 0.0, d_end >= 0.0) {
        (true, true) => Some(segment),
        (false, false) => None,
        (start_inside, _) => {
            let t = Plane::crossing(d_start, d_end);
            let crossing = segment.start.lerp(segment.end, t);
            if start_inside {
                Some(Segment::new(segment.start, crossing))
            } else {
                Some(Segment::new(crossing, segment.end))
            }
        }
    }
}

/// Clips a triangle against one plane, preserving winding.
pub fn clip_triangle(triangle: ClipTriangle, plane: &Plane) -> TriangleClip {
    let d = triangle
        .vertices
        .map(|v| plane.signed_distance(v.position));
    let inside = d.map(|d| d >= 0.0);

    let crossing = |from: usize, to: usize| {
        let t = Plane::crossing(d[from], d[to]);
        triangle.vertices[from].lerp(&triangle.vertices[to], t)
    };

    match inside.iter().filter(|&&i| i).count() {
        0 => TriangleClip::Discarded,
        3 => TriangleClip::One(triangle),
        1 => {
            let i = inside.iter().position(|&i| i).unwrap_or(0);
            let (o1, o2) = ((i + 1) % 3, (i + 2) % 3);
            let [kept, _, _] = triangle.rotated(i);
            TriangleClip::One(ClipTriangle::new([kept, crossing(i, o1), crossing(i, o2)]))
        }
        _ => {
            let o = inside.iter().position(|&i| !i).unwrap_or(0);
            let (a, b) = ((o + 1) % 3, (o + 2) % 3);
            let [_, va, vb] = triangle.rotated(o);
            let p_bo = crossing(b, o);
            let p_ao = crossing(a, o);
            TriangleClip::Two(
                ClipTriangle::new([va, vb, p_bo]),
                ClipTriangle::new([va, p_bo, p_ao]),
            )
        }
    }
}

/// Clips a segment against every plane in turn.
pub fn clip_segment_against(segment: Segment, planes: &[Plane]) -> Option<Segment> {
    planes
        .iter()
        .try_fold(segment, |segment, plane| clip_segment(segment, plane))
}

/// Clips a triangle against every plane in turn.
///
/// Survivors of each plane are queued for the next one, so the output can
/// hold more triangles than the input.
pub fn clip_triangle_against(triangle: ClipTriangle, planes: &[Plane]) -> Vec<ClipTriangle> {
    let mut queue = VecDeque::from([triangle]);

    for plane in planes {
        for _ in 0..queue.len() {
            let Some(next) = queue.pop_front() else {
                break;
            };
            match clip_triangle(next, plane) {
                TriangleClip::Discarded => {}
                TriangleClip::One(t) => queue.push_back(t),
                TriangleClip::Two(t1, t2) => {
                    queue.push_back(t1);
                    queue.push_back(t2);
                }
            }
        }
        if queue.is_empty() {
            break;
        }
    }

    queue.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn area(t: &ClipTriangle) -> f32 {
        let [a, b, c] = t.positions();
        (b - a).cross(c - a).magnitude() / 2.0
    }

    fn normal(t: &ClipTriangle) -> Vec3 {
        let [a, b, c] = t.positions();
        (b - a).cross(c - a).normalize()
    }

    fn plane(point: Vec3, normal: Vec3) -> Plane {
        Plane::new(point, normal).unwrap()
    }

    fn test_triangle() -> ClipTriangle {
        ClipTriangle::new([
            ClipVertex::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
            ClipVertex::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0)),
            ClipVertex::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 1.0, 1.0)),
        ])
    }

    #[test]
    fn segment_inside_is_unchanged() {
        let s = Segment::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(clip_segment(s, &plane(Vec3::ZERO, Vec3::Y)), Some(s));
    }

    #[test]
    fn segment_outside_is_dropped() {
        let s = Segment::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(3.0, -5.0, 0.0));
        assert_eq!(clip_segment(s, &plane(Vec3::ZERO, Vec3::Y)), None);
    }

    #[test]
    fn crossing_segment_keeps_order_and_inside_endpoint() {
        let p = plane(Vec3::ZERO, Vec3::Y);
        let start = Vec3::new(0.0, 2.0, 0.0);
        let end = Vec3::new(4.0, -2.0, 0.0);

        let clipped = clip_segment(Segment::new(start, end), &p).unwrap();
        assert_eq!(clipped.start, start);
        assert_relative_eq!(clipped.end, Vec3::new(2.0, 0.0, 0.0));

        let reversed = clip_segment(Segment::new(end, start), &p).unwrap();
        assert_relative_eq!(reversed.start, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(reversed.end, start);
    }

    #[test]
    fn triangle_all_inside_is_identical() {
        let t = test_triangle();
        assert_eq!(
            clip_triangle(t, &plane(Vec3::new(0.0, 0.0, -1.0), Vec3::Z)),
            TriangleClip::One(t)
        );
    }

    #[test]
    fn triangle_all_outside_is_discarded() {
        let t = test_triangle();
        assert_eq!(
            clip_triangle(t, &plane(Vec3::new(0.0, 0.0, 1.0), Vec3::Z)),
            TriangleClip::Discarded
        );
    }

    #[test]
    fn one_inside_gives_one_smaller_triangle() {
        let t = test_triangle();
        let TriangleClip::One(out) = clip_triangle(t, &plane(Vec3::X, Vec3::X)) else {
            panic!("expected one triangle");
        };
        assert_relative_eq!(area(&out), 0.5, epsilon = 1e-6);
        assert_relative_eq!(normal(&out), normal(&t), epsilon = 1e-6);
        // The kept vertex is the inside one, with its attributes untouched.
        assert_eq!(out.vertices[0], t.vertices[1]);
        // The crossing on edge (2,0)-(0,2) at x=1 interpolates UVs halfway.
        assert_relative_eq!(out.vertices[1].uv, Vec3::new(0.5, 0.5, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn two_inside_gives_two_triangles_covering_the_rest() {
        let t = test_triangle();
        let TriangleClip::Two(a, b) = clip_triangle(t, &plane(Vec3::X, Vec3::NEG_X)) else {
            panic!("expected two triangles");
        };
        assert_relative_eq!(area(&a) + area(&b), 1.5, epsilon = 1e-6);
        assert_relative_eq!(normal(&a), normal(&t), epsilon = 1e-6);
        assert_relative_eq!(normal(&b), normal(&t), epsilon = 1e-6);
    }

    #[test]
    fn split_areas_sum_to_original() {
        let t = test_triangle();
        let p = plane(Vec3::new(0.7, 0.0, 0.0), Vec3::new(1.0, 0.3, 0.0));
        let flipped = Plane {
            point: p.point,
            normal: -p.normal,
        };
        let total: f32 = [p, flipped]
            .iter()
            .flat_map(|plane| clip_triangle_against(t, std::slice::from_ref(plane)))
            .map(|part| area(&part))
            .sum();
        assert_relative_eq!(total, area(&t), epsilon = 1e-5);
    }

    #[test]
    fn queue_clips_against_every_plane() {
        let t = test_triangle();
        let planes = [
            plane(Vec3::new(0.5, 0.0, 0.0), Vec3::X),
            plane(Vec3::new(0.0, 0.5, 0.0), Vec3::Y),
        ];
        let parts = clip_triangle_against(t, &planes);
        assert!(!parts.is_empty());
        for part in &parts {
            for p in part.positions() {
                assert!(p.x >= 0.5 - 1e-6 && p.y >= 0.5 - 1e-6);
            }
        }
        // Region x >= 0.5, y >= 0.5, x + y <= 2 is a right triangle with legs 1.
        let total: f32 = parts.iter().map(area).sum();
        assert_relative_eq!(total, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn segment_against_several_planes() {
        let planes = [plane(Vec3::ZERO, Vec3::X), plane(Vec3::new(1.0, 0.0, 0.0), Vec3::NEG_X)];
        let s = Segment::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0));
        let clipped = clip_segment_against(s, &planes).unwrap();
        assert_relative_eq!(clipped.start, Vec3::ZERO);
        assert_relative_eq!(clipped.end, Vec3::X);
        assert!(clip_segment_against(Segment::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)), &planes).is_none());
    }
}
