//! Mesh topology constructors.
//!
//! Every builder returns a plain [`Mesh`] in its default orientation
//! ([`Orientation::MESH_MODEL`](crate::transform::Orientation::MESH_MODEL));
//! callers place and turn it afterwards. Solid shapes are built around a unit
//! model and sized through the mesh scale, so `set_scale` resizes them.
//! Triangles wind counter-clockwise seen from outside.

use std::f32::consts::{PI, TAU};

use crate::error::GeometryError;
use crate::math::{Vec3, Vec4};

use super::{Edge, Face, Mesh};

/// Unit cube corners centred on the model origin.
const CUBE_CORNERS: [Vec4; 8] = [
    Vec4::point(-0.5, -0.5, -0.5),
    Vec4::point(0.5, -0.5, -0.5),
    Vec4::point(0.5, 0.5, -0.5),
    Vec4::point(-0.5, 0.5, -0.5),
    Vec4::point(-0.5, -0.5, 0.5),
    Vec4::point(0.5, -0.5, 0.5),
    Vec4::point(0.5, 0.5, 0.5),
    Vec4::point(-0.5, 0.5, 0.5),
];

/// Each side as bottom-left, bottom-right, top-right, top-left seen from outside.
const CUBE_SIDES: [[usize; 4]; 6] = [
    [4, 5, 6, 7], // +Z
    [1, 0, 3, 2], // -Z
    [5, 1, 2, 6], // +X
    [0, 4, 7, 3], // -X
    [7, 6, 2, 3], // +Y
    [0, 1, 5, 4], // -Y
];

const CUBE_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Two textured triangles covering a quad given as bottom-left, bottom-right,
/// top-right, top-left. The full texture is stretched over the quad.
fn quad_faces([bl, br, tr, tl]: [usize; 4]) -> [Face; 2] {
    [
        Face::new(bl, br, tr).with_uvs([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]),
        Face::new(bl, tr, tl).with_uvs([(0.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
    ]
}

fn edges(pairs: &[[usize; 2]]) -> Vec<Edge> {
    pairs.iter().map(|&[a, b]| Edge::new(a, b)).collect()
}

fn assemble(vertices: Vec<Vec4>, edges: Vec<Edge>, faces: Vec<Face>) -> Mesh {
    debug_assert!(Mesh::new(vertices.clone(), edges.clone(), faces.clone()).is_ok());
    Mesh::from_checked(vertices, edges, faces)
}

pub fn cube(origin: Vec3, side: f32) -> Mesh {
    cuboid(origin, side, side, side)
}

/// Box `length` along the mesh direction, `height` along up, `width` along right.
pub fn cuboid(origin: Vec3, length: f32, height: f32, width: f32) -> Mesh {
    let faces = CUBE_SIDES.iter().flat_map(|&side| quad_faces(side)).collect();
    let mut mesh = assemble(CUBE_CORNERS.to_vec(), edges(&CUBE_EDGES), faces);
    mesh.set_origin(origin)
        .set_scale(Vec3::new(length, height, width));
    mesh
}

/// Flat rectangle in the model's direction/right plane, facing up.
///
/// Planes are double-sided: both faces render whichever side the camera is on.
pub fn plane(origin: Vec3, length: f32, width: f32) -> Mesh {
    let vertices = vec![
        Vec4::point(-0.5, 0.0, -0.5),
        Vec4::point(0.5, 0.0, -0.5),
        Vec4::point(0.5, 0.0, 0.5),
        Vec4::point(-0.5, 0.0, 0.5),
    ];
    let faces = quad_faces([3, 2, 1, 0]).to_vec();
    let mut mesh = assemble(vertices, edges(&[[0, 1], [1, 2], [2, 3], [3, 0]]), faces);
    mesh.set_origin(origin)
        .set_scale(Vec3::new(length, 1.0, width))
        .set_double_sided(true);
    mesh
}

/// Single segment from `start` to `end`. Draws edges only.
///
/// The model segment runs from the origin to `(1, 1, 1)` and is stretched by
/// the per-axis extent, so the mesh keeps the default orientation.
pub fn line(start: Vec3, end: Vec3) -> Mesh {
    let vertices = vec![Vec4::point(0.0, 0.0, 0.0), Vec4::point(1.0, 1.0, 1.0)];
    let mut mesh = assemble(vertices, edges(&[[0, 1]]), Vec::new());
    mesh.set_origin(start).set_scale(end - start);
    mesh.draw_faces = false;
    mesh
}

/// Latitude/longitude sphere of the given radius.
pub fn sphere(origin: Vec3, radius: f32, rings: usize, segments: usize) -> Mesh {
    let rings = rings.max(2);
    let segments = segments.max(3);

    let mut vertices = vec![Vec4::point(0.0, 1.0, 0.0)];
    for ring in 1..rings {
        let polar = PI * ring as f32 / rings as f32;
        for segment in 0..segments {
            let azimuth = TAU * segment as f32 / segments as f32;
            vertices.push(Vec4::point(
                polar.sin() * azimuth.cos(),
                polar.cos(),
                polar.sin() * azimuth.sin(),
            ));
        }
    }
    vertices.push(Vec4::point(0.0, -1.0, 0.0));
    let south = vertices.len() - 1;

    let at = |ring: usize, segment: usize| 1 + (ring - 1) * segments + segment % segments;
    let mut faces = Vec::new();
    let mut pairs = Vec::new();
    for segment in 0..segments {
        // Azimuth runs from +X toward +Z, which is clockwise seen from above,
        // so each triangle lists the later segment first.
        faces.push(Face::new(0, at(1, segment + 1), at(1, segment)));
        faces.push(Face::new(south, at(rings - 1, segment), at(rings - 1, segment + 1)));
        for ring in 1..rings - 1 {
            let (a, b) = (at(ring, segment), at(ring, segment + 1));
            let (c, d) = (at(ring + 1, segment), at(ring + 1, segment + 1));
            faces.push(Face::new(a, b, d));
            faces.push(Face::new(a, d, c));
            pairs.push([a, c]);
        }
        for ring in 1..rings {
            pairs.push([at(ring, segment), at(ring, segment + 1)]);
        }
        pairs.push([0, at(1, segment)]);
        pairs.push([at(rings - 1, segment), south]);
    }

    let mut mesh = assemble(vertices, edges(&pairs), faces);
    mesh.set_origin(origin).set_scale(Vec3::splat(radius));
    mesh
}

/// Mesh from caller-supplied geometry, placed at the world origin.
pub fn custom(
    vertices: Vec<Vec4>,
    edge_pairs: &[[usize; 2]],
    face_triples: &[[usize; 3]],
) -> Result<Mesh, GeometryError> {
    let faces = face_triples.iter().map(|&[a, b, c]| Face::new(a, b, c)).collect();
    Mesh::new(vertices, edges(edge_pairs), faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn placed(mut mesh: Mesh) -> Mesh {
        mesh.compute_model_to_world();
        mesh.apply_world_transform();
        mesh
    }

    /// Outward test: the normal points away from the model centre.
    fn all_faces_point_outward(mesh: &Mesh, centre: Vec3) {
        for face in mesh.faces() {
            let [p1, p2, p3] = mesh.world_face(face);
            let normal = (p2 - p1).cross(p3 - p1);
            assert!((p1 - centre).dot(normal) > 0.0, "face {:?} winds inward", face.indices);
        }
    }

    #[test]
    fn cube_has_outward_winding() {
        let mesh = placed(cube(Vec3::new(1.0, 2.0, 3.0), 2.0));
        assert_eq!(mesh.faces().len(), 12);
        assert_eq!(mesh.edges().len(), 12);
        all_faces_point_outward(&mesh, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn cuboid_extent_follows_scale() {
        let mesh = placed(cuboid(Vec3::ZERO, 4.0, 2.0, 1.0));
        let (lo, hi) = mesh
            .world_vertices()
            .iter()
            .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), p| {
                (lo.min(*p), hi.max(*p))
            });
        assert_relative_eq!(lo, Vec3::new(-2.0, -1.0, -0.5));
        assert_relative_eq!(hi, Vec3::new(2.0, 1.0, 0.5));
    }

    #[test]
    fn cube_faces_carry_uvs() {
        let mesh = cube(Vec3::ZERO, 1.0);
        assert!(mesh.faces().iter().all(|f| f.uvs.is_some()));
    }

    #[test]
    fn plane_is_double_sided_and_faces_up() {
        let mesh = placed(plane(Vec3::ZERO, 2.0, 2.0));
        assert!(mesh.is_double_sided());
        for face in mesh.faces() {
            let [p1, p2, p3] = mesh.world_face(face);
            let normal = (p2 - p1).cross(p3 - p1).normalize();
            assert_relative_eq!(normal, Vec3::Y, epsilon = 1e-6);
        }
    }

    #[test]
    fn line_spans_start_to_end() {
        let start = Vec3::new(1.0, -1.0, 2.0);
        let end = Vec3::new(-3.0, 4.0, 2.5);
        let mesh = placed(line(start, end));
        assert!(!mesh.draw_faces);
        assert_relative_eq!(mesh.world_vertices()[0], start);
        assert_relative_eq!(mesh.world_vertices()[1], end, epsilon = 1e-6);
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = placed(sphere(Vec3::new(0.0, 0.0, -4.0), 1.5, 6, 8));
        for p in mesh.world_vertices() {
            assert_relative_eq!((*p - Vec3::new(0.0, 0.0, -4.0)).magnitude(), 1.5, epsilon = 1e-5);
        }
        all_faces_point_outward(&mesh, Vec3::new(0.0, 0.0, -4.0));
    }

    #[test]
    fn custom_validates_indices() {
        let vertices = vec![Vec4::point(0.0, 0.0, 0.0), Vec4::point(1.0, 0.0, 0.0)];
        assert!(custom(vertices.clone(), &[[0, 1]], &[]).is_ok());
        assert!(custom(vertices, &[], &[[0, 1, 2]]).is_err());
    }
}
