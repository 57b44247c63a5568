//! Polygon meshes.
//!
//! A [`Mesh`] owns its model-space vertices, which are the single source of
//! truth. Edges and faces refer to vertices by index. World-space positions are
//! a cache rewritten from the model data by [`Mesh::apply_world_transform`];
//! nothing is ever transformed incrementally.
//!
//! In model space a mesh faces `+X` with `+Y` up and `+Z` right
//! ([`Orientation::MESH_MODEL`]).

pub mod builders;
pub mod obj;

use std::sync::Arc;

use crate::colors;
use crate::error::GeometryError;
use crate::math::{Mat4, Vec3, Vec4};
use crate::texture::Texture;
use crate::transform::{self, Orientation};

pub const DEFAULT_SPOT_COLOR: u32 = colors::BLUE;
pub const DEFAULT_EDGE_COLOR: u32 = colors::BLACK;
pub const DEFAULT_FACE_COLOR: u32 = colors::GREEN;

/// A line segment between two mesh vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub indices: [usize; 2],
    pub color: u32,
    pub visible: bool,
}

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            indices: [a, b],
            color: DEFAULT_EDGE_COLOR,
            visible: true,
        }
    }
}

/// A triangle between three mesh vertices.
///
/// When both `uvs` and `texture` are set the face is texture mapped; otherwise
/// it is filled with `color`. UVs are stored as `(u, v, 1)` so the homogeneous
/// component can carry `1/w` through the perspective divide.
#[derive(Debug, Clone)]
pub struct Face {
    pub indices: [usize; 3],
    pub color: u32,
    pub uvs: Option<[Vec3; 3]>,
    pub texture: Option<Arc<Texture>>,
    /// Also draw the three edges of the face once it survives culling.
    pub draw_outline: bool,
    pub visible: bool,
}

impl Face {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            indices: [a, b, c],
            color: DEFAULT_FACE_COLOR,
            uvs: None,
            texture: None,
            draw_outline: false,
            visible: true,
        }
    }

    pub fn with_uvs(mut self, uvs: [(f32, f32); 3]) -> Self {
        self.uvs = Some(uvs.map(|(u, v)| Vec3::new(u, v, 1.0)));
        self
    }

    pub fn is_textured(&self) -> bool {
        self.uvs.is_some() && self.texture.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec4>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    world_vertices: Vec<Vec3>,

    origin: Vec3,
    orientation: Orientation,
    scale: Vec3,
    model_to_world: Mat4,

    double_sided: bool,
    pub spot_color: u32,
    pub draw_spots: bool,
    pub draw_edges: bool,
    pub draw_faces: bool,
}

impl Mesh {
    /// Builds a mesh after checking that every edge and face index names a vertex.
    pub fn new(vertices: Vec<Vec4>, edges: Vec<Edge>, faces: Vec<Face>) -> Result<Self, GeometryError> {
        let count = vertices.len();
        let indices = edges
            .iter()
            .flat_map(|e| e.indices)
            .chain(faces.iter().flat_map(|f| f.indices));
        for index in indices {
            if index >= count {
                return Err(GeometryError::IndexOutOfRange { index, count });
            }
        }
        Ok(Self::from_checked(vertices, edges, faces))
    }

    /// Constructor for topology whose indices are already known to be valid.
    pub(crate) fn from_checked(vertices: Vec<Vec4>, edges: Vec<Edge>, faces: Vec<Face>) -> Self {
        Self {
            world_vertices: vec![Vec3::ZERO; vertices.len()],
            vertices,
            edges,
            faces,
            origin: Vec3::ZERO,
            orientation: Orientation::MESH_MODEL,
            scale: Vec3::ONE,
            model_to_world: Mat4::IDENTITY,
            double_sided: false,
            spot_color: DEFAULT_SPOT_COLOR,
            draw_spots: false,
            draw_edges: true,
            draw_faces: true,
        }
    }

    // ============ Geometry ============

    pub fn vertices(&self) -> &[Vec4] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn faces_mut(&mut self) -> &mut [Face] {
        &mut self.faces
    }

    /// World-space vertex positions as of the last [`Mesh::apply_world_transform`].
    pub fn world_vertices(&self) -> &[Vec3] {
        &self.world_vertices
    }

    pub fn world_edge(&self, edge: &Edge) -> [Vec3; 2] {
        edge.indices.map(|i| self.world_vertices[i])
    }

    pub fn world_face(&self, face: &Face) -> [Vec3; 3] {
        face.indices.map(|i| self.world_vertices[i])
    }

    // ============ Appearance ============

    pub fn is_double_sided(&self) -> bool {
        self.double_sided
    }

    /// Double-sided meshes are never back-face culled.
    pub fn set_double_sided(&mut self, double_sided: bool) -> &mut Self {
        self.double_sided = double_sided;
        self
    }

    pub fn set_face_color(&mut self, color: u32) -> &mut Self {
        self.faces.iter_mut().for_each(|f| f.color = color);
        self
    }

    pub fn set_edge_color(&mut self, color: u32) -> &mut Self {
        self.edges.iter_mut().for_each(|e| e.color = color);
        self
    }

    /// Attaches `texture` to every face that carries UVs.
    pub fn set_texture(&mut self, texture: Arc<Texture>) -> &mut Self {
        for face in self.faces.iter_mut().filter(|f| f.uvs.is_some()) {
            face.texture = Some(Arc::clone(&texture));
        }
        self
    }

    pub fn set_face_outlines(&mut self, draw_outline: bool) -> &mut Self {
        self.faces.iter_mut().for_each(|f| f.draw_outline = draw_outline);
        self
    }

    // ============ Placement ============

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Vec3) -> &mut Self {
        self.origin = origin;
        self
    }

    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.origin += delta;
        self
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.scale = scale;
        self
    }

    /// Multiplies the current scale component-wise.
    pub fn scale_by(&mut self, factor: Vec3) -> &mut Self {
        self.scale = self.scale.hadamard(factor);
        self
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    /// Sets direction and up; right is derived. On error nothing changes.
    pub fn set_orientation(&mut self, direction: Vec3, up: Vec3) -> Result<&mut Self, GeometryError> {
        self.orientation = Orientation::from_direction_up(direction, up)?;
        Ok(self)
    }

    /// Sets up and right; direction is derived. On error nothing changes.
    pub fn set_orientation_up_right(&mut self, up: Vec3, right: Vec3) -> Result<&mut Self, GeometryError> {
        self.orientation = Orientation::from_up_right(up, right)?;
        Ok(self)
    }

    /// Sets right and direction; up is derived. On error nothing changes.
    pub fn set_orientation_right_direction(
        &mut self,
        right: Vec3,
        direction: Vec3,
    ) -> Result<&mut Self, GeometryError> {
        self.orientation = Orientation::from_right_direction(right, direction)?;
        Ok(self)
    }

    /// Rotates the mesh frame about a world-space axis through its origin.
    pub fn rotate(&mut self, axis: Vec3, angle: f32) -> &mut Self {
        self.orientation = self.orientation.rotated(axis, angle);
        self
    }

    // ============ World Transform ============

    pub fn model_to_world(&self) -> &Mat4 {
        &self.model_to_world
    }

    /// `T(origin) * R * S`: scale first, then align the model frame, then translate.
    pub fn compute_model_to_world(&mut self) {
        self.model_to_world = transform::model_to_world(
            self.origin,
            &self.orientation,
            &Orientation::MESH_MODEL,
            self.scale,
        );
    }

    /// Rewrites every world-space vertex from the model vertices.
    ///
    /// Homogeneous vertices with `w` other than 0 are divided through.
    pub fn apply_world_transform(&mut self) {
        let m = self.model_to_world;
        for (world, model) in self.world_vertices.iter_mut().zip(&self.vertices) {
            let p = m * *model;
            *world = p.project().unwrap_or_else(|| p.xyz());
        }
    }
}
