//! Scene orchestration.
//!
//! A [`Scene`] owns the shapes, cameras and lights, the colour and depth
//! buffers, and the id counters. [`Scene::render`] redraws everything from
//! scratch through the active camera:
//!
//! 1. Clear colour to the background and depth to the sentinel.
//! 2. Refresh the camera's matrices and frustum planes.
//! 3. For each visible shape in registration order, rewrite the mesh's world
//!    cache, then clip and draw its edges, its faces (after back-face
//!    culling) and its spots.
//! 4. Copy the colour buffer into the caller's surface.
//!
//! [`SharedScene`] puts the whole scene behind one lock for drivers that
//! render and mutate from different threads.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use image::RgbaImage;
use log::{debug, trace};

use crate::camera::Camera;
use crate::clipper::{ClipPipeline, ClipTriangle, ClipVertex};
use crate::colors;
use crate::error::{LoadError, RenderError};
use crate::light::DistantLight;
use crate::math::Vec3;
use crate::mesh::{builders, Mesh, DEFAULT_EDGE_COLOR};
use crate::render::{Fill, Renderer};

/// Side length in pixels of a vertex spot.
const SPOT_SIZE: i32 = 3;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Identifies a shape within its scene. Never reused.
    ShapeId,
    "shape"
);
id_type!(
    /// Identifies a camera within its scene. Never reused.
    CameraId,
    "camera"
);
id_type!(
    /// Identifies a light within its scene. Never reused.
    LightId,
    "light"
);

/// A registered mesh.
#[derive(Debug, Clone)]
pub struct Shape {
    id: ShapeId,
    pub mesh: Mesh,
    pub visible: bool,
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        self.id
    }
}

/// Counters gathered while rendering one frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    /// Faces that produced at least one rasterized triangle.
    pub faces_drawn: usize,
    /// Faces skipped by back-face culling.
    pub faces_culled: usize,
    /// Faces that survived culling but lay entirely outside the view volume.
    pub faces_clipped: usize,
    /// Triangles handed to the rasterizer after clipping.
    pub triangles_rasterized: usize,
    pub edges_drawn: usize,
    pub spots_drawn: usize,
}

pub struct Scene {
    shapes: Vec<Shape>,
    cameras: Vec<(CameraId, Camera)>,
    lights: Vec<(LightId, DistantLight)>,
    render_camera: Option<CameraId>,

    renderer: Renderer,
    background: u32,

    next_shape_id: u64,
    next_camera_id: u64,
    next_light_id: u64,
}

impl Scene {
    pub fn new(width: u32, height: u32, background: u32) -> Self {
        debug!("scene created with {}x{} surface", width, height);
        Self {
            shapes: Vec::new(),
            cameras: Vec::new(),
            lights: Vec::new(),
            render_camera: None,
            renderer: Renderer::new(width, height),
            background,
            next_shape_id: 0,
            next_camera_id: 0,
            next_light_id: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.renderer.width()
    }

    pub fn height(&self) -> u32 {
        self.renderer.height()
    }

    pub fn background(&self) -> u32 {
        self.background
    }

    pub fn set_background(&mut self, color: u32) {
        self.background = color;
    }

    /// Buffers of the most recent frame.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Reallocates both buffers. The next render draws at the new size.
    pub fn resize(&mut self, width: u32, height: u32) {
        debug!("scene resized to {}x{}", width, height);
        self.renderer.resize(width, height);
    }

    // =========================================================================
    // Shapes
    // =========================================================================

    pub fn add_shape(&mut self, mesh: Mesh) -> ShapeId {
        let id = ShapeId(self.next_shape_id);
        self.next_shape_id += 1;
        debug!(
            "added {} ({} vertices, {} edges, {} faces)",
            id,
            mesh.vertices().len(),
            mesh.edges().len(),
            mesh.faces().len()
        );
        self.shapes.push(Shape {
            id,
            mesh,
            visible: true,
        });
        id
    }

    /// Loads an OBJ file and registers it. On failure the scene is untouched.
    pub fn add_from_obj<P: AsRef<Path>>(&mut self, path: P) -> Result<ShapeId, LoadError> {
        let mesh = Mesh::load_obj(path.as_ref())?;
        Ok(self.add_shape(mesh))
    }

    pub fn add_from_obj_str(&mut self, text: &str) -> Result<ShapeId, LoadError> {
        let mesh = Mesh::from_obj_str(text)?;
        Ok(self.add_shape(mesh))
    }

    /// Adds red, green and blue line meshes along +X, +Y and +Z from the origin.
    pub fn add_axes(&mut self, length: f32) -> [ShapeId; 3] {
        [
            (Vec3::X, colors::RED),
            (Vec3::Y, colors::GREEN),
            (Vec3::Z, colors::BLUE),
        ]
        .map(|(axis, color)| {
            let mut line = builders::line(Vec3::ZERO, axis * length);
            line.set_edge_color(color);
            self.add_shape(line)
        })
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Mesh> {
        let index = self.shapes.iter().position(|s| s.id == id)?;
        debug!("removed {}", id);
        Some(self.shapes.remove(index).mesh)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    /// Shapes in registration order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    // =========================================================================
    // Cameras
    // =========================================================================

    /// Registers a camera. The first camera added becomes the render camera.
    pub fn add_camera(&mut self, camera: Camera) -> CameraId {
        let id = CameraId(self.next_camera_id);
        self.next_camera_id += 1;
        self.cameras.push((id, camera));
        if self.render_camera.is_none() {
            self.render_camera = Some(id);
        }
        debug!("added {}", id);
        id
    }

    /// Removing the render camera leaves the scene without one.
    pub fn remove_camera(&mut self, id: CameraId) -> Option<Camera> {
        let index = self.cameras.iter().position(|(c, _)| *c == id)?;
        if self.render_camera == Some(id) {
            self.render_camera = None;
        }
        debug!("removed {}", id);
        Some(self.cameras.remove(index).1)
    }

    pub fn camera(&self, id: CameraId) -> Option<&Camera> {
        self.cameras.iter().find(|(c, _)| *c == id).map(|(_, cam)| cam)
    }

    pub fn camera_mut(&mut self, id: CameraId) -> Option<&mut Camera> {
        self.cameras
            .iter_mut()
            .find(|(c, _)| *c == id)
            .map(|(_, cam)| cam)
    }

    /// Ids of the registered cameras in registration order.
    pub fn camera_ids(&self) -> impl Iterator<Item = CameraId> + '_ {
        self.cameras.iter().map(|(id, _)| *id)
    }

    pub fn render_camera_id(&self) -> Option<CameraId> {
        self.render_camera
    }

    pub fn render_camera(&self) -> Option<&Camera> {
        self.camera(self.render_camera?)
    }

    pub fn render_camera_mut(&mut self) -> Option<&mut Camera> {
        let id = self.render_camera?;
        self.camera_mut(id)
    }

    /// Returns `false` if `id` is not registered.
    pub fn set_render_camera(&mut self, id: CameraId) -> bool {
        if self.camera(id).is_none() {
            return false;
        }
        self.render_camera = Some(id);
        true
    }

    /// Makes the next registered camera (wrapping around) the render camera.
    pub fn cycle_render_camera(&mut self) -> Option<CameraId> {
        let current = self
            .render_camera
            .and_then(|id| self.cameras.iter().position(|(c, _)| *c == id));
        let next = match current {
            Some(index) => (index + 1) % self.cameras.len(),
            None => 0,
        };
        self.render_camera = self.cameras.get(next).map(|(id, _)| *id);
        if let Some(id) = self.render_camera {
            debug!("render camera is now {}", id);
        }
        self.render_camera
    }

    // =========================================================================
    // Lights
    // =========================================================================

    pub fn add_light(&mut self, light: DistantLight) -> LightId {
        let id = LightId(self.next_light_id);
        self.next_light_id += 1;
        self.lights.push((id, light));
        debug!("added {}", id);
        id
    }

    pub fn remove_light(&mut self, id: LightId) -> Option<DistantLight> {
        let index = self.lights.iter().position(|(l, _)| *l == id)?;
        debug!("removed {}", id);
        Some(self.lights.remove(index).1)
    }

    pub fn light(&self, id: LightId) -> Option<&DistantLight> {
        self.lights.iter().find(|(l, _)| *l == id).map(|(_, light)| light)
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Draws the scene and copies the frame into `surface`.
    ///
    /// `surface` must match the scene size. On error neither the buffers nor
    /// the surface are touched.
    pub fn render(&mut self, surface: &mut RgbaImage) -> Result<RenderStats, RenderError> {
        let expected = (self.width(), self.height());
        if surface.dimensions() != expected {
            return Err(RenderError::SurfaceSizeMismatch {
                expected,
                actual: surface.dimensions(),
            });
        }
        let stats = self.render_frame()?;
        self.renderer.blit(surface)?;
        Ok(stats)
    }

    /// Draws the scene into the internal buffers only.
    pub fn render_frame(&mut self) -> Result<RenderStats, RenderError> {
        if self.width() == 0 || self.height() == 0 {
            return Err(RenderError::NoSurface);
        }
        let id = self.render_camera.ok_or(RenderError::NoActiveCamera)?;
        let camera = self
            .cameras
            .iter_mut()
            .find(|(c, _)| *c == id)
            .map(|(_, cam)| cam)
            .ok_or(RenderError::NoActiveCamera)?;

        camera.update();
        self.renderer.clear(self.background);
        self.renderer.clear_depth();

        let pipeline = ClipPipeline::new(camera);
        let eye = camera.origin();
        let mut stats = RenderStats::default();

        for shape in self.shapes.iter_mut().filter(|s| s.visible) {
            shape.mesh.compute_model_to_world();
            shape.mesh.apply_world_transform();
            draw_mesh(&shape.mesh, &pipeline, eye, &mut self.renderer, &mut stats);
        }

        trace!("{:?}", stats);
        Ok(stats)
    }

    /// Copy of the most recent frame.
    pub fn frame_image(&self) -> RgbaImage {
        self.renderer.to_image()
    }
}

/// A face is drawn only if the eye is on the side its counter-clockwise
/// normal points to.
fn is_back_facing(eye: Vec3, [p1, p2, p3]: [Vec3; 3]) -> bool {
    (p1 - eye).dot((p2 - p1).cross(p3 - p1)) >= 0.0
}

fn draw_mesh(
    mesh: &Mesh,
    pipeline: &ClipPipeline<'_>,
    eye: Vec3,
    renderer: &mut Renderer,
    stats: &mut RenderStats,
) {
    if mesh.draw_edges {
        for edge in mesh.edges().iter().filter(|e| e.visible) {
            let [a, b] = mesh.world_edge(edge);
            if let Some(segment) = pipeline.segment(a, b) {
                renderer.draw_segment(&segment, edge.color);
                stats.edges_drawn += 1;
            }
        }
    }

    if mesh.draw_faces {
        for face in mesh.faces().iter().filter(|f| f.visible) {
            let points = mesh.world_face(face);
            if !mesh.is_double_sided() && is_back_facing(eye, points) {
                stats.faces_culled += 1;
                continue;
            }

            let (fill, uvs) = match (&face.texture, face.uvs) {
                (Some(texture), Some(uvs)) => (Fill::Textured(texture.as_ref()), uvs),
                _ => (Fill::Solid(face.color), [Vec3::Z; 3]),
            };
            let triangle = ClipTriangle::new([0, 1, 2].map(|k| ClipVertex::new(points[k], uvs[k])));

            let parts = pipeline.triangle(triangle);
            if parts.is_empty() {
                stats.faces_clipped += 1;
                continue;
            }
            for part in &parts {
                renderer.fill_triangle(part, fill);
            }
            stats.faces_drawn += 1;
            stats.triangles_rasterized += parts.len();

            if face.draw_outline {
                for k in 0..3 {
                    if let Some(segment) = pipeline.segment(points[k], points[(k + 1) % 3]) {
                        renderer.draw_segment(&segment, DEFAULT_EDGE_COLOR);
                    }
                }
            }
        }
    }

    if mesh.draw_spots {
        for &p in mesh.world_vertices() {
            if let Some(ndc) = pipeline.point(p) {
                renderer.draw_spot(ndc, SPOT_SIZE, mesh.spot_color);
                stats.spots_drawn += 1;
            }
        }
    }
}

// =============================================================================
// Shared Scene
// =============================================================================

/// A scene behind a single coarse lock.
///
/// Every operation holds the lock for its whole duration, so a render never
/// observes a half-applied mutation or a half-resized buffer.
#[derive(Clone)]
pub struct SharedScene {
    inner: Arc<Mutex<Scene>>,
}

impl SharedScene {
    pub fn new(scene: Scene) -> Self {
        Self {
            inner: Arc::new(Mutex::new(scene)),
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, Scene>, RenderError> {
        self.inner.lock().map_err(|_| RenderError::LockPoisoned)
    }

    /// Runs `f` with exclusive access to the scene.
    pub fn with<R>(&self, f: impl FnOnce(&mut Scene) -> R) -> Result<R, RenderError> {
        let mut scene = self.lock()?;
        Ok(f(&mut scene))
    }

    pub fn render(&self, surface: &mut RgbaImage) -> Result<RenderStats, RenderError> {
        self.lock()?.render(surface)
    }

    pub fn resize(&self, width: u32, height: u32) -> Result<(), RenderError> {
        self.lock()?.resize(width, height);
        Ok(())
    }
}
