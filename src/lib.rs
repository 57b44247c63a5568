//! A CPU-only 3D rendering pipeline.
//!
//! Scenes of polygon meshes are viewed through perspective or orthogonal
//! cameras, clipped against the view frustum, rasterized with a depth buffer
//! and written to an RGBA image. Nothing here talks to a window or a GPU.
//!
//! # Quick Start
//!
//! ```ignore
//! use softscene::prelude::*;
//!
//! let mut scene = Scene::new(640, 480, colors::WHITE);
//! scene.add_camera(Camera::perspective(
//!     Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::Y, 2.0, 1.5, 1.0, 100.0,
//! )?);
//! scene.add_shape(builders::cube(Vec3::ZERO, 2.0));
//!
//! let mut surface = RgbaImage::new(640, 480);
//! scene.render(&mut surface)?;
//! ```

pub mod camera;
pub mod clipper;
pub mod colors;
pub mod config;
pub mod engine;
pub mod error;
pub mod light;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod render;
pub mod scene;
pub mod texture;
pub mod timing;
pub mod transform;

pub use camera::Camera;
pub use config::RenderConfig;
pub use engine::Engine;
pub use error::{GeometryError, LoadError, RenderError};
pub use mesh::Mesh;
pub use projection::Projection;
pub use scene::{Scene, SharedScene};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use softscene::prelude::*;
/// ```
pub mod prelude {
    // Camera
    pub use crate::camera::{Camera, CameraAxis, CameraCommand, CameraController};

    // Colours
    pub use crate::colors;

    // Errors
    pub use crate::error::{GeometryError, LoadError, RenderError};

    // Lights
    pub use crate::light::DistantLight;

    // Math
    pub use crate::math::{Mat4, Plane, Vec3, Vec4};

    // Meshes
    pub use crate::mesh::{builders, Mesh};
    pub use crate::texture::Texture;

    // Projection & transform
    pub use crate::projection::Projection;
    pub use crate::transform::Orientation;

    // Scene
    pub use crate::scene::{RenderStats, Scene, ShapeId, SharedScene};

    pub use image::RgbaImage;
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::{EdgeFunctionRasterizer, Fill, FrameBuffer, Rasterizer, Triangle, DEPTH_CLEAR};
}
