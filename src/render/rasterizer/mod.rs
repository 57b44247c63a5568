//! Triangle rasterization.
//!
//! [`EdgeFunctionRasterizer`] fills screen-space triangles into a
//! [`FrameBuffer`], delegating per-pixel colour to a shader chosen from the
//! [`Fill`].

mod edgefunction;
mod shader;

pub use edgefunction::EdgeFunctionRasterizer;
pub use shader::{FlatShader, PixelShader, TextureShader};

use super::framebuffer::FrameBuffer;
use crate::math::Vec3;
use crate::texture::Texture;

/// A triangle ready for rasterization in screen space.
///
/// `points` hold pixel `x`, pixel `y` and canonical depth. `uvs` hold
/// `(u/w, v/w, 1/w)` per vertex and are only read by textured fills.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub points: [Vec3; 3],
    pub uvs: [Vec3; 3],
}

impl Triangle {
    pub fn new(points: [Vec3; 3], uvs: [Vec3; 3]) -> Self {
        Self { points, uvs }
    }

    pub fn solid(points: [Vec3; 3]) -> Self {
        Self::new(points, [Vec3::Z; 3])
    }
}

/// How covered pixels are coloured.
#[derive(Clone, Copy, Debug)]
pub enum Fill<'a> {
    Solid(u32),
    Textured(&'a Texture),
}

/// Fills triangles into a frame buffer with depth testing.
pub trait Rasterizer {
    fn fill_triangle(&self, triangle: &Triangle, buffer: &mut FrameBuffer, fill: Fill<'_>);
}
