//! Edge function-based triangle rasterization.
//!
//! The rasterizer walks the triangle's bounding box and tests every pixel
//! against three edge equations. For an edge from A to B the edge function
//! at P is
//!
//! ```text
//! E(P) = (P.x - A.x) * (B.y - A.y) - (P.y - A.y) * (B.x - A.x)
//! ```
//!
//! the 2D cross product of `B - A` and `P - A`. A pixel is covered when all
//! three edges agree in sign, which accepts either winding. Dividing each edge
//! value by the total signed area gives the barycentric weights used for depth
//! and attribute interpolation.
//!
//! Pixels are sampled at integer coordinates, matching the viewport mapping
//! that sends the NDC corners to the centres of the corner pixels.

use super::shader::{FlatShader, PixelShader, TextureShader};
use super::{Fill, Rasterizer, Triangle};
use crate::math::Vec3;
use crate::render::framebuffer::FrameBuffer;

#[derive(Debug, Default, Clone, Copy)]
pub struct EdgeFunctionRasterizer;

impl EdgeFunctionRasterizer {
    pub fn new() -> Self {
        EdgeFunctionRasterizer
    }

    /// Signed parallelogram area of `(b - a)` and `(p - a)`.
    #[inline]
    fn edge_function(a: Vec3, b: Vec3, p: Vec3) -> f32 {
        (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
    }

    fn rasterize_with_shader<S: PixelShader>(
        triangle: &Triangle,
        buffer: &mut FrameBuffer,
        shader: &S,
    ) {
        let [v0, v1, v2] = triangle.points;

        let area = Self::edge_function(v0, v1, v2);
        if area.abs() < f32::EPSILON {
            return;
        }
        let inv_area = 1.0 / area;

        let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i32).max(0);
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(buffer.width() as i32 - 1);
        let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i32).max(0);
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(buffer.height() as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Vec3::new(x as f32, y as f32, 0.0);

                let w0 = Self::edge_function(v1, v2, p);
                let w1 = Self::edge_function(v2, v0, p);
                let w2 = Self::edge_function(v0, v1, p);

                let inside = if area > 0.0 {
                    w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
                } else {
                    w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0
                };
                if !inside {
                    continue;
                }

                let lambda = [w0 * inv_area, w1 * inv_area, w2 * inv_area];
                let depth = lambda[0] * v0.z + lambda[1] * v1.z + lambda[2] * v2.z;
                buffer.set_pixel_with_depth(x, y, depth, shader.shade(lambda));
            }
        }
    }
}

impl Rasterizer for EdgeFunctionRasterizer {
    fn fill_triangle(&self, triangle: &Triangle, buffer: &mut FrameBuffer, fill: Fill<'_>) {
        match fill {
            Fill::Solid(color) => {
                Self::rasterize_with_shader(triangle, buffer, &FlatShader::new(color))
            }
            Fill::Textured(texture) => Self::rasterize_with_shader(
                triangle,
                buffer,
                &TextureShader::new(texture, triangle.uvs),
            ),
        }
    }
}
