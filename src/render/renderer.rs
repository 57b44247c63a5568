//! Low-level rendering primitives.
//!
//! Provides the [`Renderer`] struct which owns the color and depth buffers,
//! maps normalized device coordinates to pixels and implements the drawing
//! operations the scene needs: spots, lines and filled triangles.

use image::RgbaImage;

use super::framebuffer::{pixel_count, FrameBuffer, DEPTH_CLEAR};
use super::rasterizer::{EdgeFunctionRasterizer, Fill, Rasterizer, Triangle};
use crate::clipper::{ClipTriangle, Segment};
use crate::colors;
use crate::error::RenderError;
use crate::math::Vec3;

/// Lines are pulled this far toward the viewer so edges and outlines drawn
/// over their own faces survive the strict depth test.
const LINE_DEPTH_BIAS: f32 = 1e-4;

pub struct Renderer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
    rasterizer: EdgeFunctionRasterizer,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = pixel_count(width, height);
        Self {
            color_buffer: vec![colors::BLACK; size],
            depth_buffer: vec![DEPTH_CLEAR; size],
            width,
            height,
            rasterizer: EdgeFunctionRasterizer::new(),
        }
    }

    /// Reallocates both buffers. Contents are lost.
    pub fn resize(&mut self, width: u32, height: u32) {
        let size = pixel_count(width, height);
        self.color_buffer = vec![colors::BLACK; size];
        self.depth_buffer = vec![DEPTH_CLEAR; size];
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_buffer(&self) -> &[u32] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    #[inline]
    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(DEPTH_CLEAR);
    }

    /// Maps canonical `x, y` in `[-1, 1]` onto pixel coordinates with the
    /// origin at the top-left; `z` passes through as depth.
    #[inline]
    pub fn to_screen(&self, ndc: Vec3) -> Vec3 {
        Vec3::new(
            (ndc.x + 1.0) * (self.width.saturating_sub(1)) as f32 / 2.0,
            (1.0 - ndc.y) * (self.height.saturating_sub(1)) as f32 / 2.0,
            ndc.z,
        )
    }

    /// Get a mutable FrameBuffer view into the color and depth buffers.
    pub fn as_framebuffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        )
    }

    /// Square spot of `size` pixels centred on a canonical point.
    pub fn draw_spot(&mut self, ndc: Vec3, size: i32, color: u32) {
        let p = self.to_screen(ndc);
        let (cx, cy) = (p.x.round() as i32, p.y.round() as i32);
        let half = size.max(1) / 2;
        let mut buffer = self.as_framebuffer();
        for dy in -half..=half {
            for dx in -half..=half {
                buffer.set_pixel_with_depth(cx + dx, cy + dy, p.z - LINE_DEPTH_BIAS, color);
            }
        }
    }

    /// Draws a canonical-space segment.
    pub fn draw_segment(&mut self, segment: &Segment, color: u32) {
        let a = self.to_screen(segment.start);
        let b = self.to_screen(segment.end);
        self.draw_line_bresenham(
            a.x.round() as i32,
            a.y.round() as i32,
            a.z,
            b.x.round() as i32,
            b.y.round() as i32,
            b.z,
            color,
        );
    }

    /// Fills a canonical-space triangle.
    pub fn fill_triangle(&mut self, triangle: &ClipTriangle, fill: Fill<'_>) {
        let screen = Triangle::new(
            triangle.vertices.map(|v| self.to_screen(v.position)),
            triangle.vertices.map(|v| v.uv),
        );
        let mut buffer = FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        );
        self.rasterizer.fill_triangle(&screen, &mut buffer, fill);
    }

    /// Draws a line between two pixels using Bresenham's algorithm with depth testing.
    ///
    /// For each step along the major axis an integer error term decides
    /// whether to also step along the minor axis. Depth is interpolated
    /// linearly by step count.
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub fn draw_line_bresenham(
        &mut self,
        x0: i32,
        y0: i32,
        z0: f32,
        x1: i32,
        y1: i32,
        z1: f32,
        color: u32,
    ) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let steps = dx.max(dy);

        let z0 = z0 - LINE_DEPTH_BIAS;
        let z1 = z1 - LINE_DEPTH_BIAS;
        let mut buffer = self.as_framebuffer();

        if steps == 0 {
            buffer.set_pixel_with_depth(x0, y0, z0.min(z1), color);
            return;
        }

        let x_incr_direction = if x0 < x1 { 1 } else { -1 };
        let y_incr_direction = if y0 < y1 { 1 } else { -1 };

        // Positive error favours x movement, negative favours y.
        let mut err = dx - dy;
        let mut x = x0;
        let mut y = y0;
        let mut step = 0;

        loop {
            let t = step as f32 / steps as f32;
            buffer.set_pixel_with_depth(x, y, z0 + t * (z1 - z0), color);

            if x == x1 && y == y1 {
                break;
            }
            step += 1;

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += x_incr_direction;
            }
            if e2 < dx {
                err += dx;
                y += y_incr_direction;
            }
        }
    }

    /// Copies the colour buffer into `surface`, which must match the buffer size.
    pub fn blit(&self, surface: &mut RgbaImage) -> Result<(), RenderError> {
        if surface.dimensions() != (self.width, self.height) {
            return Err(RenderError::SurfaceSizeMismatch {
                expected: (self.width, self.height),
                actual: surface.dimensions(),
            });
        }
        for (pixel, &color) in surface.pixels_mut().zip(&self.color_buffer) {
            *pixel = colors::to_rgba(color);
        }
        Ok(())
    }

    /// Colour buffer as a new image.
    pub fn to_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width, self.height);
        for (pixel, &color) in image.pixels_mut().zip(&self.color_buffer) {
            *pixel = colors::to_rgba(color);
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipper::ClipVertex;
    use crate::colors::{BLACK, RED, WHITE};
    use approx::assert_relative_eq;

    fn pixel(renderer: &Renderer, x: u32, y: u32) -> u32 {
        renderer.color_buffer()[y as usize * renderer.width() as usize + x as usize]
    }

    #[test]
    fn viewport_maps_corners_to_corner_pixels() {
        let r = Renderer::new(101, 51);
        assert_relative_eq!(r.to_screen(Vec3::new(-1.0, 1.0, 0.3)), Vec3::new(0.0, 0.0, 0.3));
        assert_relative_eq!(r.to_screen(Vec3::new(1.0, -1.0, 0.0)), Vec3::new(100.0, 50.0, 0.0));
        assert_relative_eq!(r.to_screen(Vec3::ZERO), Vec3::new(50.0, 25.0, 0.0));
    }

    #[test]
    fn clear_resets_colour_and_depth() {
        let mut r = Renderer::new(4, 4);
        r.draw_line_bresenham(0, 0, 0.0, 3, 3, 0.0, RED);
        r.clear(WHITE);
        r.clear_depth();
        assert!(r.color_buffer().iter().all(|&c| c == WHITE));
        assert!(r.depth_buffer().iter().all(|&d| d == DEPTH_CLEAR));
    }

    #[test]
    fn bresenham_hits_both_endpoints() {
        let mut r = Renderer::new(10, 10);
        r.clear(BLACK);
        r.draw_line_bresenham(8, 1, 0.0, 1, 6, 0.0, RED);
        assert_eq!(pixel(&r, 8, 1), RED);
        assert_eq!(pixel(&r, 1, 6), RED);
        let lit = r.color_buffer().iter().filter(|&&c| c == RED).count();
        assert_eq!(lit, 8);
    }

    #[test]
    fn bresenham_interpolates_depth() {
        let mut r = Renderer::new(11, 1);
        r.draw_line_bresenham(0, 0, -1.0, 10, 0, 1.0, RED);
        assert_relative_eq!(r.depth_buffer()[5], -LINE_DEPTH_BIAS, epsilon = 1e-5);
    }

    #[test]
    fn full_screen_triangles_cover_every_pixel() {
        let mut r = Renderer::new(8, 8);
        let v = |x: f32, y: f32| ClipVertex::new(Vec3::new(x, y, 0.0), Vec3::Z);
        let a = ClipTriangle::new([v(-1.0, -1.0), v(1.0, -1.0), v(1.0, 1.0)]);
        let b = ClipTriangle::new([v(-1.0, -1.0), v(1.0, 1.0), v(-1.0, 1.0)]);
        r.fill_triangle(&a, Fill::Solid(RED));
        r.fill_triangle(&b, Fill::Solid(RED));
        assert!(r.color_buffer().iter().all(|&c| c == RED));
    }

    #[test]
    fn blit_checks_surface_size() {
        let mut r = Renderer::new(3, 2);
        r.clear(RED);
        let mut wrong = RgbaImage::new(2, 2);
        assert!(matches!(
            r.blit(&mut wrong),
            Err(RenderError::SurfaceSizeMismatch { .. })
        ));
        let mut surface = RgbaImage::new(3, 2);
        r.blit(&mut surface).unwrap();
        assert_eq!(colors::from_rgba(*surface.get_pixel(2, 1)), RED);
        assert_eq!(r.to_image(), surface);
    }
}
