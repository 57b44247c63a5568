//! Frame buffer abstraction for 2D pixel access.
//!
//! Provides a view into color and depth buffers with bounds-checked access.
//! The depth buffer enables hidden surface removal via the z-buffer algorithm.

/// Depth written by a clear. Canonical depth lies in `[-1, 1]`, so every
/// rasterized pixel passes the test against it.
pub const DEPTH_CLEAR: f32 = 2.0;

/// Number of pixels in a `width` x `height` buffer, computed without `u32` overflow.
#[inline]
pub fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// A view into color and depth buffers.
///
/// Wraps 1D slices with width/height metadata to enable safe 2D pixel access.
/// This is a borrowed view, not an owning type; create one when buffers and
/// dimensions need to travel together.
///
/// # Depth Buffer
///
/// The depth buffer stores canonical `z` after the perspective divide: `-1` on
/// the near plane, `+1` on the far plane. Smaller is closer.
pub struct FrameBuffer<'a> {
    color_buffer: &'a mut [u32],
    depth_buffer: &'a mut [f32],
    width: u32,
    height: u32,
}

impl<'a> FrameBuffer<'a> {
    pub fn new(
        color_buffer: &'a mut [u32],
        depth_buffer: &'a mut [f32],
        width: u32,
        height: u32,
    ) -> Self {
        debug_assert_eq!(
            color_buffer.len(),
            pixel_count(width, height),
            "Color buffer size doesn't match dimensions"
        );
        debug_assert_eq!(
            depth_buffer.len(),
            pixel_count(width, height),
            "Depth buffer size doesn't match dimensions"
        );
        Self {
            color_buffer,
            depth_buffer,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Set a pixel at (x, y) with depth testing.
    ///
    /// Written only if `depth` is strictly less than the stored depth, so on a
    /// tie the earlier pixel stays. Out-of-bounds coordinates are ignored.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, color: u32) {
        if let Some(idx) = self.index(x, y) {
            if depth < self.depth_buffer[idx] {
                self.depth_buffer[idx] = depth;
                self.color_buffer[idx] = color;
            }
        }
    }

    /// Set a pixel without depth testing.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(idx) = self.index(x, y) {
            self.color_buffer[idx] = color;
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|idx| self.color_buffer[idx])
    }

    #[inline]
    pub fn get_depth(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|idx| self.depth_buffer[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, BLUE, RED};

    #[test]
    fn closer_pixel_wins_and_ties_keep_existing() {
        let mut color = vec![BLACK; 4];
        let mut depth = vec![DEPTH_CLEAR; 4];
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 2, 2);

        fb.set_pixel_with_depth(1, 0, 0.5, RED);
        fb.set_pixel_with_depth(1, 0, 0.5, BLUE);
        assert_eq!(fb.get_pixel(1, 0), Some(RED));

        fb.set_pixel_with_depth(1, 0, 0.9, BLUE);
        assert_eq!(fb.get_pixel(1, 0), Some(RED));

        fb.set_pixel_with_depth(1, 0, -0.2, BLUE);
        assert_eq!(fb.get_pixel(1, 0), Some(BLUE));
        assert_eq!(fb.get_depth(1, 0), Some(-0.2));
    }

    #[test]
    fn pixel_count_does_not_wrap() {
        assert_eq!(pixel_count(800, 600), 480_000);
        assert_eq!(pixel_count(70_000, 70_000), 4_900_000_000u64 as usize);
        assert_eq!(pixel_count(u32::MAX, 0), 0);
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut color = vec![BLACK; 4];
        let mut depth = vec![DEPTH_CLEAR; 4];
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 2, 2);
        fb.set_pixel(-1, 0, RED);
        fb.set_pixel_with_depth(2, 1, 0.0, RED);
        assert_eq!(fb.get_pixel(2, 0), None);
        assert!(color.iter().all(|&c| c == BLACK));
    }
}
