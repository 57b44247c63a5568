use image::RgbaImage;

use crate::colors;
use crate::render::pixel_count;

/// A 2D texture for nearest-neighbour texture mapping.
///
/// Pixels are stored top row first, packed as `0xAARRGGBB`. Decoding image
/// files is left to the caller; build one from an already decoded
/// [`RgbaImage`] or from raw packed pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    data: Vec<u32>,
    width: u32,
    height: u32,
}

impl Texture {
    /// Copies a decoded image. Returns `None` for an empty image.
    pub fn from_image(image: &RgbaImage) -> Option<Self> {
        let (width, height) = image.dimensions();
        let data = image.pixels().map(|p| colors::from_rgba(*p)).collect();
        Self::from_pixels(width, height, data)
    }

    /// Wraps packed pixels. Returns `None` if the size is zero or does not match `data`.
    pub fn from_pixels(width: u32, height: u32, data: Vec<u32>) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != pixel_count(width, height) {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    /// `cells` x `cells` checkerboard of `size` x `size` pixels.
    pub fn checkerboard(size: u32, cells: u32, a: u32, b: u32) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let side = size as usize;
        let cell = cell as usize;
        let data = (0..pixel_count(size, size))
            .map(|i| {
                let (x, y) = (i % side, i / side);
                if (x / cell + y / cell) % 2 == 0 {
                    a
                } else {
                    b
                }
            })
            .collect();
        Self {
            data,
            width: size,
            height: size,
        }
    }

    /// Nearest-neighbour sample.
    ///
    /// `u` runs left to right and `v` runs bottom to top, both clamped to
    /// `[0, 1]`. Pixel `x = round(u * (w - 1))`, `y = (h - 1) - round(v * (h - 1))`.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) };
        let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        let x = (u * (self.width - 1) as f32).round() as usize;
        let y = (self.height - 1) as usize - (v * (self.height - 1) as f32).round() as usize;
        self.data[y * self.width as usize + x]
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLUE, GREEN, RED, WHITE};

    fn quad() -> Texture {
        // Top row: red, green. Bottom row: blue, white.
        Texture::from_pixels(2, 2, vec![RED, GREEN, BLUE, WHITE]).unwrap()
    }

    #[test]
    fn v_is_read_bottom_up() {
        let t = quad();
        assert_eq!(t.sample(0.0, 0.0), BLUE);
        assert_eq!(t.sample(1.0, 0.0), WHITE);
        assert_eq!(t.sample(0.0, 1.0), RED);
        assert_eq!(t.sample(1.0, 1.0), GREEN);
    }

    #[test]
    fn out_of_range_uv_is_clamped() {
        let t = quad();
        assert_eq!(t.sample(-3.0, 7.0), RED);
        assert_eq!(t.sample(f32::NAN, 2.0), RED);
    }

    #[test]
    fn rejects_mismatched_pixels() {
        assert!(Texture::from_pixels(2, 2, vec![RED; 3]).is_none());
        assert!(Texture::from_pixels(0, 0, Vec::new()).is_none());
    }

    #[test]
    fn rejects_empty_image() {
        assert!(Texture::from_image(&RgbaImage::new(0, 0)).is_none());
        assert!(Texture::from_image(&RgbaImage::new(3, 0)).is_none());
    }

    #[test]
    fn from_image_keeps_row_order() {
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, crate::colors::to_rgba(RED));
        img.put_pixel(0, 1, crate::colors::to_rgba(BLUE));
        let t = Texture::from_image(&img).unwrap();
        assert_eq!(t.sample(0.5, 1.0), RED);
        assert_eq!(t.sample(0.5, 0.0), BLUE);
    }

    #[test]
    fn checkerboard_alternates() {
        let t = Texture::checkerboard(4, 2, RED, BLUE);
        assert_eq!(t.sample(0.0, 1.0), RED);
        assert_eq!(t.sample(1.0, 1.0), BLUE);
        assert_eq!(t.sample(1.0, 0.0), RED);
    }
}
