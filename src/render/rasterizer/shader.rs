//! Pixel shaders for triangle rasterization.
//!
//! The rasterizer handles coverage, barycentric weights and the depth test.
//! A shader only turns the weights of one covered pixel into a colour.

use crate::math::Vec3;
use crate::texture::Texture;

/// Per-pixel colour computation.
///
/// `lambda` holds the screen-space barycentric weights `[λ₀, λ₁, λ₂]` of the
/// pixel, summing to 1 inside the triangle.
pub trait PixelShader {
    fn shade(&self, lambda: [f32; 3]) -> u32;
}

/// Constant colour for every pixel.
pub struct FlatShader {
    color: u32,
}

impl FlatShader {
    pub fn new(color: u32) -> Self {
        Self { color }
    }
}

impl PixelShader for FlatShader {
    #[inline]
    fn shade(&self, _lambda: [f32; 3]) -> u32 {
        self.color
    }
}

/// Perspective-correct nearest-neighbour texture lookup.
///
/// Each vertex carries `(u/w, v/w, 1/w)`. Those three quantities are linear
/// in screen space, so they are interpolated with the screen weights and the
/// true `(u, v)` recovered by dividing by the interpolated `1/w`.
pub struct TextureShader<'a> {
    texture: &'a Texture,
    uvs: [Vec3; 3],
}

impl<'a> TextureShader<'a> {
    pub fn new(texture: &'a Texture, uvs: [Vec3; 3]) -> Self {
        Self { texture, uvs }
    }

    #[inline]
    fn interpolate_uv(&self, lambda: [f32; 3]) -> (f32, f32) {
        let [a, b, c] = self.uvs;
        let u = lambda[0] * a.x + lambda[1] * b.x + lambda[2] * c.x;
        let v = lambda[0] * a.y + lambda[1] * b.y + lambda[2] * c.y;
        let q = lambda[0] * a.z + lambda[1] * b.z + lambda[2] * c.z;
        if q == 0.0 {
            (u, v)
        } else {
            (u / q, v / q)
        }
    }
}

impl PixelShader for TextureShader<'_> {
    #[inline]
    fn shade(&self, lambda: [f32; 3]) -> u32 {
        let (u, v) = self.interpolate_uv(lambda);
        self.texture.sample(u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLUE, GREEN, RED, WHITE};
    use approx::assert_relative_eq;

    #[test]
    fn flat_ignores_weights() {
        assert_eq!(FlatShader::new(RED).shade([0.2, 0.3, 0.5]), RED);
    }

    #[test]
    fn uv_is_divided_by_interpolated_q() {
        // Vertex 0 sits twice as far away as vertices 1 and 2.
        let uvs = [
            Vec3::new(0.0, 0.0, 0.5),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ];
        let texture = Texture::from_pixels(1, 1, vec![WHITE]).unwrap();
        let shader = TextureShader::new(&texture, uvs);
        let (u, v) = shader.interpolate_uv([0.5, 0.5, 0.0]);
        // (0.5 * 0 + 0.5 * 1) / (0.5 * 0.5 + 0.5 * 1)
        assert_relative_eq!(u, 0.5 / 0.75);
        assert_relative_eq!(v, 0.0);
    }

    #[test]
    fn samples_texture_at_vertices() {
        // Top row: red, green. Bottom row: blue, white.
        let texture = Texture::from_pixels(2, 2, vec![RED, GREEN, BLUE, WHITE]).unwrap();
        let uvs = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ];
        let shader = TextureShader::new(&texture, uvs);
        assert_eq!(shader.shade([1.0, 0.0, 0.0]), BLUE);
        assert_eq!(shader.shade([0.0, 1.0, 0.0]), WHITE);
        assert_eq!(shader.shade([0.0, 0.0, 1.0]), RED);
    }
}
