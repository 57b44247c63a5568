//! Packed `0xAARRGGBB` colours and conversions to and from `image` pixels.

use image::Rgba;

pub const BLACK: u32 = 0xFF00_0000;
pub const WHITE: u32 = 0xFFFF_FFFF;
pub const RED: u32 = 0xFFFF_0000;
pub const GREEN: u32 = 0xFF00_FF00;
pub const BLUE: u32 = 0xFF00_00FF;
pub const YELLOW: u32 = 0xFFFF_FF00;
pub const CYAN: u32 = 0xFF00_FFFF;
pub const MAGENTA: u32 = 0xFFFF_00FF;
pub const GRAY: u32 = 0xFF80_8080;

#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    argb(0xFF, r, g, b)
}

/// Splits a packed colour into `[r, g, b, a]` bytes.
#[inline]
pub const fn channels(color: u32) -> [u8; 4] {
    [
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
        (color >> 24) as u8,
    ]
}

#[inline]
pub fn to_rgba(color: u32) -> Rgba<u8> {
    Rgba(channels(color))
}

#[inline]
pub fn from_rgba(pixel: Rgba<u8>) -> u32 {
    let [r, g, b, a] = pixel.0;
    argb(a, r, g, b)
}
