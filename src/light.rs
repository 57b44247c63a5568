//! Light sources.
//!
//! Lights are registered with the scene and kept with their placement and
//! colour, but no shading model reads them: every pixel is coloured by its
//! face, edge or texture alone.

use log::debug;

use crate::colors;
use crate::error::GeometryError;
use crate::math::Vec3;

/// A light infinitely far away whose rays all travel along `direction`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistantLight {
    origin: Vec3,
    direction: Vec3,
    pub color: u32,
    pub intensity: f32,
}

impl DistantLight {
    /// Fails if `direction` has zero length.
    pub fn new(origin: Vec3, direction: Vec3, color: u32, intensity: f32) -> Result<Self, GeometryError> {
        let direction = direction.try_normalize().ok_or(GeometryError::ZeroLength)?;
        debug!("distant light at ({}, {}, {})", origin.x, origin.y, origin.z);
        Ok(Self {
            origin,
            direction,
            color,
            intensity,
        })
    }

    /// White light of full intensity pointing from `origin` at `target`.
    pub fn pointed_at(origin: Vec3, target: Vec3) -> Result<Self, GeometryError> {
        Self::new(origin, target - origin, colors::WHITE, 1.0)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit direction the light travels in.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    pub fn set_direction(&mut self, direction: Vec3) -> Result<(), GeometryError> {
        self.direction = direction.try_normalize().ok_or(GeometryError::ZeroLength)?;
        Ok(())
    }
}
