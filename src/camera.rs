//! Camera with an orthonormal frame, a near-plane view window and a projection.
//!
//! # Coordinate System
//!
//! World space is right-handed. In its own model space a camera sits at the
//! origin looking down `-Z` with `+Y` up and `+X` right
//! ([`Orientation::CAMERA_MODEL`]).
//!
//! # Cached State
//!
//! The model-to-world matrix, world-to-screen matrix and the six world-space
//! clip planes are derived data. Mutators only touch the source fields; call
//! [`Camera::update`] (the scene does so before every frame) to refresh them.

use crate::error::GeometryError;
use crate::math::{Mat4, Plane, Vec3};
use crate::projection::Projection;
use crate::transform::Orientation;

/// Index of each plane in [`Camera::clip_planes`].
pub mod plane_index {
    pub const NEAR: usize = 0;
    pub const FAR: usize = 1;
    pub const LEFT: usize = 2;
    pub const RIGHT: usize = 3;
    pub const TOP: usize = 4;
    pub const BOTTOM: usize = 5;
}

#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    orientation: Orientation,
    width: f32,
    height: f32,
    near: f32,
    far: f32,
    projection: Projection,

    model_to_world: Mat4,
    world_to_screen: Mat4,
    clip_planes: [Plane; 6],
}

impl Camera {
    /// Creates a camera and computes its derived matrices and planes.
    ///
    /// `width` and `height` are the extents of the view window on the near plane.
    pub fn new(
        origin: Vec3,
        orientation: Orientation,
        width: f32,
        height: f32,
        near: f32,
        far: f32,
        projection: Projection,
    ) -> Result<Self, GeometryError> {
        validate_extents(width, height, near, far)?;
        let placeholder = Plane {
            point: Vec3::ZERO,
            normal: Vec3::Z,
        };
        let mut camera = Self {
            origin,
            orientation,
            width,
            height,
            near,
            far,
            projection,
            model_to_world: Mat4::IDENTITY,
            world_to_screen: Mat4::IDENTITY,
            clip_planes: [placeholder; 6],
        };
        camera.update();
        Ok(camera)
    }

    pub fn perspective(
        origin: Vec3,
        direction: Vec3,
        up: Vec3,
        width: f32,
        height: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, GeometryError> {
        let orientation = Orientation::from_direction_up(direction, up)?;
        Self::new(origin, orientation, width, height, near, far, Projection::Perspective)
    }

    pub fn orthogonal(
        origin: Vec3,
        direction: Vec3,
        up: Vec3,
        width: f32,
        height: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, GeometryError> {
        let orientation = Orientation::from_direction_up(direction, up)?;
        Self::new(origin, orientation, width, height, near, far, Projection::Orthogonal)
    }

    /// Perspective camera sized from horizontal and vertical fields of view (radians).
    pub fn perspective_fov(
        origin: Vec3,
        direction: Vec3,
        up: Vec3,
        fov_x: f32,
        fov_y: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, GeometryError> {
        let width = 2.0 * near * (fov_x / 2.0).tan();
        let height = 2.0 * near * (fov_y / 2.0).tan();
        Self::perspective(origin, direction, up, width, height, near, far)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    pub fn direction(&self) -> Vec3 {
        self.orientation.direction()
    }

    pub fn up(&self) -> Vec3 {
        self.orientation.up()
    }

    pub fn right(&self) -> Vec3 {
        self.orientation.right()
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn model_to_world(&self) -> &Mat4 {
        &self.model_to_world
    }

    pub fn world_to_screen(&self) -> &Mat4 {
        &self.world_to_screen
    }

    /// World-space view volume, ordered near, far, left, right, top, bottom.
    /// Normals point into the volume.
    pub fn clip_planes(&self) -> &[Plane; 6] {
        &self.clip_planes
    }

    // =========================================================================
    // Orientation
    // =========================================================================

    /// Sets direction and up; right is derived. On error nothing changes.
    pub fn set_orientation(&mut self, direction: Vec3, up: Vec3) -> Result<(), GeometryError> {
        self.orientation = Orientation::from_direction_up(direction, up)?;
        Ok(())
    }

    /// Sets up and right; direction is derived. On error nothing changes.
    pub fn set_orientation_up_right(&mut self, up: Vec3, right: Vec3) -> Result<(), GeometryError> {
        self.orientation = Orientation::from_up_right(up, right)?;
        Ok(())
    }

    /// Sets right and direction; up is derived. On error nothing changes.
    pub fn set_orientation_right_direction(
        &mut self,
        right: Vec3,
        direction: Vec3,
    ) -> Result<(), GeometryError> {
        self.orientation = Orientation::from_right_direction(right, direction)?;
        Ok(())
    }

    /// Points the camera at `target`, keeping roll as close to `up_hint` as possible.
    pub fn look_at(&mut self, target: Vec3, up_hint: Vec3) -> Result<(), GeometryError> {
        self.orientation = Orientation::looking_at(self.origin, target, up_hint)?;
        Ok(())
    }

    /// Rotates the frame about one of the camera's own axes.
    pub fn rotate(&mut self, axis: CameraAxis, angle: f32) {
        let axis = self.axis(axis);
        self.orientation = self.orientation.rotated(axis, angle);
    }

    /// Rotates the frame about an arbitrary world-space axis through the camera origin.
    pub fn rotate_about(&mut self, axis: Vec3, angle: f32) {
        self.orientation = self.orientation.rotated(axis, angle);
    }

    // =========================================================================
    // Movement
    // =========================================================================

    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.origin += delta;
    }

    /// Moves along one of the camera's own axes.
    pub fn pan(&mut self, axis: CameraAxis, distance: f32) {
        self.origin += self.axis(axis) * distance;
    }

    fn axis(&self, axis: CameraAxis) -> Vec3 {
        match axis {
            CameraAxis::Forward => self.direction(),
            CameraAxis::Right => self.right(),
            CameraAxis::Up => self.up(),
        }
    }

    // =========================================================================
    // View Volume
    // =========================================================================

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    pub fn set_extents(&mut self, width: f32, height: f32) -> Result<(), GeometryError> {
        validate_extents(width, height, self.near, self.far)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn set_depth_range(&mut self, near: f32, far: f32) -> Result<(), GeometryError> {
        validate_extents(self.width, self.height, near, far)?;
        self.near = near;
        self.far = far;
        Ok(())
    }

    // =========================================================================
    // Matrix Generation
    // =========================================================================

    /// Recomputes every cached quantity from the current origin, frame and extents.
    pub fn update(&mut self) {
        self.compute_model_to_world();
        self.compute_world_to_screen();
        self.compute_clip_planes();
    }

    /// `T(origin) * R`, where `R` rotates the camera model frame onto the current frame.
    pub fn compute_model_to_world(&mut self) {
        self.model_to_world = Mat4::translation(self.origin)
            * self.orientation.alignment_from(&Orientation::CAMERA_MODEL);
    }

    /// Projection times view, where view is the inverse of the rigid model-to-world.
    ///
    /// For rotation `R` and origin `P`: view = `R^T * T(-P)`.
    pub fn compute_world_to_screen(&mut self) {
        let rotation = self.orientation.alignment_from(&Orientation::CAMERA_MODEL);
        let view = rotation.transpose() * Mat4::translation(-self.origin);
        self.world_to_screen =
            self.projection.matrix(self.width, self.height, self.near, self.far) * view;
    }

    /// Rebuilds the six world-space frustum planes.
    pub fn compute_clip_planes(&mut self) {
        let d = self.direction();
        let half_w = self.right() * (self.width / 2.0);
        let half_h = self.up() * (self.height / 2.0);
        let ratio = self.projection.far_window_ratio(self.near, self.far);

        let near_center = self.origin + d * self.near;
        let far_center = self.origin + d * self.far;
        let interior = self.origin + d * ((self.near + self.far) / 2.0);

        let near_corner = |sx: f32, sy: f32| near_center + half_w * sx + half_h * sy;
        let far_corner = |sx: f32, sy: f32| far_center + (half_w * sx + half_h * sy) * ratio;

        // Side plane through two near corners and one far corner.
        let side = |a: Vec3, b: Vec3, c: Vec3| Plane {
            point: a,
            normal: (b - a).cross(c - a).normalize(),
        }
        .facing(interior);

        self.clip_planes[plane_index::NEAR] = Plane {
            point: near_center,
            normal: d,
        };
        self.clip_planes[plane_index::FAR] = Plane {
            point: far_center,
            normal: -d,
        };
        self.clip_planes[plane_index::LEFT] = side(
            near_corner(-1.0, 1.0),
            near_corner(-1.0, -1.0),
            far_corner(-1.0, 1.0),
        );
        self.clip_planes[plane_index::RIGHT] = side(
            near_corner(1.0, 1.0),
            near_corner(1.0, -1.0),
            far_corner(1.0, 1.0),
        );
        self.clip_planes[plane_index::TOP] = side(
            near_corner(-1.0, 1.0),
            near_corner(1.0, 1.0),
            far_corner(-1.0, 1.0),
        );
        self.clip_planes[plane_index::BOTTOM] = side(
            near_corner(-1.0, -1.0),
            near_corner(1.0, -1.0),
            far_corner(-1.0, -1.0),
        );
    }
}

fn validate_extents(width: f32, height: f32, near: f32, far: f32) -> Result<(), GeometryError> {
    let valid = width > 0.0 && height > 0.0 && near > 0.0 && far > near && far.is_finite();
    if valid {
        Ok(())
    } else {
        Err(GeometryError::InvalidExtents {
            width,
            height,
            near,
            far,
        })
    }
}

// =============================================================================
// Camera Controller
// =============================================================================

/// One of the camera's own axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAxis {
    Forward,
    Right,
    Up,
}

/// A held input, scaled by elapsed time when applied.
///
/// `amount` is a signed input strength, normally `-1.0` or `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    Pan { axis: CameraAxis, amount: f32 },
    Rotate { axis: CameraAxis, amount: f32 },
}

/// Turns held commands into camera motion at fixed speeds.
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Translation speed in world units per second.
    pub pan_speed: f32,
    /// Rotation speed in radians per second.
    pub tilt_speed: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            pan_speed: 10.0,
            tilt_speed: std::f32::consts::FRAC_PI_2,
        }
    }
}

impl CameraController {
    pub fn new(pan_speed: f32, tilt_speed: f32) -> Self {
        Self {
            pan_speed,
            tilt_speed,
        }
    }

    /// Applies each command for `delta_time` seconds.
    pub fn apply(&self, camera: &mut Camera, commands: &[CameraCommand], delta_time: f32) {
        for command in commands {
            match *command {
                CameraCommand::Pan { axis, amount } => {
                    camera.pan(axis, amount * self.pan_speed * delta_time)
                }
                CameraCommand::Rotate { axis, amount } => {
                    camera.rotate(axis, amount * self.tilt_speed * delta_time)
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
