//! Orthonormal orientation frames and model-to-world composition.
//!
//! Cameras and meshes both carry an [`Orientation`]: three mutually
//! perpendicular unit vectors `direction`, `up` and `right` with
//! `right = direction x up`. Each object kind also has a fixed *model* frame
//! describing which model-space axes those vectors start from; the
//! model-to-world matrix is the rotation taking the model frame onto the
//! world frame, composed with scale and translation.

use crate::error::GeometryError;
use crate::math::{Mat4, Vec3};

/// Maximum `|dot|` between two normalised vectors for them to count as orthogonal.
pub const ORTHOGONALITY_EPSILON: f32 = 1e-4;

/// A right-handed orthonormal frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    direction: Vec3,
    up: Vec3,
    right: Vec3,
}

impl Orientation {
    /// Camera model frame: looks down `-Z`, up is `+Y`, right is `+X`.
    pub const CAMERA_MODEL: Orientation = Orientation {
        direction: Vec3::NEG_Z,
        up: Vec3::Y,
        right: Vec3::X,
    };

    /// Mesh model frame: faces `+X`, up is `+Y`, right is `+Z`.
    pub const MESH_MODEL: Orientation = Orientation {
        direction: Vec3::X,
        up: Vec3::Y,
        right: Vec3::Z,
    };

    // ============ Construction ============

    /// Frame from a direction and an up vector; right is derived.
    pub fn from_direction_up(direction: Vec3, up: Vec3) -> Result<Self, GeometryError> {
        let (direction, up) = checked_pair(direction, up)?;
        Ok(Self {
            direction,
            up,
            right: direction.cross(up).normalize(),
        })
    }

    /// Frame from an up and a right vector; direction is derived.
    pub fn from_up_right(up: Vec3, right: Vec3) -> Result<Self, GeometryError> {
        let (up, right) = checked_pair(up, right)?;
        Ok(Self {
            direction: up.cross(right).normalize(),
            up,
            right,
        })
    }

    /// Frame from a right and a direction vector; up is derived.
    pub fn from_right_direction(right: Vec3, direction: Vec3) -> Result<Self, GeometryError> {
        let (right, direction) = checked_pair(right, direction)?;
        Ok(Self {
            direction,
            up: right.cross(direction).normalize(),
            right,
        })
    }

    /// Frame looking from `eye` toward `target`, with `up_hint` picking the roll.
    ///
    /// The hint only needs to be non-parallel to the view direction; it is
    /// projected onto the plane perpendicular to it.
    pub fn looking_at(eye: Vec3, target: Vec3, up_hint: Vec3) -> Result<Self, GeometryError> {
        let direction = (target - eye)
            .try_normalize()
            .ok_or(GeometryError::ZeroLength)?;
        let up = up_hint - direction * up_hint.dot(direction);
        Self::from_direction_up(direction, up)
    }

    // ============ Queries ============

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// True when all three axes are unit length and mutually perpendicular.
    pub fn is_orthonormal(&self) -> bool {
        let unit = |v: Vec3| (v.magnitude() - 1.0).abs() < ORTHOGONALITY_EPSILON;
        unit(self.direction)
            && unit(self.up)
            && unit(self.right)
            && self.direction.dot(self.up).abs() < ORTHOGONALITY_EPSILON
            && self.direction.dot(self.right).abs() < ORTHOGONALITY_EPSILON
            && self.up.dot(self.right).abs() < ORTHOGONALITY_EPSILON
    }

    // ============ Rotation ============

    /// Rotates the whole frame by `angle` radians about `axis`.
    ///
    /// The result is re-orthonormalised (Gram-Schmidt on direction then up) so
    /// repeated small rotations do not drift.
    pub fn rotated(&self, axis: Vec3, angle: f32) -> Self {
        let rotation = Mat4::rotation_axis_angle(axis, angle);
        let direction = rotation.transform_vector(self.direction);
        let up = rotation.transform_vector(self.up);
        Self::orthonormalized(direction, up).unwrap_or(*self)
    }

    fn orthonormalized(direction: Vec3, up: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        let up = (up - direction * up.dot(direction)).try_normalize()?;
        Some(Self {
            direction,
            up,
            right: direction.cross(up),
        })
    }

    // ============ Matrix Generation ============

    /// Rotation taking `model` onto this frame.
    ///
    /// Built in two steps: align the model direction with this direction, then
    /// spin about the new direction so the rotated model up meets this up.
    /// Right follows from handedness.
    pub fn alignment_from(&self, model: &Orientation) -> Mat4 {
        let forward = Mat4::rotation_between(model.direction, self.direction, model.up);
        let partial_up = forward.transform_vector(model.up);
        let spin = Mat4::rotation_between(partial_up, self.up, self.direction);
        spin * forward
    }
}

/// Normalises both vectors and checks that they are perpendicular.
fn checked_pair(a: Vec3, b: Vec3) -> Result<(Vec3, Vec3), GeometryError> {
    let a = a.try_normalize().ok_or(GeometryError::ZeroLength)?;
    let b = b.try_normalize().ok_or(GeometryError::ZeroLength)?;
    let dot = a.dot(b);
    if dot.abs() >= ORTHOGONALITY_EPSILON {
        return Err(GeometryError::NotOrthogonal { dot });
    }
    Ok((a, b))
}

/// Model-to-world matrix: `T(origin) * R * S`, scale applied first.
pub fn model_to_world(origin: Vec3, frame: &Orientation, model: &Orientation, scale: Vec3) -> Mat4 {
    Mat4::translation(origin) * frame.alignment_from(model) * Mat4::scaling(scale)
}
