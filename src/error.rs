//! Error types for the rendering pipeline.
//!
//! Three families, matching the three ways an operation can fail:
//! - [`GeometryError`]: caller supplied an invalid configuration (frame
//!   vectors that are not orthogonal or of zero length, bad view extents).
//! - [`LoadError`]: an external resource (mesh file or text) could not be read
//!   or is malformed.
//! - [`RenderError`]: an internal invariant needed by the render path does not
//!   hold (no camera, wrong surface size, poisoned lock).
//!
//! Geometry that is clipped away entirely is never an error.

use std::fmt;
use std::io;

/// Invalid geometric configuration. The target object is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// One of the supplied vectors has (near) zero length.
    ZeroLength,
    /// The normalised vectors are not perpendicular; `dot` is their dot product.
    NotOrthogonal { dot: f32 },
    /// A face or edge refers to a vertex that does not exist.
    IndexOutOfRange { index: usize, count: usize },
    /// View window must be positive and `0 < near < far`.
    InvalidExtents {
        width: f32,
        height: f32,
        near: f32,
        far: f32,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::ZeroLength => write!(f, "orientation vector has zero length"),
            GeometryError::NotOrthogonal { dot } => {
                write!(f, "orientation vectors are not orthogonal (dot = {})", dot)
            }
            GeometryError::IndexOutOfRange { index, count } => {
                write!(f, "vertex index {} out of range ({} vertices)", index, count)
            }
            GeometryError::InvalidExtents {
                width,
                height,
                near,
                far,
            } => write!(
                f,
                "invalid view extents {}x{} with depth range {}..{}",
                width, height, near, far
            ),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Failure to ingest mesh data. A failed load never mutates the scene.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    /// A line could not be parsed.
    Parse { line: usize, message: String },
    /// A face or line refers to a vertex or texture coordinate that does not exist.
    IndexOutOfRange {
        line: usize,
        index: i64,
        count: usize,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "mesh IO error: {}", err),
            LoadError::Parse { line, message } => {
                write!(f, "mesh parse error on line {}: {}", line, message)
            }
            LoadError::IndexOutOfRange { line, index, count } => write!(
                f,
                "index {} out of range on line {} ({} available)",
                index, line, count
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Parse { .. } | LoadError::IndexOutOfRange { .. } => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

/// The render path found its preconditions broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// No camera has been selected for rendering.
    NoActiveCamera,
    /// The scene has not been given a surface size (zero width or height).
    NoSurface,
    /// The output surface does not match the scene's buffer size.
    SurfaceSizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    /// A thread panicked while holding the scene lock.
    LockPoisoned,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NoActiveCamera => write!(f, "no active render camera"),
            RenderError::NoSurface => write!(f, "scene has no surface to render into"),
            RenderError::SurfaceSizeMismatch { expected, actual } => write!(
                f,
                "surface is {}x{} but scene buffers are {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            RenderError::LockPoisoned => write!(f, "scene lock poisoned"),
        }
    }
}

impl std::error::Error for RenderError {}
