//! Plane clipping for segments and triangles.
//!
//! - [`primitive`]: clipping a single primitive against one plane or a list
//!   of planes. Triangles keep their winding, segments their endpoint order.
//! - [`pipeline`]: the two-stage path a camera uses, from world space through
//!   the perspective divide into the `[-1, 1]` cube.

pub mod pipeline;
pub mod primitive;

pub use pipeline::{ClipPipeline, CANONICAL_CUBE};
pub use primitive::{
    clip_segment, clip_segment_against, clip_triangle, clip_triangle_against, ClipTriangle,
    ClipVertex, Segment, TriangleClip,
};
