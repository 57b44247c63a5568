//! Depth-buffered drawing into an owned pixel buffer.

pub mod framebuffer;
pub mod rasterizer;
pub mod renderer;

pub use framebuffer::{pixel_count, FrameBuffer, DEPTH_CLEAR};
pub use rasterizer::{EdgeFunctionRasterizer, Fill, PixelShader, Rasterizer, Triangle};
pub use renderer::Renderer;
