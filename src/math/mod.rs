pub mod mat4;
pub mod plane;
pub mod vec3;
pub mod vec4;

pub use mat4::Mat4;
pub use plane::Plane;
pub use vec3::Vec3;
pub use vec4::Vec4;
