//! Math Library
//!
//! Small vector and matrix types used by the lava lamp scene.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Mat4`] - 4x4 column-major matrix stored as nested arrays, ready for GPU upload

mod vec3;
pub mod mat4;

pub use vec3::Vec3;
pub use mat4::Mat4;
