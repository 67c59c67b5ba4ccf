//! Core types for the lava lamp scene
//!
//! This crate is GPU-agnostic. It owns the scene's only animated state, the
//! accumulated time uniform, along with everything the renderer needs to
//! describe the scene:
//!
//! - [`FrameAnimator`] / [`TimeUniform`] - per-frame time accumulation and publication
//! - [`FrameClock`] - capped wall-clock frame deltas
//! - [`FrameStats`] - rolling FPS statistics for the debug overlay
//! - [`LampModel`] - procedural lamp with named geometries
//! - [`SceneEnvironment`] - named environment presets used as background and lighting
//! - [`BloomSettings`] - threshold glow parameters
//! - Materials: [`StandardMaterial`], [`UnlitMaterial`], [`ShaderMaterial`]

pub mod animation;
pub mod bloom;
pub mod clock;
pub mod color;
pub mod environment;
pub mod lamp;
pub mod material;
pub mod mesh;
pub mod stats;

pub use animation::{FrameAnimator, TimeUniform, UniformTarget};
pub use bloom::{BloomError, BloomSettings, ToneMapping, gaussian_weights, BLUR_TAPS};
pub use clock::FrameClock;
pub use color::{Color, ColorError};
pub use environment::{EnvironmentError, EnvironmentLayer, EnvironmentPreset, Gradient, SceneEnvironment};
pub use lamp::{LampModel, ModelError, LAMP_BOTTOM, LAMP_CAPS, LAVA_LAMP_BODY};
pub use material::{ShaderError, ShaderMaterial, ShaderSource, ShaderStage, StandardMaterial, UnlitMaterial};
pub use mesh::{Mesh, MeshVertex};
pub use stats::FrameStats;

// Re-export math types for convenience
pub use lavalamp_math::{Mat4, Vec3};
