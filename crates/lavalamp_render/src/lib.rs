//! Lava Lamp Rendering Library
//!
//! This crate provides the wgpu-based renderer for the lava lamp scene.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera::OrbitCamera`] - Camera orbiting the lamp
//! - [`scene::LampScene`] - Lamp meshes, materials, sky and bloom
//! - [`pipeline::BloomPipeline`] - Bright pass, blur and composite
//! - [`renderable::GpuMesh`] - Core meshes uploaded to GPU buffers
//!
//! The animated body receives scene time through [`scene::TimeUniformWriter`],
//! which implements [`lavalamp_core::UniformTarget`].

pub mod context;
pub mod camera;
pub mod pipeline;
pub mod renderable;
pub mod scene;

pub use camera::OrbitCamera;
pub use context::{ContextError, RenderContext};
pub use renderable::GpuMesh;
pub use scene::{LampScene, LampSceneDescriptor, SceneError, TimeUniformWriter};

// Re-export core types for convenience
pub use lavalamp_core::{BloomSettings, SceneEnvironment, ShaderMaterial, StandardMaterial, UnlitMaterial};
