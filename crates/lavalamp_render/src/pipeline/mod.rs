//! Rendering pipeline components
//!
//! This module contains the scene pipelines (sky, lamp meshes) and the bloom
//! post-processing chain that resolves the HDR target onto the surface.

pub mod bindings;
pub mod targets;
pub mod types;
pub mod background_pipeline;
pub mod bloom_pipeline;
pub mod mesh_pipeline;

// Re-export types
pub use types::{
    GpuVertex, FrameUniforms, StandardUniforms, UnlitUniforms, ShaderMaterialUniforms,
    BackgroundUniforms, LuminanceUniforms, BlurUniforms, CompositeUniforms,
};

// Re-export pipelines
pub use bindings::{uniform_layout, UniformBinding};
pub use targets::{HdrTarget, HDR_FORMAT, DEPTH_FORMAT};
pub use background_pipeline::BackgroundPipeline;
pub use bloom_pipeline::{BloomPipeline, bloom_size};
pub use mesh_pipeline::{BlendMode, MeshPipeline};
