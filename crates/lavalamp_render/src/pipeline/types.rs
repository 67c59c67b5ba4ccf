//! GPU-compatible data types
//!
//! These types are designed to match the WGSL struct layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use lavalamp_core::{BloomSettings, Gradient, MeshVertex, BLUR_TAPS};
use lavalamp_math::mat4::{self, Mat4};

/// A mesh vertex as uploaded to the GPU
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuVertex {
    /// Model-space position
    pub position: [f32; 3],
    /// Model-space normal
    pub normal: [f32; 3],
    /// Lathe texture coordinate (u around, v up)
    pub uv: [f32; 2],
}

impl From<&MeshVertex> for GpuVertex {
    fn from(v: &MeshVertex) -> Self {
        Self {
            position: v.position.to_array(),
            normal: v.normal.to_array(),
            uv: v.uv,
        }
    }
}

/// Per-frame camera and lighting uniforms (group 0 of every mesh shader)
/// Layout: 128 bytes (must match `FrameUniforms` in the mesh shaders)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    /// Projection * view (64 bytes)
    pub view_proj: Mat4,
    /// Camera world position, w unused (16 bytes)
    pub camera_position: [f32; 4],
    /// Lighting environment gradient, rgb per stop (48 bytes)
    pub env_zenith: [f32; 4],
    pub env_horizon: [f32; 4],
    /// Ground color; w carries the gradient blur
    pub env_ground: [f32; 4],
}

impl FrameUniforms {
    /// Pack camera matrices and the lighting gradient
    pub fn new(view_proj: Mat4, camera_position: [f32; 3], lighting: &Gradient) -> Self {
        Self {
            view_proj,
            camera_position: [camera_position[0], camera_position[1], camera_position[2], 1.0],
            env_zenith: lighting.zenith.to_rgba(0.0),
            env_horizon: lighting.horizon.to_rgba(0.0),
            env_ground: lighting.ground.to_rgba(lighting.blur),
        }
    }
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self::new(mat4::IDENTITY, [0.0, 0.0, 5.0], &Gradient::BLACK)
    }
}

/// Lit metallic material (caps)
/// Layout: 96 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct StandardUniforms {
    pub model: Mat4,
    /// Linear base color, alpha unused
    pub color: [f32; 4],
    /// x = metalness, y = roughness
    pub params: [f32; 4],
}

/// Flat emitter (base)
/// Layout: 80 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct UnlitUniforms {
    pub model: Mat4,
    /// Linear color, may exceed 1.0
    pub color: [f32; 4],
}

/// Custom shader material inputs (body)
/// Layout: 80 bytes (must match `LavaUniforms` in lava.vert.wgsl / lava.frag.wgsl)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ShaderMaterialUniforms {
    pub model: Mat4,
    /// Accumulated scene time in seconds
    pub time: f32,
    pub _padding: [f32; 3],
}

/// Background sky uniforms
/// Layout: 112 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BackgroundUniforms {
    /// Inverse of projection * view, to rebuild view rays
    pub inv_view_proj: Mat4,
    pub zenith: [f32; 4],
    pub horizon: [f32; 4],
    /// w carries the gradient blur
    pub ground: [f32; 4],
}

impl BackgroundUniforms {
    pub fn new(inv_view_proj: Mat4, gradient: &Gradient) -> Self {
        Self {
            inv_view_proj,
            zenith: gradient.zenith.to_rgba(0.0),
            horizon: gradient.horizon.to_rgba(0.0),
            ground: gradient.ground.to_rgba(gradient.blur),
        }
    }
}

/// Bright-pass parameters
/// Layout: 16 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LuminanceUniforms {
    pub threshold: f32,
    pub smoothing: f32,
    pub _padding: [f32; 2],
}

impl From<&BloomSettings> for LuminanceUniforms {
    fn from(s: &BloomSettings) -> Self {
        Self {
            threshold: s.luminance_threshold,
            smoothing: s.knee_width(),
            _padding: [0.0; 2],
        }
    }
}

/// One separable blur direction
/// Layout: 48 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BlurUniforms {
    /// (1, 0) for horizontal, (0, 1) for vertical
    pub direction: [f32; 2],
    /// 1 / texture size
    pub texel_size: [f32; 2],
    /// Kernel weights w0..w3
    pub weights: [f32; 4],
    /// Kernel weight w4, rest unused
    pub weights_tail: [f32; 4],
}

impl BlurUniforms {
    pub fn new(direction: [f32; 2], size: (u32, u32), kernel: [f32; BLUR_TAPS]) -> Self {
        Self {
            direction,
            texel_size: [1.0 / size.0.max(1) as f32, 1.0 / size.1.max(1) as f32],
            weights: [kernel[0], kernel[1], kernel[2], kernel[3]],
            weights_tail: [kernel[4], 0.0, 0.0, 0.0],
        }
    }
}

/// Final composite parameters
/// Layout: 16 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CompositeUniforms {
    pub bloom_intensity: f32,
    /// 0 = clamp, 1 = ACES
    pub tone_mapping: u32,
    pub _padding: [f32; 2],
}

impl From<&BloomSettings> for CompositeUniforms {
    fn from(s: &BloomSettings) -> Self {
        Self {
            bloom_intensity: s.effective_intensity(),
            tone_mapping: s.tone_mapping.shader_index(),
            _padding: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lavalamp_core::{ToneMapping, Vec3};
    use std::mem::size_of;

    #[test]
    fn test_vertex_size() {
        // 3 position + 3 normal + 2 uv = 8 floats = 32 bytes
        assert_eq!(size_of::<GpuVertex>(), 32);
    }

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(size_of::<FrameUniforms>(), 128);
        assert_eq!(size_of::<StandardUniforms>(), 96);
        assert_eq!(size_of::<UnlitUniforms>(), 80);
        assert_eq!(size_of::<ShaderMaterialUniforms>(), 80);
        assert_eq!(size_of::<BackgroundUniforms>(), 112);
        assert_eq!(size_of::<LuminanceUniforms>(), 16);
        assert_eq!(size_of::<BlurUniforms>(), 48);
        assert_eq!(size_of::<CompositeUniforms>(), 16);
    }

    #[test]
    fn test_luminance_knee_never_collapses() {
        let settings = BloomSettings {
            luminance_smoothing: 0.0,
            ..BloomSettings::default()
        };
        let uniforms = LuminanceUniforms::from(&settings);
        assert!(uniforms.smoothing > 0.0);
        assert!(uniforms.threshold + uniforms.smoothing > uniforms.threshold);
    }

    #[test]
    fn test_uniform_sizes_are_16_byte_multiples() {
        for size in [
            size_of::<FrameUniforms>(),
            size_of::<StandardUniforms>(),
            size_of::<ShaderMaterialUniforms>(),
            size_of::<BlurUniforms>(),
        ] {
            assert_eq!(size % 16, 0);
        }
    }

    #[test]
    fn test_vertex_from_mesh_vertex() {
        let v = MeshVertex {
            position: Vec3::new(1.0, 2.0, 3.0),
            normal: Vec3::Y,
            uv: [0.25, 0.5],
        };
        let gpu = GpuVertex::from(&v);
        assert_eq!(gpu.position, [1.0, 2.0, 3.0]);
        assert_eq!(gpu.normal, [0.0, 1.0, 0.0]);
        assert_eq!(gpu.uv, [0.25, 0.5]);
    }

    #[test]
    fn test_blur_uniforms_pack_kernel() {
        let u = BlurUniforms::new([1.0, 0.0], (200, 100), [0.5, 0.1, 0.08, 0.05, 0.02]);
        assert_eq!(u.texel_size, [0.005, 0.01]);
        assert_eq!(u.weights, [0.5, 0.1, 0.08, 0.05]);
        assert_eq!(u.weights_tail[0], 0.02);
    }

    #[test]
    fn test_composite_from_settings() {
        let settings = BloomSettings {
            enabled: false,
            tone_mapping: ToneMapping::Aces,
            ..Default::default()
        };
        let u = CompositeUniforms::from(&settings);
        assert_eq!(u.bloom_intensity, 0.0);
        assert_eq!(u.tone_mapping, 1);
    }
}
