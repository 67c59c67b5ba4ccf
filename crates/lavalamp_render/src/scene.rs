//! The lava lamp scene on the GPU
//!
//! [`LampScene`] owns everything needed to draw one frame: the three lamp
//! parts with their materials, the sky, the HDR target and the bloom chain.
//! The lamp body's shader material is the only consumer of scene time; it is
//! fed through [`TimeUniformWriter`], the GPU-side [`UniformTarget`].

use bytemuck::Pod;

use lavalamp_core::{
    BloomError, BloomSettings, LampModel, ModelError, SceneEnvironment, ShaderError,
    ShaderMaterial, ShaderStage, StandardMaterial, UniformTarget, UnlitMaterial, LAMP_BOTTOM,
    LAMP_CAPS, LAVA_LAMP_BODY,
};
use lavalamp_math::mat4::{self, Mat4};

use crate::camera::OrbitCamera;
use crate::pipeline::{
    uniform_layout, BackgroundPipeline, BackgroundUniforms, BlendMode, BloomPipeline, FrameUniforms,
    HdrTarget, MeshPipeline, ShaderMaterialUniforms, StandardUniforms, UniformBinding, UnlitUniforms,
};
use crate::renderable::GpuMesh;

const LAVA_VERTEX_SHADER: &str = include_str!("shaders/lava.vert.wgsl");
const LAVA_FRAGMENT_SHADER: &str = include_str!("shaders/lava.frag.wgsl");
const LAVA_PIPELINE_LABEL: &str = "Lava Pipeline";

/// Error building the scene
#[derive(Debug)]
pub enum SceneError {
    /// The lamp model lacks a required node
    Model(ModelError),
    /// A shader source could not be loaded
    Shader(ShaderError),
    /// The GPU rejected a custom shader
    ShaderCompilation { stage: ShaderStage, message: String },
    /// The body shaders compiled but could not be linked into a pipeline
    PipelineLink { label: String, message: String },
    /// Bloom settings are out of range
    Bloom(BloomError),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::Model(e) => write!(f, "Model error: {}", e),
            SceneError::Shader(e) => write!(f, "Shader error: {}", e),
            SceneError::ShaderCompilation { stage, message } => {
                write!(f, "Failed to compile {} shader: {}", stage, message)
            }
            SceneError::PipelineLink { label, message } => {
                write!(f, "Failed to link {}: {}", label, message)
            }
            SceneError::Bloom(e) => write!(f, "Bloom error: {}", e),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Model(e) => Some(e),
            SceneError::Shader(e) => Some(e),
            SceneError::ShaderCompilation { .. } | SceneError::PipelineLink { .. } => None,
            SceneError::Bloom(e) => Some(e),
        }
    }
}

impl From<ModelError> for SceneError {
    fn from(e: ModelError) -> Self {
        SceneError::Model(e)
    }
}

impl From<ShaderError> for SceneError {
    fn from(e: ShaderError) -> Self {
        SceneError::Shader(e)
    }
}

impl From<BloomError> for SceneError {
    fn from(e: BloomError) -> Self {
        SceneError::Bloom(e)
    }
}

/// Everything that defines the scene's content
#[derive(Debug, Clone)]
pub struct LampSceneDescriptor {
    pub model: LampModel,
    /// Uniform scale applied to every lamp part
    pub scale: f32,
    pub caps: StandardMaterial,
    pub bottom: UnlitMaterial,
    pub body: ShaderMaterial,
    pub environment: SceneEnvironment,
    pub bloom: BloomSettings,
}

/// A mesh with its per-object uniform block
struct SceneObject<T: Pod> {
    mesh: GpuMesh,
    uniforms: UniformBinding<T>,
}

impl<T: Pod> SceneObject<T> {
    fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, pipeline: &'a MeshPipeline) {
        pass.set_pipeline(pipeline.pipeline());
        pass.set_bind_group(1, self.uniforms.bind_group(), &[]);
        self.mesh.draw(pass);
    }
}

/// GPU-side receiver of the scene time
///
/// Writes the lamp body's uniform block through the queue, so the value
/// published before `render` is the value the frame's draw sees.
pub struct TimeUniformWriter<'a> {
    queue: &'a wgpu::Queue,
    binding: &'a UniformBinding<ShaderMaterialUniforms>,
    uniforms: &'a mut ShaderMaterialUniforms,
}

impl UniformTarget for TimeUniformWriter<'_> {
    fn publish_time(&mut self, time: f32) {
        self.uniforms.time = time;
        self.binding.write(self.queue, self.uniforms);
    }
}

/// The complete lamp scene
pub struct LampScene {
    frame: UniformBinding<FrameUniforms>,
    background: BackgroundPipeline,

    standard_pipeline: MeshPipeline,
    unlit_pipeline: MeshPipeline,
    lava_pipeline: MeshPipeline,

    caps: SceneObject<StandardUniforms>,
    bottom: SceneObject<UnlitUniforms>,
    body: SceneObject<ShaderMaterialUniforms>,
    body_uniforms: ShaderMaterialUniforms,

    environment: SceneEnvironment,
    hdr: HdrTarget,
    bloom: BloomPipeline,
}

impl LampScene {
    /// Upload the lamp and build every pipeline
    ///
    /// Custom body shaders are validated by the device; rejected sources are
    /// reported as [`SceneError::ShaderCompilation`] instead of aborting.
    pub async fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        desc: LampSceneDescriptor,
    ) -> Result<Self, SceneError> {
        desc.bloom.validate()?;

        let caps_mesh = desc.model.geometry(LAMP_CAPS)?;
        let body_mesh = desc.model.geometry(LAVA_LAMP_BODY)?;
        let bottom_mesh = desc.model.geometry(LAMP_BOTTOM)?;

        let vertex_source = desc.body.vertex.load(ShaderStage::Vertex, LAVA_VERTEX_SHADER)?;
        let fragment_source = desc.body.fragment.load(ShaderStage::Fragment, LAVA_FRAGMENT_SHADER)?;

        let stages = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let frame_layout = uniform_layout(device, "Frame Bind Group Layout", stages);
        let object_layout = uniform_layout(device, "Object Bind Group Layout", stages);
        let layouts = [&frame_layout, &object_layout];

        let standard_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Standard Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/standard.wgsl").into()),
        });
        let unlit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Unlit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/unlit.wgsl").into()),
        });

        let standard_pipeline = MeshPipeline::new(
            device,
            "Standard Pipeline",
            &standard_shader,
            &standard_shader,
            BlendMode::Opaque,
            &layouts,
        );
        let unlit_pipeline = MeshPipeline::new(
            device,
            "Unlit Pipeline",
            &unlit_shader,
            &unlit_shader,
            BlendMode::Opaque,
            &layouts,
        );

        let lava_vertex = compile_checked(device, "Lava Vertex Shader", ShaderStage::Vertex, &vertex_source).await?;
        let lava_fragment =
            compile_checked(device, "Lava Fragment Shader", ShaderStage::Fragment, &fragment_source).await?;

        let blend = if desc.body.transparent {
            BlendMode::Transparent
        } else {
            BlendMode::Opaque
        };
        // Either stage may be at fault here (vertex layout, stage interface)
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let lava_pipeline = MeshPipeline::new(device, LAVA_PIPELINE_LABEL, &lava_vertex, &lava_fragment, blend, &layouts);
        if let Some(error) = device.pop_error_scope().await {
            return Err(SceneError::PipelineLink {
                label: LAVA_PIPELINE_LABEL.to_string(),
                message: error.to_string(),
            });
        }

        let model = lamp_transform(desc.scale);
        let caps_material = desc.caps.clamped();

        let caps = SceneObject {
            mesh: GpuMesh::upload(device, LAMP_CAPS, caps_mesh),
            uniforms: UniformBinding::new(
                device,
                &object_layout,
                "Caps Uniforms",
                &StandardUniforms {
                    model,
                    color: caps_material.color.to_rgba(1.0),
                    params: [caps_material.metalness, caps_material.roughness, 0.0, 0.0],
                },
            ),
        };

        let bottom = SceneObject {
            mesh: GpuMesh::upload(device, LAMP_BOTTOM, bottom_mesh),
            uniforms: UniformBinding::new(
                device,
                &object_layout,
                "Bottom Uniforms",
                &UnlitUniforms {
                    model,
                    color: desc.bottom.color.to_rgba(1.0),
                },
            ),
        };

        let body_uniforms = ShaderMaterialUniforms {
            model,
            time: 0.0,
            _padding: [0.0; 3],
        };
        let body = SceneObject {
            mesh: GpuMesh::upload(device, LAVA_LAMP_BODY, body_mesh),
            uniforms: UniformBinding::new(device, &object_layout, "Body Uniforms", &body_uniforms),
        };

        let frame = UniformBinding::new(device, &frame_layout, "Frame Uniforms", &FrameUniforms::default());
        let background = BackgroundPipeline::new(device);
        let hdr = HdrTarget::new(device, width, height);
        let bloom = BloomPipeline::new(device, hdr.color_view(), width, height, surface_format, desc.bloom);

        log::info!(
            "Lamp scene ready: {} layer(s), bloom {}",
            desc.environment.layers().len(),
            if desc.bloom.enabled { "on" } else { "off" }
        );

        Ok(Self {
            frame,
            background,
            standard_pipeline,
            unlit_pipeline,
            lava_pipeline,
            caps,
            bottom,
            body,
            body_uniforms,
            environment: desc.environment,
            hdr,
            bloom,
        })
    }

    /// Receiver for the frame animator's time value
    pub fn time_target<'a>(&'a mut self, queue: &'a wgpu::Queue) -> TimeUniformWriter<'a> {
        TimeUniformWriter {
            queue,
            binding: &self.body.uniforms,
            uniforms: &mut self.body_uniforms,
        }
    }

    /// Write camera matrices and environment gradients for this frame
    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &OrbitCamera, aspect: f32) {
        let view_proj = camera.view_projection(aspect);
        let lighting = self.environment.lighting();
        self.frame
            .write(queue, &FrameUniforms::new(view_proj, camera.eye().to_array(), &lighting));

        if let Some(background) = self.environment.background() {
            match mat4::inverse(view_proj) {
                Some(inv) => self.background.update(queue, &BackgroundUniforms::new(inv, &background)),
                None => log::warn!("Singular view-projection, keeping previous sky"),
            }
        }
    }

    /// Match the offscreen targets to a new surface size
    pub fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, width: u32, height: u32) {
        if self.hdr.ensure_size(device, width, height) {
            self.bloom.resize(device, queue, self.hdr.color_view(), width, height);
        }
    }

    pub fn bloom_settings(&self) -> &BloomSettings {
        self.bloom.settings()
    }

    /// Replace the bloom settings (rejected if invalid)
    pub fn set_bloom_settings(&mut self, queue: &wgpu::Queue, settings: BloomSettings) -> Result<(), SceneError> {
        settings.validate()?;
        self.bloom.update_settings(queue, settings);
        Ok(())
    }

    /// Record the scene and post-processing into `output`
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, output: &wgpu::TextureView) {
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.hdr.color_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.hdr.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if self.environment.background().is_some() {
                self.background.draw(&mut pass);
            }

            pass.set_bind_group(0, self.frame.bind_group(), &[]);

            // Opaque parts first, the glass body last
            self.caps.draw(&mut pass, &self.standard_pipeline);
            self.bottom.draw(&mut pass, &self.unlit_pipeline);
            self.body.draw(&mut pass, &self.lava_pipeline);
        }

        self.bloom.render(encoder, output);
    }
}

/// Compile a shader module, turning validation errors into [`SceneError`]
async fn compile_checked(
    device: &wgpu::Device,
    label: &str,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, SceneError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    match device.pop_error_scope().await {
        Some(error) => Err(SceneError::ShaderCompilation {
            stage,
            message: error.to_string(),
        }),
        None => Ok(module),
    }
}

/// Model matrix for a lamp part at the given scale
pub fn lamp_transform(scale: f32) -> Mat4 {
    mat4::scale(scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lavalamp_core::FrameAnimator;

    #[test]
    fn test_scene_error_display() {
        let err = SceneError::Model(ModelError::MissingNode("LampCaps".to_string()));
        assert_eq!(format!("{}", err), "Model error: Model has no node named 'LampCaps'");

        let err = SceneError::ShaderCompilation {
            stage: ShaderStage::Fragment,
            message: "bad token".to_string(),
        };
        assert_eq!(format!("{}", err), "Failed to compile fragment shader: bad token");
    }

    #[test]
    fn test_link_error_names_no_stage() {
        let err = SceneError::PipelineLink {
            label: LAVA_PIPELINE_LABEL.to_string(),
            message: "location 3 not provided by vertex stage".to_string(),
        };
        let text = err.to_string();
        assert_eq!(text, "Failed to link Lava Pipeline: location 3 not provided by vertex stage");
        assert!(!text.contains("fragment shader"));
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_builtin_lava_shaders_define_entry_points() {
        assert!(LAVA_VERTEX_SHADER.contains("fn vs_main"));
        assert!(LAVA_FRAGMENT_SHADER.contains("fn fs_main"));
        assert!(LAVA_VERTEX_SHADER.contains("time: f32"));
        assert!(LAVA_FRAGMENT_SHADER.contains("time: f32"));
    }

    #[test]
    fn test_lamp_transform_is_uniform_scale() {
        let m = lamp_transform(0.8);
        assert_eq!(m[0][0], 0.8);
        assert_eq!(m[1][1], 0.8);
        assert_eq!(m[2][2], 0.8);
        assert_eq!(m[3][3], 1.0);
    }

    // CPU stand-in for TimeUniformWriter, writing into the same uniform block
    struct BlockTarget {
        block: ShaderMaterialUniforms,
        writes: usize,
    }

    impl UniformTarget for BlockTarget {
        fn publish_time(&mut self, time: f32) {
            self.block.time = time;
            self.writes += 1;
        }
    }

    #[test]
    fn test_time_lands_in_material_block() {
        let mut target = BlockTarget {
            block: ShaderMaterialUniforms {
                model: lamp_transform(0.8),
                time: 0.0,
                _padding: [0.0; 3],
            },
            writes: 0,
        };
        let mut animator = FrameAnimator::new();
        animator.on_frame(0.5, &mut target);
        animator.on_frame(0.25, &mut target);
        assert_eq!(target.block.time, 0.75);
        assert_eq!(target.writes, 2);
        // The model matrix is untouched by time updates
        assert_eq!(target.block.model[0][0], 0.8);
    }
}
