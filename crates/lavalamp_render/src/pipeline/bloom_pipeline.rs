//! Bloom post-processing
//!
//! Three stages run after the scene pass:
//!
//! 1. **Luminance** - a bright pass writes pixels above the threshold into a
//!    half-resolution buffer, with a smooth ramp of `smoothing` width.
//! 2. **Blur** - a separable 9-tap Gaussian ping-pongs between two
//!    half-resolution buffers, horizontal then vertical, `blur_passes` times.
//! 3. **Composite** - the scene and the blurred highlights are added, tone
//!    mapped and written to the swapchain image.
//!
//! With bloom disabled only the composite runs, at zero bloom intensity, so
//! tone mapping is applied either way.

use wgpu::util::DeviceExt;

use lavalamp_core::BloomSettings;

use super::targets::HDR_FORMAT;
use super::types::{BlurUniforms, CompositeUniforms, LuminanceUniforms};

/// Size of the bloom buffers for a given surface size
pub fn bloom_size(width: u32, height: u32) -> (u32, u32) {
    ((width / 2).max(1), (height / 2).max(1))
}

/// Half-resolution ping-pong buffers
struct BloomTargets {
    ping: wgpu::TextureView,
    pong: wgpu::TextureView,
    size: (u32, u32),
}

impl BloomTargets {
    fn new(device: &wgpu::Device, size: (u32, u32)) -> Self {
        let make = |label: &str| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size: wgpu::Extent3d {
                        width: size.0,
                        height: size.1,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: HDR_FORMAT,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        };

        Self {
            ping: make("Bloom Ping Texture"),
            pong: make("Bloom Pong Texture"),
            size,
        }
    }
}

/// One uniform buffer per pass
struct BloomBuffers {
    luminance: wgpu::Buffer,
    blur_horizontal: wgpu::Buffer,
    blur_vertical: wgpu::Buffer,
    composite: wgpu::Buffer,
}

/// Bind groups referencing the current texture views
struct BloomBindGroups {
    /// scene -> ping
    luminance: wgpu::BindGroup,
    /// ping -> pong
    blur_horizontal: wgpu::BindGroup,
    /// pong -> ping
    blur_vertical: wgpu::BindGroup,
    /// scene + ping -> surface
    composite: wgpu::BindGroup,
}

/// Bright pass, blur and composite pipelines with their resources
pub struct BloomPipeline {
    luminance_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,

    single_input_layout: wgpu::BindGroupLayout,
    composite_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    buffers: BloomBuffers,
    targets: BloomTargets,
    bind_groups: BloomBindGroups,
    settings: BloomSettings,
}

impl BloomPipeline {
    /// Create the bloom passes
    ///
    /// `scene_view` is the HDR scene color, `width`/`height` the surface size
    /// and `output_format` the swapchain format the composite writes to.
    pub fn new(
        device: &wgpu::Device,
        scene_view: &wgpu::TextureView,
        width: u32,
        height: u32,
        output_format: wgpu::TextureFormat,
        settings: BloomSettings,
    ) -> Self {
        let single_input_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bloom Input Bind Group Layout"),
            entries: &[
                texture_entry(0),
                sampler_entry(1),
                uniform_entry(2),
            ],
        });

        let composite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Composite Bind Group Layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                sampler_entry(2),
                uniform_entry(3),
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Bloom Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let luminance_pipeline = fullscreen_pipeline(
            device,
            "Luminance",
            include_str!("../shaders/luminance.wgsl"),
            &single_input_layout,
            HDR_FORMAT,
        );
        let blur_pipeline = fullscreen_pipeline(
            device,
            "Blur",
            include_str!("../shaders/blur.wgsl"),
            &single_input_layout,
            HDR_FORMAT,
        );
        let composite_pipeline = fullscreen_pipeline(
            device,
            "Composite",
            include_str!("../shaders/composite.wgsl"),
            &composite_layout,
            output_format,
        );

        let size = bloom_size(width, height);
        let kernel = settings.kernel();

        let buffers = BloomBuffers {
            luminance: uniform_buffer(device, "Luminance Uniforms", &LuminanceUniforms::from(&settings)),
            blur_horizontal: uniform_buffer(
                device,
                "Blur Horizontal Uniforms",
                &BlurUniforms::new([1.0, 0.0], size, kernel),
            ),
            blur_vertical: uniform_buffer(
                device,
                "Blur Vertical Uniforms",
                &BlurUniforms::new([0.0, 1.0], size, kernel),
            ),
            composite: uniform_buffer(device, "Composite Uniforms", &CompositeUniforms::from(&settings)),
        };

        let targets = BloomTargets::new(device, size);
        let bind_groups = BloomBindGroups::new(
            device,
            &single_input_layout,
            &composite_layout,
            &sampler,
            &buffers,
            &targets,
            scene_view,
        );

        Self {
            luminance_pipeline,
            blur_pipeline,
            composite_pipeline,
            single_input_layout,
            composite_layout,
            sampler,
            buffers,
            targets,
            bind_groups,
            settings,
        }
    }

    /// Recreate the half-resolution buffers and rebind the scene view
    ///
    /// Call after the scene target was recreated, even if the size is the
    /// same, since the bind groups hold the old view.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene_view: &wgpu::TextureView,
        width: u32,
        height: u32,
    ) {
        let size = bloom_size(width, height);
        if size != self.targets.size {
            self.targets = BloomTargets::new(device, size);
            self.write_blur_uniforms(queue);
        }
        self.bind_groups = self.create_bind_groups(device, scene_view);
    }

    /// Apply new bloom settings
    pub fn update_settings(&mut self, queue: &wgpu::Queue, settings: BloomSettings) {
        self.settings = settings;
        queue.write_buffer(
            &self.buffers.luminance,
            0,
            bytemuck::bytes_of(&LuminanceUniforms::from(&self.settings)),
        );
        queue.write_buffer(
            &self.buffers.composite,
            0,
            bytemuck::bytes_of(&CompositeUniforms::from(&self.settings)),
        );
        self.write_blur_uniforms(queue);
    }

    pub fn settings(&self) -> &BloomSettings {
        &self.settings
    }

    /// Record the bloom passes and the final composite into `output`
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, output: &wgpu::TextureView) {
        if self.settings.enabled {
            fullscreen_pass(
                encoder,
                "Luminance Pass",
                &self.targets.ping,
                &self.luminance_pipeline,
                &self.bind_groups.luminance,
            );

            for _ in 0..self.settings.blur_passes {
                fullscreen_pass(
                    encoder,
                    "Blur Horizontal Pass",
                    &self.targets.pong,
                    &self.blur_pipeline,
                    &self.bind_groups.blur_horizontal,
                );
                fullscreen_pass(
                    encoder,
                    "Blur Vertical Pass",
                    &self.targets.ping,
                    &self.blur_pipeline,
                    &self.bind_groups.blur_vertical,
                );
            }
        }

        fullscreen_pass(
            encoder,
            "Composite Pass",
            output,
            &self.composite_pipeline,
            &self.bind_groups.composite,
        );
    }

    fn write_blur_uniforms(&self, queue: &wgpu::Queue) {
        let kernel = self.settings.kernel();
        let size = self.targets.size;
        queue.write_buffer(
            &self.buffers.blur_horizontal,
            0,
            bytemuck::bytes_of(&BlurUniforms::new([1.0, 0.0], size, kernel)),
        );
        queue.write_buffer(
            &self.buffers.blur_vertical,
            0,
            bytemuck::bytes_of(&BlurUniforms::new([0.0, 1.0], size, kernel)),
        );
    }

    fn create_bind_groups(&self, device: &wgpu::Device, scene_view: &wgpu::TextureView) -> BloomBindGroups {
        BloomBindGroups::new(
            device,
            &self.single_input_layout,
            &self.composite_layout,
            &self.sampler,
            &self.buffers,
            &self.targets,
            scene_view,
        )
    }
}

impl BloomBindGroups {
    fn new(
        device: &wgpu::Device,
        single_input_layout: &wgpu::BindGroupLayout,
        composite_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        buffers: &BloomBuffers,
        targets: &BloomTargets,
        scene_view: &wgpu::TextureView,
    ) -> Self {
        let single = |label: &str, input: &wgpu::TextureView, uniforms: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: single_input_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(input),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: uniforms.as_entire_binding(),
                    },
                ],
            })
        };

        let composite = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Composite Bind Group"),
            layout: composite_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(scene_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&targets.ping),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: buffers.composite.as_entire_binding(),
                },
            ],
        });

        Self {
            luminance: single("Luminance Bind Group", scene_view, &buffers.luminance),
            blur_horizontal: single("Blur Horizontal Bind Group", &targets.ping, &buffers.blur_horizontal),
            blur_vertical: single("Blur Vertical Bind Group", &targets.pong, &buffers.blur_vertical),
            composite,
        }
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn uniform_buffer<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, contents: &T) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(contents),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn fullscreen_pipeline(
    device: &wgpu::Device,
    name: &str,
    source: &str,
    layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{} Shader", name)),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} Pipeline Layout", name)),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", name)),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn fullscreen_pass(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.draw(0..3, 0..1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bloom_size_is_half_resolution() {
        assert_eq!(bloom_size(1920, 1080), (960, 540));
        assert_eq!(bloom_size(801, 601), (400, 300));
    }

    #[test]
    fn test_bloom_size_never_zero() {
        assert_eq!(bloom_size(1, 1), (1, 1));
        assert_eq!(bloom_size(0, 0), (1, 1));
    }
}
