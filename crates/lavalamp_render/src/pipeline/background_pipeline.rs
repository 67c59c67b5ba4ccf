//! Sky gradient drawn behind the lamp
//!
//! A single fullscreen triangle reconstructs the view ray per pixel from the
//! inverse view-projection and shades it with the background gradient. It is
//! drawn first in the scene pass and never touches depth.

use super::bindings::{uniform_layout, UniformBinding};
use super::targets::{DEPTH_FORMAT, HDR_FORMAT};
use super::types::BackgroundUniforms;

pub struct BackgroundPipeline {
    pipeline: wgpu::RenderPipeline,
    uniforms: UniformBinding<BackgroundUniforms>,
}

impl BackgroundPipeline {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = uniform_layout(device, "Background Bind Group Layout", wgpu::ShaderStages::FRAGMENT);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Background Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Background Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/background.wgsl").into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Background Pipeline"),
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
                    format: HDR_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniforms = UniformBinding::new(
            device,
            &layout,
            "Background Uniforms",
            &BackgroundUniforms::new(lavalamp_math::mat4::IDENTITY, &lavalamp_core::Gradient::BLACK),
        );

        Self { pipeline, uniforms }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniforms: &BackgroundUniforms) {
        self.uniforms.write(queue, uniforms);
    }

    /// Record the fullscreen draw into an open scene pass
    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, self.uniforms.bind_group(), &[]);
        pass.draw(0..3, 0..1);
    }
}
