//! Uniform buffer + bind group pairs
//!
//! Every uniform block in the renderer is a single buffer at binding 0 of its
//! own bind group, so one layout shape and one helper cover all of them.

use std::marker::PhantomData;

use bytemuck::Pod;
use wgpu::util::DeviceExt;

/// Create a layout with one uniform buffer at binding 0
pub fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// A typed uniform buffer and the bind group exposing it
pub struct UniformBinding<T: Pod> {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformBinding<T> {
    /// Create the buffer with `initial` contents and bind it against `layout`
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str, initial: &T) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(initial),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group,
            _marker: PhantomData,
        }
    }

    /// Queue a write of the whole block (applied before the next submit)
    pub fn write(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
