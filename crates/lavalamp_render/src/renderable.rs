//! Renderable geometry - bridges core meshes to GPU buffers
//!
//! This module converts the CPU-side lathe meshes from `lavalamp_core` into
//! vertex and index buffers ready for indexed drawing.

use lavalamp_core::Mesh;
use wgpu::util::DeviceExt;

use crate::pipeline::GpuVertex;

/// Convert mesh vertices into their GPU layout
pub fn gpu_vertices(mesh: &Mesh) -> Vec<GpuVertex> {
    mesh.vertices.iter().map(GpuVertex::from).collect()
}

/// A mesh uploaded to the GPU
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    /// Upload `mesh` into new vertex and index buffers
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vertices = gpu_vertices(mesh);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "Uploaded {}: {} vertices, {} triangles",
            label,
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    /// Bind the buffers and issue the indexed draw
    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpu_vertices_preserve_order() {
        let mesh = Mesh::lathe(&[[0.5, 0.0], [0.5, 1.0]], 4).unwrap();
        let vertices = gpu_vertices(&mesh);
        assert_eq!(vertices.len(), mesh.vertex_count());
        for (gpu, cpu) in vertices.iter().zip(&mesh.vertices) {
            assert_eq!(gpu.position, cpu.position.to_array());
            assert_eq!(gpu.uv, cpu.uv);
        }
    }

    #[test]
    fn test_vertex_bytes_match_stride() {
        let mesh = Mesh::lathe(&[[0.5, 0.0], [0.5, 1.0]], 8).unwrap();
        let vertices = gpu_vertices(&mesh);
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), mesh.vertex_count() * std::mem::size_of::<GpuVertex>());
    }
}
