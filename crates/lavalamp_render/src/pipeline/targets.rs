//! Offscreen HDR render target
//!
//! The scene is drawn into a floating-point color buffer so emissive values
//! above 1.0 survive until the bloom pass picks them out.

/// Color format of the scene target
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Depth format shared by every scene pipeline
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// HDR color + depth attachments sized to the surface
pub struct HdrTarget {
    color: wgpu::TextureView,
    depth: wgpu::TextureView,
    size: (u32, u32),
}

impl HdrTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let size = (width.max(1), height.max(1));
        let (color, depth) = Self::create_views(device, size);
        Self { color, depth, size }
    }

    /// Recreate the attachments if the size changed
    ///
    /// Returns true when new textures were created (bind groups sampling the
    /// color view must be rebuilt).
    pub fn ensure_size(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        let size = (width.max(1), height.max(1));
        if self.size == size {
            return false;
        }

        let (color, depth) = Self::create_views(device, size);
        self.color = color;
        self.depth = depth;
        self.size = size;
        true
    }

    fn create_views(device: &wgpu::Device, (width, height): (u32, u32)) -> (wgpu::TextureView, wgpu::TextureView) {
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("HDR Scene Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: HDR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        log::debug!("Created HDR target {}x{}", width, height);
        (
            color.create_view(&wgpu::TextureViewDescriptor::default()),
            depth.create_view(&wgpu::TextureViewDescriptor::default()),
        )
    }

    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth
    }
}
