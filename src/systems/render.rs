//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - The lamp scene and its post-processing
//! - Frame submission and surface error recovery

use std::sync::Arc;
use winit::window::Window;
use lavalamp_render::{
    ContextError, LampScene, LampSceneDescriptor, OrbitCamera, RenderContext, SceneError, TimeUniformWriter,
};

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// Surface was lost or outdated (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
    /// GPU initialization failed
    Context(ContextError),
    /// Scene resources could not be created
    Scene(SceneError),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
            RenderError::Context(e) => write!(f, "GPU initialization failed: {}", e),
            RenderError::Scene(e) => write!(f, "Scene setup failed: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Context(e) => Some(e),
            RenderError::Scene(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ContextError> for RenderError {
    fn from(e: ContextError) -> Self {
        RenderError::Context(e)
    }
}

impl From<SceneError> for RenderError {
    fn from(e: SceneError) -> Self {
        RenderError::Scene(e)
    }
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    scene: LampScene,
}

impl RenderSystem {
    /// Create the GPU context and the lamp scene for `window`
    pub fn new(window: Arc<Window>, vsync: bool, descriptor: LampSceneDescriptor) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))?;
        let scene = pollster::block_on(LampScene::new(
            &context.device,
            context.config.format,
            context.size.width,
            context.size.height,
            descriptor,
        ))?;

        log::info!(
            "Render system ready: {}x{} {:?}",
            context.size.width,
            context.size.height,
            context.config.format
        );

        Ok(Self { context, scene })
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(winit::dpi::PhysicalSize::new(width, height));
        let size = self.context.size;
        self.scene
            .resize(&self.context.device, &self.context.queue, size.width, size.height);
    }

    /// Receiver for this frame's time value
    ///
    /// Writes go straight to the body shader's uniform buffer.
    pub fn time_target(&mut self) -> TimeUniformWriter<'_> {
        self.scene.time_target(&self.context.queue)
    }

    /// Render a single frame
    pub fn render_frame(&mut self, camera: &OrbitCamera) -> Result<(), RenderError> {
        self.scene
            .update_camera(&self.context.queue, camera, self.context.aspect_ratio());

        // Get surface texture
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
                return Err(RenderError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.scene.render(&mut encoder, &view);

        // Submit
        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Switch bloom on or off, returning the new state
    pub fn toggle_bloom(&mut self) -> Result<bool, RenderError> {
        let mut settings = *self.scene.bloom_settings();
        settings.enabled = !settings.enabled;
        self.scene.set_bloom_settings(&self.context.queue, settings)?;
        Ok(settings.enabled)
    }
}
