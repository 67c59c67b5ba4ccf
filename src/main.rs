//! Lava Lamp - animated lava lamp scene
//!
//! Renders a glass lamp whose body shader is driven by a per-frame time
//! uniform, lit by environment presets and finished with bloom.

use std::error::Error;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use lavalamp::config::AppConfig;
use lavalamp::input::{InputAction, InputMapper};
use lavalamp::scene::{camera_from_config, controller_from_config, SceneBuilder};
use lavalamp::systems::{AnimationSystem, RenderError, RenderSystem, WindowSystem};
use lavalamp_input::OrbitController;
use lavalamp_render::{LampSceneDescriptor, OrbitCamera};

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    /// Consumed when the GPU scene is created
    descriptor: Option<LampSceneDescriptor>,
    animation: AnimationSystem,
    camera: OrbitCamera,
    controller: OrbitController,
    show_stats: bool,
}

impl App {
    fn new(config: AppConfig) -> Result<Self, Box<dyn Error>> {
        let descriptor = SceneBuilder::from_config(&config)?.build()?;
        let camera = camera_from_config(&config.camera);
        let controller = controller_from_config(&config.input);
        let animation = AnimationSystem::new(&config.animation);

        Ok(Self {
            show_stats: config.debug.show_overlay,
            config,
            window: None,
            render: None,
            descriptor: Some(descriptor),
            animation,
            camera,
            controller,
        })
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: InputAction) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ResetCamera => {
                self.camera.reset();
                self.controller.stop();
                log::info!("Camera reset to starting position");
            }
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            InputAction::ToggleStats => {
                self.show_stats = !self.show_stats;
                self.refresh_title();
            }
            InputAction::ToggleBloom => {
                if let Some(render) = &mut self.render {
                    match render.toggle_bloom() {
                        Ok(enabled) => log::info!("Bloom: {}", if enabled { "ON" } else { "OFF" }),
                        Err(e) => log::warn!("Could not toggle bloom: {}", e),
                    }
                }
            }
        }
    }

    fn refresh_title(&self) {
        if let Some(window) = &self.window {
            let summary = self.animation.stats().summary();
            window.update_title(self.show_stats.then_some(summary.as_str()));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(descriptor) = self.descriptor.take() else {
            return;
        };

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        match RenderSystem::new(window.window().clone(), self.config.window.vsync, descriptor) {
            Ok(render) => self.render = Some(render),
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
        self.refresh_title();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(render) = &mut self.render {
                    render.resize(physical_size.width, physical_size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state) {
                        self.handle_action(event_loop, action);
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.controller.process_mouse_button(button, state);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.controller.process_scroll(delta);
            }

            WindowEvent::RedrawRequested => {
                let (Some(window), Some(render)) = (&self.window, &mut self.render) else {
                    return;
                };

                // Publish this frame's time before anything is drawn
                let update = {
                    let mut target = render.time_target();
                    self.animation
                        .update(&mut self.camera, &mut self.controller, &mut target)
                };

                match render.render_frame(&self.camera) {
                    Ok(()) => {}
                    Err(RenderError::SurfaceLost) => {
                        log::debug!("Surface lost, reconfigured");
                    }
                    Err(RenderError::OutOfMemory) => {
                        log::error!("GPU out of memory");
                        event_loop.exit();
                        return;
                    }
                    Err(e) => {
                        log::warn!("{}", e);
                    }
                }

                // Request next frame
                window.request_redraw();

                if update.stats_due {
                    log::debug!(
                        "{} at t={:.2}s",
                        self.animation.stats().summary(),
                        update.time
                    );
                    if self.show_stats {
                        self.refresh_title();
                    }
                }
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.controller.process_mouse_motion(delta.0, delta.1);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Load configuration first so it can pick the log level
    let loaded = AppConfig::load();
    let log_level = loaded
        .as_ref()
        .map(|config| config.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // RUST_LOG still wins when set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    log::info!("Starting Lava Lamp");

    // Create event loop
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    // Create and run application
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
