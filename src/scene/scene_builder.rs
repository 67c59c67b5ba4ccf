//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for describing the lamp scene. The result is a
//! [`LampSceneDescriptor`], which the render system turns into GPU resources.

use lavalamp_core::{
    BloomSettings, Color, LampModel, ModelError, SceneEnvironment, ShaderMaterial, StandardMaterial,
    UnlitMaterial,
};
use lavalamp_core::lamp::DEFAULT_SEGMENTS;
use lavalamp_input::OrbitController;
use lavalamp_math::Vec3;
use lavalamp_render::{LampSceneDescriptor, OrbitCamera};

use crate::config::{AppConfig, CameraConfig, ConfigError, InputConfig};

/// Builder for the lamp scene
///
/// # Example
/// ```ignore
/// let descriptor = SceneBuilder::new()
///     .with_segments(48)
///     .with_scale(0.8)
///     .with_environment(SceneEnvironment::default())
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    segments: u32,
    scale: f32,
    caps: StandardMaterial,
    bottom: UnlitMaterial,
    body: ShaderMaterial,
    environment: SceneEnvironment,
    bloom: BloomSettings,
}

impl SceneBuilder {
    /// Create a builder with the stock lamp
    pub fn new() -> Self {
        Self {
            segments: DEFAULT_SEGMENTS,
            scale: 0.8,
            caps: StandardMaterial {
                color: Color::new(0.658, 0.658, 0.658),
                metalness: 0.95,
                roughness: 0.6,
            },
            bottom: UnlitMaterial {
                color: Color::new(5.0, 5.0, 2.0),
            },
            body: ShaderMaterial::default(),
            environment: SceneEnvironment::default(),
            bloom: BloomSettings::default(),
        }
    }

    /// Create a builder from the loaded configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::new()
            .with_segments(config.lamp.segments)
            .with_scale(config.lamp.scale)
            .with_caps(config.caps_material()?)
            .with_bottom(config.bottom_material())
            .with_body(config.body_material())
            .with_environment(config.to_scene_environment()?)
            .with_bloom(config.to_bloom_settings()?))
    }

    /// Subdivisions around the lamp axis
    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = segments;
        self
    }

    /// Uniform scale of every lamp part
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_caps(mut self, material: StandardMaterial) -> Self {
        self.caps = material;
        self
    }

    pub fn with_bottom(mut self, material: UnlitMaterial) -> Self {
        self.bottom = material;
        self
    }

    pub fn with_body(mut self, material: ShaderMaterial) -> Self {
        self.body = material;
        self
    }

    pub fn with_environment(mut self, environment: SceneEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_bloom(mut self, bloom: BloomSettings) -> Self {
        self.bloom = bloom;
        self
    }

    /// Build the lamp geometry and assemble the descriptor
    pub fn build(self) -> Result<LampSceneDescriptor, ModelError> {
        let model = LampModel::build(self.segments)?;
        log::info!(
            "Built lamp with {} segments: {}",
            self.segments,
            model.node_names().collect::<Vec<_>>().join(", ")
        );

        Ok(LampSceneDescriptor {
            model,
            scale: self.scale,
            caps: self.caps,
            bottom: self.bottom,
            body: self.body,
            environment: self.environment,
            bloom: self.bloom,
        })
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the orbit camera described by the camera config
pub fn camera_from_config(config: &CameraConfig) -> OrbitCamera {
    OrbitCamera::new(Vec3::from_array(config.start_position), Vec3::from_array(config.target))
        .with_fov_degrees(config.fov)
        .with_clip(config.near, config.far)
        .with_distance_limits(config.min_distance, config.max_distance)
}

/// Create the orbit controller described by the input config
pub fn controller_from_config(config: &InputConfig) -> OrbitController {
    OrbitController::new()
        .with_rotate_speed(config.rotate_speed)
        .with_zoom_speed(config.zoom_speed)
        .with_pan_speed(config.pan_speed)
        .with_damping_factor(config.damping_factor)
        .with_damping(config.damping_enabled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lavalamp_core::{ShaderSource, LAMP_BOTTOM, LAMP_CAPS, LAVA_LAMP_BODY};

    #[test]
    fn test_default_scene_has_all_parts() {
        let descriptor = SceneBuilder::new().build().unwrap();
        for name in [LAMP_CAPS, LAVA_LAMP_BODY, LAMP_BOTTOM] {
            assert!(descriptor.model.geometry(name).is_ok(), "missing {}", name);
        }
        assert_eq!(descriptor.scale, 0.8);
        assert!(descriptor.body.transparent);
    }

    #[test]
    fn test_too_few_segments_rejected() {
        let result = SceneBuilder::new().with_segments(2).build();
        assert!(matches!(result, Err(ModelError::InvalidProfile(_))));
    }

    #[test]
    fn test_from_config_matches_stock_scene() {
        let from_config = SceneBuilder::from_config(&AppConfig::default()).unwrap().build().unwrap();
        let stock = SceneBuilder::new().build().unwrap();
        assert_eq!(from_config.scale, stock.scale);
        assert_eq!(from_config.bottom, stock.bottom);
        assert_eq!(from_config.environment, stock.environment);
        assert_eq!(from_config.bloom, stock.bloom);
        assert!((from_config.caps.color.r - stock.caps.color.r).abs() < 0.01);
    }

    #[test]
    fn test_from_config_uses_shader_paths() {
        let mut config = AppConfig::default();
        config.rendering.vertex_shader = Some("my_lava.vert.wgsl".into());
        config.rendering.body_transparent = false;
        let descriptor = SceneBuilder::from_config(&config).unwrap().build().unwrap();
        assert_eq!(descriptor.body.vertex, ShaderSource::File("my_lava.vert.wgsl".into()));
        assert_eq!(descriptor.body.fragment, ShaderSource::Builtin);
        assert!(!descriptor.body.transparent);
    }

    #[test]
    fn test_camera_from_config() {
        let camera = camera_from_config(&CameraConfig::default());
        assert!((camera.eye() - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
        assert!((camera.fov_y - 75f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.min_distance, 0.5);
        assert_eq!(camera.max_distance, 50.0);
    }

    #[test]
    fn test_controller_from_config() {
        let config = InputConfig {
            damping_enabled: false,
            ..InputConfig::default()
        };
        let controller = controller_from_config(&config);
        assert!(!controller.damping_enabled);
        assert_eq!(controller.rotate_speed, config.rotate_speed);
    }
}
