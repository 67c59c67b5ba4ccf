//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. Built-in defaults
//! 2. `config/default.toml` (version controlled)
//! 3. `config/user.toml` (gitignored, user overrides)
//! 4. Environment variables (`LAVA_SECTION__KEY`)

use figment::{Figment, providers::{Format, Serialized, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

use lavalamp_core::{
    BloomError, BloomSettings, Color, ColorError, EnvironmentError, EnvironmentLayer, EnvironmentPreset,
    SceneEnvironment, ShaderMaterial, ShaderSource, StandardMaterial, ToneMapping, UnlitMaterial,
};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Input configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Animation configuration
    #[serde(default)]
    pub animation: AnimationConfig,
    /// Lamp geometry and materials
    #[serde(default)]
    pub lamp: LampConfig,
    /// Environment layers
    #[serde(default)]
    pub environment: EnvironmentConfig,
    /// Bloom post-processing
    #[serde(default)]
    pub bloom: BloomConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. Built-in defaults
    /// 2. `config/default.toml`
    /// 3. `config/user.toml`
    /// 4. Environment variables (`LAVA_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // LAVA_BLOOM__INTENSITY=3 -> bloom.intensity = 3.0
        figment = figment.merge(Env::prefixed("LAVA_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Bloom settings, validated
    pub fn to_bloom_settings(&self) -> Result<BloomSettings, ConfigError> {
        let b = &self.bloom;
        let settings = BloomSettings {
            enabled: b.enabled,
            luminance_threshold: b.luminance_threshold,
            luminance_smoothing: b.luminance_smoothing,
            intensity: b.intensity,
            blur_passes: b.blur_passes,
            blur_sigma: b.blur_sigma,
            tone_mapping: b.tone_mapping,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Environment layers with preset names resolved
    pub fn to_scene_environment(&self) -> Result<SceneEnvironment, ConfigError> {
        let layers = self
            .environment
            .layers
            .iter()
            .map(|layer| {
                Ok(EnvironmentLayer {
                    preset: layer.preset.parse::<EnvironmentPreset>()?,
                    blur: layer.blur,
                    background: layer.background,
                    intensity: layer.intensity,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(SceneEnvironment::new(layers))
    }

    /// Material of the lamp caps
    pub fn caps_material(&self) -> Result<StandardMaterial, ConfigError> {
        Ok(StandardMaterial {
            color: Color::from_hex(&self.lamp.caps_color)?,
            metalness: self.lamp.caps_metalness,
            roughness: self.lamp.caps_roughness,
        })
    }

    /// Material of the glowing base
    pub fn bottom_material(&self) -> UnlitMaterial {
        UnlitMaterial {
            color: Color::from_array(self.lamp.bottom_color),
        }
    }

    /// Shader pair of the lamp body
    pub fn body_material(&self) -> ShaderMaterial {
        ShaderMaterial {
            vertex: ShaderSource::from_optional_path(self.rendering.vertex_shader.as_deref()),
            fragment: ShaderSource::from_optional_path(self.rendering.fragment_shader.as_deref()),
            transparent: self.rendering.body_transparent,
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lava Lamp".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Starting position [x, y, z]
    pub start_position: [f32; 3],
    /// Orbit target [x, y, z]
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Closest zoom
    pub min_distance: f32,
    /// Farthest zoom
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: [0.0, 0.0, 5.0],
            target: [0.0, 0.0, 0.0],
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            min_distance: 0.5,
            max_distance: 50.0,
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Orbit speed (radians per pixel dragged)
    pub rotate_speed: f32,
    /// Zoom speed (log-distance per wheel line)
    pub zoom_speed: f32,
    /// Pan speed (fraction of distance per pixel dragged)
    pub pan_speed: f32,
    /// Fraction of pending input applied per 60 Hz frame
    pub damping_factor: f32,
    /// Glide to a stop instead of stopping dead
    pub damping_enabled: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.0015,
            damping_factor: 0.05,
            damping_enabled: true,
        }
    }
}

/// Animation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Longest frame delta fed to the animation, in seconds (0 = uncapped)
    pub max_frame_delta: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            max_frame_delta: lavalamp_core::clock::DEFAULT_MAX_FRAME_DELTA,
        }
    }
}

/// Lamp geometry and material configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LampConfig {
    /// Uniform scale of the whole lamp
    pub scale: f32,
    /// Subdivisions around the lamp axis
    pub segments: u32,
    /// Cap color as sRGB hex
    pub caps_color: String,
    pub caps_metalness: f32,
    pub caps_roughness: f32,
    /// Base color, linear and unclamped so it blooms
    pub bottom_color: [f32; 3],
}

impl Default for LampConfig {
    fn default() -> Self {
        Self {
            scale: 0.8,
            segments: lavalamp_core::lamp::DEFAULT_SEGMENTS,
            caps_color: "#d4d4d4".to_string(),
            caps_metalness: 0.95,
            caps_roughness: 0.6,
            bottom_color: [5.0, 5.0, 2.0],
        }
    }
}

/// A single environment layer as written in config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentLayerConfig {
    /// Preset name (apartment, city, dawn, forest, lobby, night, park, studio, sunset, warehouse)
    pub preset: String,
    pub blur: f32,
    /// Draw this layer behind the scene
    pub background: bool,
    /// Lighting contribution
    pub intensity: f32,
}

/// Environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub layers: Vec<EnvironmentLayerConfig>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            layers: vec![
                EnvironmentLayerConfig {
                    preset: "night".to_string(),
                    blur: 0.5,
                    background: true,
                    intensity: 0.0,
                },
                EnvironmentLayerConfig {
                    preset: "apartment".to_string(),
                    blur: 0.5,
                    background: false,
                    intensity: 0.6,
                },
            ],
        }
    }
}

/// Bloom configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloomConfig {
    pub enabled: bool,
    /// Luminance above which pixels glow
    pub luminance_threshold: f32,
    /// Soft knee width above the threshold
    pub luminance_smoothing: f32,
    /// Strength of the glow added back
    pub intensity: f32,
    /// Horizontal + vertical blur iterations
    pub blur_passes: u32,
    /// Gaussian sigma in half-resolution texels
    pub blur_sigma: f32,
    /// none or aces
    pub tone_mapping: ToneMapping,
}

impl Default for BloomConfig {
    fn default() -> Self {
        let settings = BloomSettings::default();
        Self {
            enabled: settings.enabled,
            luminance_threshold: settings.luminance_threshold,
            luminance_smoothing: settings.luminance_smoothing,
            intensity: settings.intensity,
            blur_passes: settings.blur_passes,
            blur_sigma: settings.blur_sigma,
            tone_mapping: settings.tone_mapping,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderingConfig {
    /// Custom WGSL vertex shader for the lamp body (built-in if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex_shader: Option<PathBuf>,
    /// Custom WGSL fragment shader for the lamp body (built-in if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment_shader: Option<PathBuf>,
    /// Alpha blend the lamp body
    pub body_transparent: bool,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            vertex_shader: None,
            fragment_shader: None,
            body_transparent: true,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Show frame stats in the title bar
    pub show_overlay: bool,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_overlay: false,
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub enum ConfigError {
    /// Sources could not be read or merged
    Load(String),
    /// Unknown environment preset name
    Environment(EnvironmentError),
    /// Malformed color
    Color(ColorError),
    /// Bloom values out of range
    Bloom(BloomError),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Load(e.to_string())
    }
}

impl From<EnvironmentError> for ConfigError {
    fn from(e: EnvironmentError) -> Self {
        ConfigError::Environment(e)
    }
}

impl From<ColorError> for ConfigError {
    fn from(e: ColorError) -> Self {
        ConfigError::Color(e)
    }
}

impl From<BloomError> for ConfigError {
    fn from(e: BloomError) -> Self {
        ConfigError::Bloom(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Load(msg) => write!(f, "Configuration error: {}", msg),
            ConfigError::Environment(e) => write!(f, "Configuration error: {}", e),
            ConfigError::Color(e) => write!(f, "Configuration error: {}", e),
            ConfigError::Bloom(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.camera.fov, 75.0);
        assert_eq!(config.camera.start_position, [0.0, 0.0, 5.0]);
        assert_eq!(config.lamp.scale, 0.8);
        assert_eq!(config.bloom.luminance_threshold, 0.9);
        assert_eq!(config.bloom.intensity, 2.0);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("luminance_threshold"));
        assert!(toml.contains("apartment"));
        assert!(!toml.contains("vertex_shader"));
    }

    #[test]
    fn test_serialized_config_parses_back() {
        let config = AppConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.environment.layers.len(), 2);
        assert_eq!(parsed.bloom.tone_mapping, ToneMapping::None);
    }

    #[test]
    fn test_default_environment_matches_core_default() {
        let env = AppConfig::default().to_scene_environment().unwrap();
        assert_eq!(env, SceneEnvironment::default());
    }

    #[test]
    fn test_unknown_preset_is_config_error() {
        let mut config = AppConfig::default();
        config.environment.layers[0].preset = "moonbase".to_string();
        let err = config.to_scene_environment().unwrap_err();
        assert!(matches!(err, ConfigError::Environment(EnvironmentError::UnknownPreset(_))));
        assert!(err.to_string().contains("moonbase"));
    }

    #[test]
    fn test_invalid_bloom_is_config_error() {
        let mut config = AppConfig::default();
        config.bloom.blur_passes = 0;
        assert!(matches!(
            config.to_bloom_settings(),
            Err(ConfigError::Bloom(BloomError::NoBlurPasses))
        ));
    }

    #[test]
    fn test_bloom_settings_match_defaults() {
        let settings = AppConfig::default().to_bloom_settings().unwrap();
        assert_eq!(settings, BloomSettings::default());
    }

    #[test]
    fn test_caps_material_from_hex() {
        let material = AppConfig::default().caps_material().unwrap();
        assert_eq!(material.metalness, 0.95);
        assert_eq!(material.roughness, 0.6);
        // #d4 in sRGB is about 0.658 linear
        assert!((material.color.r - 0.658).abs() < 0.01);
        assert_eq!(material.color.r, material.color.b);
    }

    #[test]
    fn test_bad_caps_color_is_config_error() {
        let mut config = AppConfig::default();
        config.lamp.caps_color = "grey".to_string();
        assert!(matches!(config.caps_material(), Err(ConfigError::Color(_))));
    }

    #[test]
    fn test_body_material_defaults_to_builtin_shaders() {
        let material = AppConfig::default().body_material();
        assert_eq!(material, ShaderMaterial::default());
    }

    #[test]
    fn test_body_material_uses_configured_paths() {
        let mut config = AppConfig::default();
        config.rendering.fragment_shader = Some(PathBuf::from("shaders/custom.wgsl"));
        let material = config.body_material();
        assert_eq!(material.vertex, ShaderSource::Builtin);
        assert_eq!(material.fragment, ShaderSource::File(PathBuf::from("shaders/custom.wgsl")));
    }

    #[test]
    fn test_bottom_material_keeps_hdr_color() {
        let material = AppConfig::default().bottom_material();
        assert_eq!(material.color.to_array(), [5.0, 5.0, 2.0]);
    }
}
