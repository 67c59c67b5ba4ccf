//! Environment presets
//!
//! An environment is a procedural sky gradient (zenith, horizon, ground) picked
//! by name. A scene stacks several [`EnvironmentLayer`]s: at most one is drawn
//! as the background, and every layer contributes image-based lighting scaled
//! by its intensity.

use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

use crate::Color;

/// Named environment presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentPreset {
    Apartment,
    City,
    Dawn,
    Forest,
    Lobby,
    Night,
    Park,
    Studio,
    Sunset,
    Warehouse,
}

impl EnvironmentPreset {
    /// Every preset, in catalogue order
    pub const ALL: [EnvironmentPreset; 10] = [
        EnvironmentPreset::Apartment,
        EnvironmentPreset::City,
        EnvironmentPreset::Dawn,
        EnvironmentPreset::Forest,
        EnvironmentPreset::Lobby,
        EnvironmentPreset::Night,
        EnvironmentPreset::Park,
        EnvironmentPreset::Studio,
        EnvironmentPreset::Sunset,
        EnvironmentPreset::Warehouse,
    ];

    /// Lowercase preset name
    pub fn name(self) -> &'static str {
        match self {
            EnvironmentPreset::Apartment => "apartment",
            EnvironmentPreset::City => "city",
            EnvironmentPreset::Dawn => "dawn",
            EnvironmentPreset::Forest => "forest",
            EnvironmentPreset::Lobby => "lobby",
            EnvironmentPreset::Night => "night",
            EnvironmentPreset::Park => "park",
            EnvironmentPreset::Studio => "studio",
            EnvironmentPreset::Sunset => "sunset",
            EnvironmentPreset::Warehouse => "warehouse",
        }
    }

    /// Sky gradient for this preset (linear colors, unblurred)
    pub fn gradient(self) -> Gradient {
        let (zenith, horizon, ground) = match self {
            EnvironmentPreset::Apartment => ([0.85, 0.78, 0.68], [0.62, 0.52, 0.42], [0.25, 0.20, 0.16]),
            EnvironmentPreset::City => ([0.55, 0.65, 0.80], [0.75, 0.72, 0.68], [0.20, 0.20, 0.22]),
            EnvironmentPreset::Dawn => ([0.25, 0.35, 0.60], [0.95, 0.60, 0.40], [0.15, 0.12, 0.12]),
            EnvironmentPreset::Forest => ([0.45, 0.60, 0.50], [0.35, 0.45, 0.30], [0.10, 0.14, 0.08]),
            EnvironmentPreset::Lobby => ([0.90, 0.85, 0.75], [0.70, 0.62, 0.50], [0.30, 0.26, 0.22]),
            EnvironmentPreset::Night => ([0.005, 0.008, 0.03], [0.03, 0.035, 0.07], [0.004, 0.004, 0.008]),
            EnvironmentPreset::Park => ([0.40, 0.60, 0.95], [0.80, 0.85, 0.90], [0.20, 0.25, 0.12]),
            EnvironmentPreset::Studio => ([1.00, 1.00, 1.00], [0.60, 0.60, 0.60], [0.18, 0.18, 0.18]),
            EnvironmentPreset::Sunset => ([0.30, 0.25, 0.50], [1.00, 0.50, 0.25], [0.12, 0.08, 0.07]),
            EnvironmentPreset::Warehouse => ([0.70, 0.72, 0.75], [0.45, 0.42, 0.38], [0.15, 0.14, 0.13]),
        };
        Gradient {
            zenith: Color::from_array(zenith),
            horizon: Color::from_array(horizon),
            ground: Color::from_array(ground),
            blur: 0.0,
        }
    }
}

impl fmt::Display for EnvironmentPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnvironmentPreset {
    type Err = EnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| EnvironmentError::UnknownPreset(s.to_string()))
    }
}

/// Three-stop vertical sky gradient
///
/// `blur` in `[0, 1]` widens the band around the horizon (0 = sharp).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub zenith: Color,
    pub horizon: Color,
    pub ground: Color,
    pub blur: f32,
}

impl Gradient {
    /// A gradient that emits nothing
    pub const BLACK: Gradient = Gradient {
        zenith: Color::BLACK,
        horizon: Color::BLACK,
        ground: Color::BLACK,
        blur: 0.0,
    };

    /// Scale every stop by `intensity`
    pub fn scaled(self, intensity: f32) -> Self {
        Self {
            zenith: self.zenith.scaled(intensity),
            horizon: self.horizon.scaled(intensity),
            ground: self.ground.scaled(intensity),
            blur: self.blur,
        }
    }
}

/// One `<preset, blur, background?, intensity>` environment entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentLayer {
    /// Preset name
    pub preset: EnvironmentPreset,
    /// Gradient blur in `[0, 1]`
    pub blur: f32,
    /// Draw this layer behind the scene
    pub background: bool,
    /// Lighting contribution (0 = background only)
    pub intensity: f32,
}

impl EnvironmentLayer {
    /// Gradient with this layer's blur applied (clamped to `[0, 1]`)
    pub fn gradient(&self) -> Gradient {
        Gradient {
            blur: self.blur.clamp(0.0, 1.0),
            ..self.preset.gradient()
        }
    }
}

/// Stack of environment layers for the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEnvironment {
    layers: Vec<EnvironmentLayer>,
}

impl SceneEnvironment {
    pub fn new(layers: Vec<EnvironmentLayer>) -> Self {
        let backgrounds = layers.iter().filter(|l| l.background).count();
        if backgrounds > 1 {
            log::warn!("{} environment layers flagged as background; using the first", backgrounds);
        }
        Self { layers }
    }

    /// All layers in declaration order
    pub fn layers(&self) -> &[EnvironmentLayer] {
        &self.layers
    }

    /// Gradient drawn behind the scene, if any layer is a background
    pub fn background(&self) -> Option<Gradient> {
        self.layers.iter().find(|l| l.background).map(|l| l.gradient())
    }

    /// Combined lighting gradient
    ///
    /// Sum of every layer's gradient weighted by its intensity; the blur is the
    /// widest among contributing layers. Layers with zero intensity are skipped.
    pub fn lighting(&self) -> Gradient {
        self.layers
            .iter()
            .filter(|l| l.intensity > 0.0)
            .fold(Gradient::BLACK, |acc, layer| {
                let g = layer.gradient().scaled(layer.intensity);
                Gradient {
                    zenith: acc.zenith + g.zenith,
                    horizon: acc.horizon + g.horizon,
                    ground: acc.ground + g.ground,
                    blur: acc.blur.max(g.blur),
                }
            })
    }
}

impl Default for SceneEnvironment {
    /// Night sky behind the lamp, apartment lighting on it
    fn default() -> Self {
        Self::new(vec![
            EnvironmentLayer {
                preset: EnvironmentPreset::Night,
                blur: 0.5,
                background: true,
                intensity: 0.0,
            },
            EnvironmentLayer {
                preset: EnvironmentPreset::Apartment,
                blur: 0.5,
                background: false,
                intensity: 0.6,
            },
        ])
    }
}

/// Environment error
#[derive(Debug, Clone, PartialEq)]
pub enum EnvironmentError {
    /// No preset with this name
    UnknownPreset(String),
}

impl fmt::Display for EnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentError::UnknownPreset(name) => {
                write!(f, "Unknown environment preset '{}'", name)
            }
        }
    }
}

impl std::error::Error for EnvironmentError {}
