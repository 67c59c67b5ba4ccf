//! Bloom settings
//!
//! The GPU side lives in `lavalamp_render::pipeline::BloomPipeline`; this
//! module holds the tunables and the blur kernel so they can be validated and
//! tested without a device.

use serde::{Serialize, Deserialize};
use std::fmt;

/// Number of kernel weights per side of the separable blur, center included
pub const BLUR_TAPS: usize = 5;

/// Operator applied after bloom is composited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneMapping {
    /// Clamp to `[0, 1]`
    #[default]
    None,
    /// ACES filmic approximation
    Aces,
}

impl ToneMapping {
    /// Selector value read by the composite shader
    pub fn shader_index(self) -> u32 {
        match self {
            ToneMapping::None => 0,
            ToneMapping::Aces => 1,
        }
    }
}

/// Brightness-threshold glow parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub enabled: bool,
    /// Luminance above which pixels start to glow
    pub luminance_threshold: f32,
    /// Width of the soft knee above the threshold
    pub luminance_smoothing: f32,
    /// Multiplier applied to the blurred glow when composited
    pub intensity: f32,
    /// Number of horizontal + vertical blur iterations
    pub blur_passes: u32,
    /// Gaussian sigma in half-resolution texels
    pub blur_sigma: f32,
    pub tone_mapping: ToneMapping,
}

/// Narrowest soft knee passed to the GPU
pub const MIN_LUMINANCE_SMOOTHING: f32 = 1e-4;

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            luminance_threshold: 0.9,
            luminance_smoothing: 0.025,
            intensity: 2.0,
            blur_passes: 3,
            blur_sigma: 2.0,
            tone_mapping: ToneMapping::None,
        }
    }
}

impl BloomSettings {
    /// Check that every parameter is usable
    pub fn validate(&self) -> Result<(), BloomError> {
        if self.luminance_threshold.is_nan() || self.luminance_threshold < 0.0 {
            return Err(BloomError::InvalidThreshold(self.luminance_threshold));
        }
        if self.luminance_smoothing.is_nan() || self.luminance_smoothing < 0.0 {
            return Err(BloomError::InvalidSmoothing(self.luminance_smoothing));
        }
        if self.intensity.is_nan() || self.intensity < 0.0 {
            return Err(BloomError::InvalidIntensity(self.intensity));
        }
        if self.blur_passes == 0 {
            return Err(BloomError::NoBlurPasses);
        }
        Ok(())
    }

    /// Soft knee width handed to the bright pass
    ///
    /// Floored at [`MIN_LUMINANCE_SMOOTHING`] so `smoothstep` always gets
    /// `low < high`; zero smoothing behaves as a hard threshold.
    pub fn knee_width(&self) -> f32 {
        self.luminance_smoothing.max(MIN_LUMINANCE_SMOOTHING)
    }

    /// Intensity actually composited (zero while disabled)
    pub fn effective_intensity(&self) -> f32 {
        if self.enabled { self.intensity } else { 0.0 }
    }

    /// Blur kernel for the configured sigma
    pub fn kernel(&self) -> [f32; BLUR_TAPS] {
        gaussian_weights(self.blur_sigma)
    }
}

/// One-sided Gaussian weights `[w0, w1, .., w4]`
///
/// Normalized so that `w0 + 2 * (w1 + .. + w4) == 1`, i.e. the full symmetric
/// 9-tap kernel preserves brightness. A non-positive sigma yields the
/// identity kernel.
pub fn gaussian_weights(sigma: f32) -> [f32; BLUR_TAPS] {
    let mut weights = [0.0f32; BLUR_TAPS];
    if sigma.is_nan() || sigma <= 0.0 {
        weights[0] = 1.0;
        return weights;
    }

    let two_sigma_sq = 2.0 * sigma * sigma;
    for (i, w) in weights.iter_mut().enumerate() {
        let x = i as f32;
        *w = (-x * x / two_sigma_sq).exp();
    }

    let total = weights[0] + 2.0 * weights[1..].iter().sum::<f32>();
    for w in weights.iter_mut() {
        *w /= total;
    }
    weights
}

/// Invalid bloom configuration
#[derive(Debug, Clone, PartialEq)]
pub enum BloomError {
    InvalidThreshold(f32),
    InvalidSmoothing(f32),
    InvalidIntensity(f32),
    NoBlurPasses,
}

impl fmt::Display for BloomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BloomError::InvalidThreshold(v) => write!(f, "Bloom luminance threshold must be >= 0, got {}", v),
            BloomError::InvalidSmoothing(v) => write!(f, "Bloom luminance smoothing must be >= 0, got {}", v),
            BloomError::InvalidIntensity(v) => write!(f, "Bloom intensity must be >= 0, got {}", v),
            BloomError::NoBlurPasses => write!(f, "Bloom needs at least one blur pass"),
        }
    }
}

impl std::error::Error for BloomError {}
