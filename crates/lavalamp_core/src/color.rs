//! Linear RGB colors
//!
//! Colors are stored linear so shaders can light and blend them directly.
//! Hex strings are treated as sRGB and converted on parse. Components above
//! 1.0 are allowed: emissive surfaces use them to exceed the bloom threshold.

use serde::{Serialize, Deserialize};
use std::fmt;

/// Linear RGB color
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    /// Create from linear components
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create from a linear `[r, g, b]` array
    pub const fn from_array(c: [f32; 3]) -> Self {
        Self { r: c[0], g: c[1], b: c[2] }
    }

    /// Parse an sRGB hex string (`#rrggbb`, `rrggbb` or `#rgb`)
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || ColorError::InvalidHex(hex.to_string());
        // from_str_radix alone would also take a leading '+'
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(invalid()),
        };

        let channel = |i: usize| -> Result<f32, ColorError> {
            let byte = u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid())?;
            Ok(srgb_to_linear(byte as f32 / 255.0))
        };

        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Linear `[r, g, b]`
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Linear `[r, g, b, a]`
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }

    /// Multiply every component by `factor`
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }
}

impl std::ops::Add for Color {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

/// sRGB transfer function inverse
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Color parse error
#[derive(Debug, Clone, PartialEq)]
pub enum ColorError {
    /// Not a 3 or 6 digit hex color
    InvalidHex(String),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::InvalidHex(s) => write!(f, "Invalid hex color: '{}'", s),
        }
    }
}

impl std::error::Error for ColorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_white_and_black() {
        assert_eq!(Color::from_hex("#ffffff").unwrap(), Color::WHITE);
        assert_eq!(Color::from_hex("000000").unwrap(), Color::BLACK);
    }

    #[test]
    fn test_hex_is_linearized() {
        let c = Color::from_hex("#d4d4d4").unwrap();
        // 0xd4 = 212 -> 0.8314 sRGB -> ~0.658 linear
        assert!((c.r - 0.658).abs() < 0.002);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }

    #[test]
    fn test_short_hex() {
        assert_eq!(Color::from_hex("#fff").unwrap(), Color::WHITE);
    }

    #[test]
    fn test_invalid_hex() {
        assert!(matches!(Color::from_hex("#12345"), Err(ColorError::InvalidHex(_))));
        assert!(matches!(Color::from_hex("#gggggg"), Err(ColorError::InvalidHex(_))));
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn test_sign_characters_rejected() {
        for bad in ["+f+f+f", "#+f+f+f", "+ff", "-1-1-1"] {
            assert!(
                matches!(Color::from_hex(bad), Err(ColorError::InvalidHex(_))),
                "{} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_scaled_and_add() {
        let c = Color::new(1.0, 0.5, 0.25).scaled(2.0) + Color::new(0.0, 0.0, 0.5);
        assert_eq!(c, Color::new(2.0, 1.0, 1.0));
    }
}
