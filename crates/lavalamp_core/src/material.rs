//! Surface materials
//!
//! Three kinds of surface appear in the scene: a lit metallic material for the
//! caps, an unlit emitter for the base, and a custom shader pair for the body.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::Color;

/// Physically-inspired lit material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMaterial {
    pub color: Color,
    /// 0 = dielectric, 1 = metal
    pub metalness: f32,
    /// 0 = mirror, 1 = fully diffuse
    pub roughness: f32,
}

impl StandardMaterial {
    /// Clamp metalness and roughness into `[0, 1]`
    pub fn clamped(self) -> Self {
        Self {
            color: self.color,
            metalness: self.metalness.clamp(0.0, 1.0),
            roughness: self.roughness.clamp(0.0, 1.0),
        }
    }
}

/// Flat color, no lighting; HDR values glow through bloom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnlitMaterial {
    pub color: Color,
}

/// Shader stage of a source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Entry point every source for this stage must define
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Where a WGSL source text comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderSource {
    /// The source compiled into the renderer
    Builtin,
    /// A file on disk, read at startup
    File(PathBuf),
}

impl ShaderSource {
    /// `Builtin` for `None`, `File` otherwise
    pub fn from_optional_path(path: Option<&Path>) -> Self {
        match path {
            Some(p) => ShaderSource::File(p.to_path_buf()),
            None => ShaderSource::Builtin,
        }
    }

    /// Resolve to source text, checking the stage's entry point is present
    pub fn load<'a>(&self, stage: ShaderStage, builtin: &'a str) -> Result<Cow<'a, str>, ShaderError> {
        let text = match self {
            ShaderSource::Builtin => Cow::Borrowed(builtin),
            ShaderSource::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
                    path: path.clone(),
                    source,
                })?;
                log::info!("Loaded {} shader from {}", stage, path.display());
                Cow::Owned(text)
            }
        };

        if text.trim().is_empty() {
            return Err(ShaderError::Empty { stage, origin: self.describe() });
        }
        if !text.contains(stage.entry_point()) {
            return Err(ShaderError::MissingEntryPoint {
                stage,
                origin: self.describe(),
            });
        }
        Ok(text)
    }

    fn describe(&self) -> String {
        match self {
            ShaderSource::Builtin => "built-in".to_string(),
            ShaderSource::File(path) => path.display().to_string(),
        }
    }
}

/// Custom vertex/fragment shader pair
///
/// This is the only material that receives the scene time uniform.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderMaterial {
    pub vertex: ShaderSource,
    pub fragment: ShaderSource,
    /// Alpha blended, drawn after opaque geometry without depth writes
    pub transparent: bool,
}

impl Default for ShaderMaterial {
    fn default() -> Self {
        Self {
            vertex: ShaderSource::Builtin,
            fragment: ShaderSource::Builtin,
            transparent: true,
        }
    }
}

/// Error resolving shader sources
#[derive(Debug)]
pub enum ShaderError {
    /// Reading a shader file failed
    Io { path: PathBuf, source: std::io::Error },
    /// Source text is empty
    Empty { stage: ShaderStage, origin: String },
    /// Source lacks `vs_main` / `fs_main`
    MissingEntryPoint { stage: ShaderStage, origin: String },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Io { path, source } => {
                write!(f, "Failed to read shader {}: {}", path.display(), source)
            }
            ShaderError::Empty { stage, origin } => {
                write!(f, "Empty {} shader ({})", stage, origin)
            }
            ShaderError::MissingEntryPoint { stage, origin } => write!(
                f,
                "{} shader ({}) does not define '{}'",
                stage,
                origin,
                stage.entry_point()
            ),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShaderError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(); }";

    #[test]
    fn test_builtin_borrows() {
        let text = ShaderSource::Builtin.load(ShaderStage::Vertex, VERTEX).unwrap();
        assert!(matches!(text, Cow::Borrowed(_)));
    }

    #[test]
    fn test_missing_entry_point() {
        let err = ShaderSource::Builtin
            .load(ShaderStage::Fragment, VERTEX)
            .unwrap_err();
        assert!(matches!(err, ShaderError::MissingEntryPoint { stage: ShaderStage::Fragment, .. }));
        assert!(err.to_string().contains("fs_main"));
    }

    #[test]
    fn test_empty_source() {
        let err = ShaderSource::Builtin.load(ShaderStage::Vertex, "  \n").unwrap_err();
        assert!(matches!(err, ShaderError::Empty { .. }));
    }

    #[test]
    fn test_missing_file() {
        let source = ShaderSource::File(PathBuf::from("does/not/exist.wgsl"));
        let err = source.load(ShaderStage::Vertex, VERTEX).unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_file_source() {
        let path = std::env::temp_dir().join("lavalamp_material_test.vert.wgsl");
        std::fs::write(&path, VERTEX).unwrap();
        let text = ShaderSource::File(path.clone())
            .load(ShaderStage::Vertex, "")
            .unwrap();
        assert_eq!(text, VERTEX);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_from_optional_path() {
        assert_eq!(ShaderSource::from_optional_path(None), ShaderSource::Builtin);
        assert_eq!(
            ShaderSource::from_optional_path(Some(Path::new("a.wgsl"))),
            ShaderSource::File(PathBuf::from("a.wgsl"))
        );
    }

    #[test]
    fn test_standard_material_clamped() {
        let m = StandardMaterial { color: Color::WHITE, metalness: 1.5, roughness: -0.2 }.clamped();
        assert_eq!(m.metalness, 1.0);
        assert_eq!(m.roughness, 0.0);
    }
}
