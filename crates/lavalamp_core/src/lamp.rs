//! Procedural lava lamp model
//!
//! The lamp is exposed as a set of named mesh geometries so the scene can
//! look parts up by node name:
//!
//! - [`LAMP_CAPS`] - metal top cap and the collar ring above the base
//! - [`LAVA_LAMP_BODY`] - the glass vessel, drawn with the animated shader
//! - [`LAMP_BOTTOM`] - the conical base, drawn as a glowing emitter
//!
//! Heights are in model units with the lamp roughly centered on the origin;
//! the scene applies a uniform scale on top.

use std::collections::BTreeMap;
use std::fmt;

use crate::mesh::Mesh;

/// Node name of the metal caps
pub const LAMP_CAPS: &str = "LampCaps";
/// Node name of the glass body
pub const LAVA_LAMP_BODY: &str = "LavaLampBody";
/// Node name of the base
pub const LAMP_BOTTOM: &str = "LampBottom";

/// Default number of segments around the axis
pub const DEFAULT_SEGMENTS: u32 = 64;

const BOTTOM_PROFILE: [[f32; 2]; 5] = [
    [0.00, -1.70],
    [0.62, -1.70],
    [0.60, -1.60],
    [0.42, -0.78],
    [0.37, -0.74],
];

const BODY_PROFILE: [[f32; 2]; 7] = [
    [0.37, -0.74],
    [0.42, -0.50],
    [0.46, -0.20],
    [0.45, 0.15],
    [0.40, 0.55],
    [0.32, 0.95],
    [0.26, 1.28],
];

const COLLAR_PROFILE: [[f32; 2]; 4] = [
    [0.38, -0.80],
    [0.40, -0.76],
    [0.40, -0.66],
    [0.38, -0.62],
];

const CAP_SIDE_PROFILE: [[f32; 2]; 3] = [
    [0.28, 1.24],
    [0.24, 1.50],
    [0.15, 1.78],
];

const CAP_TOP_PROFILE: [[f32; 2]; 2] = [
    [0.15, 1.78],
    [0.00, 1.78],
];

/// Named lamp geometries
#[derive(Debug, Clone)]
pub struct LampModel {
    nodes: BTreeMap<String, Mesh>,
}

impl LampModel {
    /// Build all lamp parts with `segments` subdivisions around the axis
    pub fn build(segments: u32) -> Result<Self, ModelError> {
        let mut caps = Mesh::lathe(&COLLAR_PROFILE, segments)?;
        caps.merge(&Mesh::lathe(&CAP_SIDE_PROFILE, segments)?);
        caps.merge(&Mesh::lathe(&CAP_TOP_PROFILE, segments)?);

        let body = Mesh::lathe(&BODY_PROFILE, segments)?;
        let bottom = Mesh::lathe(&BOTTOM_PROFILE, segments)?;

        let mut nodes = BTreeMap::new();
        nodes.insert(LAMP_CAPS.to_string(), caps);
        nodes.insert(LAVA_LAMP_BODY.to_string(), body);
        nodes.insert(LAMP_BOTTOM.to_string(), bottom);

        let model = Self { nodes };
        log::debug!(
            "Built lamp model: {} nodes, {} triangles",
            model.nodes.len(),
            model.nodes.values().map(Mesh::triangle_count).sum::<usize>()
        );
        Ok(model)
    }

    /// Look up a geometry by node name
    pub fn geometry(&self, name: &str) -> Result<&Mesh, ModelError> {
        self.nodes
            .get(name)
            .ok_or_else(|| ModelError::MissingNode(name.to_string()))
    }

    /// All node names (sorted)
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }
}

/// Error building or querying the lamp model
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A lathe profile cannot produce a mesh
    InvalidProfile(String),
    /// No geometry with the requested node name
    MissingNode(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidProfile(msg) => write!(f, "Invalid lathe profile: {}", msg),
            ModelError::MissingNode(name) => write!(f, "Model has no node named '{}'", name),
        }
    }
}

impl std::error::Error for ModelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_has_named_nodes() {
        let model = LampModel::build(16).unwrap();
        let names: Vec<&str> = model.node_names().collect();
        assert_eq!(names, vec![LAMP_BOTTOM, LAMP_CAPS, LAVA_LAMP_BODY]);
        for name in names {
            assert!(model.geometry(name).unwrap().triangle_count() > 0);
        }
    }

    #[test]
    fn test_missing_node() {
        let model = LampModel::build(8).unwrap();
        assert_eq!(
            model.geometry("Lid").unwrap_err(),
            ModelError::MissingNode("Lid".to_string())
        );
    }

    #[test]
    fn test_parts_stack_vertically() {
        let model = LampModel::build(8).unwrap();
        let (bottom_lo, bottom_hi) = model.geometry(LAMP_BOTTOM).unwrap().bounds().unwrap();
        let (body_lo, body_hi) = model.geometry(LAVA_LAMP_BODY).unwrap().bounds().unwrap();
        let (_, caps_hi) = model.geometry(LAMP_CAPS).unwrap().bounds().unwrap();

        assert!(bottom_lo.y < body_lo.y);
        assert!((bottom_hi.y - body_lo.y).abs() < 1e-6);
        assert!(body_hi.y < caps_hi.y);
    }

    #[test]
    fn test_too_few_segments() {
        assert!(matches!(LampModel::build(2), Err(ModelError::InvalidProfile(_))));
    }
}
