//! Scene construction utilities
//!
//! This module turns configuration into the lamp scene, camera and controller.

mod scene_builder;

pub use scene_builder::{SceneBuilder, camera_from_config, controller_from_config};
