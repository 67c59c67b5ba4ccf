//! Orbit Input Handling
//!
//! This crate turns mouse input into orbit-camera motion around the lamp.

mod orbit_controller;

pub use orbit_controller::{OrbitController, OrbitControl};
