//! Lava lamp application library
//!
//! Configuration, input mapping, scene construction and the systems that the
//! `lavalamp` binary drives from its event loop.

pub mod config;
pub mod input;
pub mod scene;
pub mod systems;
