//! Application systems
//!
//! Modular systems driven by main.rs, kept separate for testability.

mod animation;
mod render;
mod window;

pub use animation::{AnimationSystem, FrameUpdate};
pub use render::{RenderError, RenderSystem};
pub use window::{WindowError, WindowSystem};
