//! Orbit controller for inspecting the lamp
//!
//! Controls:
//! - Left drag: orbit around the target
//! - Right drag: pan the target in the view plane
//! - Mouse wheel: zoom in/out
//!
//! Input is accumulated between frames and applied with exponential damping,
//! so the camera glides to a stop after the mouse is released.

use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Reference frame rate the damping factor is expressed at
const DAMPING_REFERENCE_HZ: f32 = 60.0;

/// Pixels per scroll "line" for touchpads reporting pixel deltas
const PIXELS_PER_LINE: f32 = 100.0;

/// Orbit controller state
pub struct OrbitController {
    // Button state
    rotating: bool,
    panning: bool,

    // Input not yet applied to the camera
    pending_azimuth: f32,
    pending_polar: f32,
    pending_zoom: f32,
    pending_pan: (f32, f32),

    // Configuration
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Fraction of pending input applied per 60 Hz frame (1 = no damping)
    pub damping_factor: f32,
    pub damping_enabled: bool,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            rotating: false,
            panning: false,

            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_zoom: 0.0,
            pending_pan: (0.0, 0.0),

            rotate_speed: 0.005,  // radians per pixel
            zoom_speed: 0.1,      // log-distance per wheel line
            pan_speed: 0.0015,    // fraction of distance per pixel
            damping_factor: 0.05,
            damping_enabled: true,
        }
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;

        match button {
            MouseButton::Left => self.rotating = pressed,
            MouseButton::Right | MouseButton::Middle => self.panning = pressed,
            _ => {}
        }
    }

    /// Process raw mouse movement (only counts while a button is held)
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        let (dx, dy) = (delta_x as f32, delta_y as f32);
        if self.rotating {
            // Dragging right swings the camera left around the target, like
            // grabbing the scene and turning it
            self.pending_azimuth -= dx * self.rotate_speed;
            self.pending_polar -= dy * self.rotate_speed;
        } else if self.panning {
            self.pending_pan.0 -= dx * self.pan_speed;
            self.pending_pan.1 += dy * self.pan_speed;
        }
    }

    /// Process mouse wheel input (positive = zoom in)
    pub fn process_scroll(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
        };
        self.pending_zoom += lines * self.zoom_speed;
    }

    /// Apply the share of pending input due this frame to `camera`
    ///
    /// With damping, the applied fraction is `1 - (1 - d)^(dt * 60)`, so the
    /// result is independent of frame rate and the total applied converges to
    /// the total input.
    pub fn update<C: OrbitControl>(&mut self, camera: &mut C, dt: f32) {
        let fraction = self.applied_fraction(dt);

        let azimuth = self.pending_azimuth * fraction;
        let polar = self.pending_polar * fraction;
        let zoom = self.pending_zoom * fraction;
        let pan = (self.pending_pan.0 * fraction, self.pending_pan.1 * fraction);

        if azimuth != 0.0 || polar != 0.0 {
            camera.rotate(azimuth, polar);
        }
        if zoom != 0.0 {
            // Exponential so each wheel notch scales distance by the same ratio
            camera.zoom((-zoom).exp());
        }
        if pan.0 != 0.0 || pan.1 != 0.0 {
            camera.pan(pan.0, pan.1);
        }

        self.pending_azimuth -= azimuth;
        self.pending_polar -= polar;
        self.pending_zoom -= zoom;
        self.pending_pan.0 -= pan.0;
        self.pending_pan.1 -= pan.1;
    }

    /// Drop any input that has not been applied yet
    pub fn stop(&mut self) {
        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
        self.pending_zoom = 0.0;
        self.pending_pan = (0.0, 0.0);
    }

    /// Check if the camera is still gliding
    pub fn is_moving(&self) -> bool {
        const EPS: f32 = 1e-5;
        self.pending_azimuth.abs() > EPS
            || self.pending_polar.abs() > EPS
            || self.pending_zoom.abs() > EPS
            || self.pending_pan.0.abs() > EPS
            || self.pending_pan.1.abs() > EPS
    }

    fn applied_fraction(&self, dt: f32) -> f32 {
        if !self.damping_enabled {
            return 1.0;
        }
        let d = self.damping_factor.clamp(0.0, 1.0);
        1.0 - (1.0 - d).powf(dt.max(0.0) * DAMPING_REFERENCE_HZ)
    }

    /// Builder: set rotation speed (radians per pixel)
    pub fn with_rotate_speed(mut self, speed: f32) -> Self {
        self.rotate_speed = speed;
        self
    }

    /// Builder: set zoom speed (log-distance per wheel line)
    pub fn with_zoom_speed(mut self, speed: f32) -> Self {
        self.zoom_speed = speed;
        self
    }

    /// Builder: set pan speed (fraction of distance per pixel)
    pub fn with_pan_speed(mut self, speed: f32) -> Self {
        self.pan_speed = speed;
        self
    }

    /// Builder: set damping factor per 60 Hz frame
    pub fn with_damping_factor(mut self, factor: f32) -> Self {
        self.damping_factor = factor;
        self
    }

    /// Builder: enable or disable damping
    pub fn with_damping(mut self, enabled: bool) -> Self {
        self.damping_enabled = enabled;
        self
    }
}

/// Trait for orbit cameras
/// Allows the controller to drive different camera implementations
pub trait OrbitControl {
    /// Rotate around the target (radians)
    fn rotate(&mut self, delta_azimuth: f32, delta_polar: f32);
    /// Multiply the distance to the target by `scale`
    fn zoom(&mut self, scale: f32);
    /// Move the target along the view's right/up axes, in units of distance
    fn pan(&mut self, right: f32, up: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorded {
        azimuth: f32,
        polar: f32,
        distance_scale: f32,
        pan: (f32, f32),
    }

    impl OrbitControl for Recorded {
        fn rotate(&mut self, delta_azimuth: f32, delta_polar: f32) {
            self.azimuth += delta_azimuth;
            self.polar += delta_polar;
        }
        fn zoom(&mut self, scale: f32) {
            self.distance_scale *= scale;
        }
        fn pan(&mut self, right: f32, up: f32) {
            self.pan.0 += right;
            self.pan.1 += up;
        }
    }

    fn recorded() -> Recorded {
        Recorded { distance_scale: 1.0, ..Default::default() }
    }

    #[test]
    fn test_motion_ignored_without_button() {
        let mut controller = OrbitController::new().with_damping(false);
        let mut cam = recorded();
        controller.process_mouse_motion(100.0, 50.0);
        controller.update(&mut cam, 1.0 / 60.0);
        assert_eq!(cam.azimuth, 0.0);
        assert_eq!(cam.polar, 0.0);
    }

    #[test]
    fn test_drag_rotates_immediately_without_damping() {
        let mut controller = OrbitController::new().with_damping(false).with_rotate_speed(0.01);
        let mut cam = recorded();
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.process_mouse_motion(10.0, -20.0);
        controller.update(&mut cam, 1.0 / 60.0);
        assert!((cam.azimuth + 0.1).abs() < 1e-6);
        assert!((cam.polar - 0.2).abs() < 1e-6);
        assert!(!controller.is_moving());
    }

    #[test]
    fn test_damping_converges_to_full_input() {
        let mut controller = OrbitController::new().with_rotate_speed(0.01).with_damping_factor(0.1);
        let mut cam = recorded();
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.process_mouse_motion(-100.0, 0.0);
        controller.process_mouse_button(MouseButton::Left, ElementState::Released);

        controller.update(&mut cam, 1.0 / 60.0);
        // First frame applies exactly the damping factor
        assert!((cam.azimuth - 0.1).abs() < 1e-5);
        assert!(controller.is_moving());

        for _ in 0..600 {
            controller.update(&mut cam, 1.0 / 60.0);
        }
        assert!((cam.azimuth - 1.0).abs() < 1e-4);
        assert!(!controller.is_moving());
    }

    #[test]
    fn test_damping_is_frame_rate_independent() {
        let drag = |steps: usize, dt: f32| {
            let mut controller = OrbitController::new().with_rotate_speed(0.01);
            let mut cam = recorded();
            controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
            controller.process_mouse_motion(-100.0, 0.0);
            for _ in 0..steps {
                controller.update(&mut cam, dt);
            }
            cam.azimuth
        };
        let at_30 = drag(15, 1.0 / 30.0);
        let at_120 = drag(60, 1.0 / 120.0);
        assert!((at_30 - at_120).abs() < 1e-4);
    }

    #[test]
    fn test_scroll_zooms_in() {
        let mut controller = OrbitController::new().with_damping(false);
        let mut cam = recorded();
        controller.process_scroll(MouseScrollDelta::LineDelta(0.0, 2.0));
        controller.update(&mut cam, 1.0 / 60.0);
        assert!(cam.distance_scale < 1.0);
        assert!((cam.distance_scale - (-0.2f32).exp()).abs() < 1e-6);
    }

    #[test]
    fn test_right_drag_pans() {
        let mut controller = OrbitController::new().with_damping(false).with_pan_speed(0.01);
        let mut cam = recorded();
        controller.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        controller.process_mouse_motion(10.0, 10.0);
        controller.update(&mut cam, 1.0 / 60.0);
        assert!((cam.pan.0 + 0.1).abs() < 1e-6);
        assert!((cam.pan.1 - 0.1).abs() < 1e-6);
        assert_eq!(cam.azimuth, 0.0);
    }

    #[test]
    fn test_stop_discards_pending() {
        let mut controller = OrbitController::new();
        controller.process_scroll(MouseScrollDelta::LineDelta(0.0, 5.0));
        assert!(controller.is_moving());
        controller.stop();
        assert!(!controller.is_moving());
    }
}
