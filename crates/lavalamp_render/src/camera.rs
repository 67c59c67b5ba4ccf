//! Orbit camera
//!
//! The camera sits on a sphere around a target point, parameterized by
//! azimuth (around +Y, zero looking down -Z) and polar angle (from +Y).

use lavalamp_input::OrbitControl;
use lavalamp_math::mat4::{self, Mat4};
use lavalamp_math::Vec3;

/// Keeps the camera off the poles, where the up vector degenerates
const POLAR_EPSILON: f32 = 1e-3;

/// Snapshot restored by [`OrbitCamera::reset`]
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrbitState {
    target: Vec3,
    distance: f32,
    azimuth: f32,
    polar: f32,
}

/// Camera orbiting a target point
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub azimuth: f32,
    pub polar: f32,

    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,

    pub min_distance: f32,
    pub max_distance: f32,

    initial: OrbitState,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO)
    }
}

impl OrbitCamera {
    /// Create a camera at `position` looking at `target`
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(f32::EPSILON);
        let polar = (offset.y / distance)
            .clamp(-1.0, 1.0)
            .acos()
            .clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);
        let azimuth = offset.x.atan2(offset.z);

        let initial = OrbitState {
            target,
            distance,
            azimuth,
            polar,
        };

        Self {
            target,
            distance,
            azimuth,
            polar,
            fov_y: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            initial,
        }
    }

    /// Builder: set the vertical field of view in degrees
    pub fn with_fov_degrees(mut self, degrees: f32) -> Self {
        self.fov_y = degrees.to_radians();
        self
    }

    /// Builder: set the near and far clip planes
    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Builder: limit the zoom range
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max.max(min);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        self.initial.distance = self.distance;
        self
    }

    /// Camera position in world space
    pub fn eye(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance
    }

    /// Unit vector pointing to the right of the view
    pub fn right(&self) -> Vec3 {
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        Vec3::new(cos_a, 0.0, -sin_a)
    }

    /// Unit vector pointing up in the view plane
    pub fn up(&self) -> Vec3 {
        let forward = (self.target - self.eye()).normalized();
        self.right().cross(forward).normalized()
    }

    pub fn view_matrix(&self) -> Mat4 {
        mat4::look_at(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        mat4::perspective(self.fov_y, aspect, self.near, self.far)
    }

    /// Projection * view
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        mat4::mul(self.projection(aspect), self.view_matrix())
    }

    /// Return to the pose the camera was created with
    pub fn reset(&mut self) {
        self.target = self.initial.target;
        self.distance = self.initial.distance;
        self.azimuth = self.initial.azimuth;
        self.polar = self.initial.polar;
    }
}

impl OrbitControl for OrbitCamera {
    fn rotate(&mut self, delta_azimuth: f32, delta_polar: f32) {
        self.azimuth = (self.azimuth + delta_azimuth).rem_euclid(std::f32::consts::TAU);
        self.polar = (self.polar + delta_polar).clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);
    }

    fn zoom(&mut self, scale: f32) {
        self.distance = (self.distance * scale).clamp(self.min_distance, self.max_distance);
    }

    fn pan(&mut self, right: f32, up: f32) {
        let offset = self.right() * (right * self.distance) + self.up() * (up * self.distance);
        self.target += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_default_camera_position() {
        let cam = OrbitCamera::default();
        assert!((cam.distance - 5.0).abs() < EPSILON);
        assert!((cam.polar - FRAC_PI_2).abs() < EPSILON);
        assert!(cam.azimuth.abs() < EPSILON);
        assert!(approx_eq(cam.eye(), Vec3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn test_eye_round_trips_through_spherical() {
        let position = Vec3::new(2.0, 3.0, -1.0);
        let target = Vec3::new(0.5, 0.5, 0.5);
        let cam = OrbitCamera::new(position, target);
        assert!(approx_eq(cam.eye(), position));
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let mut cam = OrbitCamera::default();
        cam.rotate(0.7, -0.4);
        let forward = (cam.target - cam.eye()).normalized();
        assert!((cam.right().length() - 1.0).abs() < EPSILON);
        assert!((cam.up().length() - 1.0).abs() < EPSILON);
        assert!(cam.right().dot(forward).abs() < EPSILON);
        assert!(cam.up().dot(forward).abs() < EPSILON);
    }

    #[test]
    fn test_default_view_basis() {
        let cam = OrbitCamera::default();
        assert!(approx_eq(cam.right(), Vec3::X));
        assert!(approx_eq(cam.up(), Vec3::Y));
    }

    #[test]
    fn test_polar_is_clamped_away_from_poles() {
        let mut cam = OrbitCamera::default();
        cam.rotate(0.0, -10.0);
        assert!(cam.polar > 0.0);
        cam.rotate(0.0, 20.0);
        assert!(cam.polar < PI);
        // Still a usable view matrix at the clamp
        assert!(cam.up().length() > 0.5);
    }

    #[test]
    fn test_zoom_respects_limits() {
        let mut cam = OrbitCamera::default().with_distance_limits(1.0, 10.0);
        cam.zoom(0.01);
        assert_eq!(cam.distance, 1.0);
        cam.zoom(1000.0);
        assert_eq!(cam.distance, 10.0);
    }

    #[test]
    fn test_pan_moves_target_and_eye_together() {
        let mut cam = OrbitCamera::default();
        let eye_before = cam.eye();
        cam.pan(0.1, 0.0);
        let shift = Vec3::X * 0.5;
        assert!(approx_eq(cam.target, shift));
        assert!(approx_eq(cam.eye(), eye_before + shift));
    }

    #[test]
    fn test_reset_restores_initial_pose() {
        let mut cam = OrbitCamera::default();
        cam.rotate(1.0, 0.3);
        cam.zoom(0.5);
        cam.pan(0.2, 0.2);
        cam.reset();
        assert!(approx_eq(cam.eye(), Vec3::new(0.0, 0.0, 5.0)));
        assert!(approx_eq(cam.target, Vec3::ZERO));
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let mut cam = OrbitCamera::default();
        cam.rotate(0.4, 0.2);
        let clip = mat4::transform_point(cam.view_projection(16.0 / 9.0), cam.target);
        assert!(clip.x.abs() < 1e-4);
        assert!(clip.y.abs() < 1e-4);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }
}
