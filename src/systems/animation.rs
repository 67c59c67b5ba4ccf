//! Frame animation system
//!
//! Runs once per rendered frame, before the frame is drawn:
//! - Frame delta measurement
//! - Camera damping
//! - Time uniform advance and publication
//! - Frame statistics

use lavalamp_core::{FrameAnimator, FrameClock, FrameStats, UniformTarget};
use lavalamp_input::{OrbitControl, OrbitController};

use crate::config::AnimationConfig;

/// Result of an animation update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    /// Capped frame delta in seconds
    pub dt: f32,
    /// Scene time published for this frame
    pub time: f32,
    /// Whether a stats summary should be reported
    pub stats_due: bool,
}

/// Owns the frame clock and the scene time
pub struct AnimationSystem {
    clock: FrameClock,
    animator: FrameAnimator,
    stats: FrameStats,
}

impl AnimationSystem {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            clock: FrameClock::with_max_delta(config.max_frame_delta),
            animator: FrameAnimator::new(),
            stats: FrameStats::new(),
        }
    }

    /// Run one animation frame using the wall clock
    pub fn update<C, T>(&mut self, camera: &mut C, controller: &mut OrbitController, target: &mut T) -> FrameUpdate
    where
        C: OrbitControl,
        T: UniformTarget + ?Sized,
    {
        let dt = self.clock.tick();
        self.step(dt, camera, controller, target)
    }

    /// Run one animation frame with an explicit delta
    ///
    /// `dt` is capped the same way as a measured delta.
    pub fn step<C, T>(
        &mut self,
        dt: f32,
        camera: &mut C,
        controller: &mut OrbitController,
        target: &mut T,
    ) -> FrameUpdate
    where
        C: OrbitControl,
        T: UniformTarget + ?Sized,
    {
        // Non-finite deltas skip the cap; the animator rejects and reports them
        let raw = self.clock.cap(dt);
        let time = self.animator.on_frame(raw, target);
        let dt = if raw.is_finite() && raw >= 0.0 { raw } else { 0.0 };

        controller.update(camera, dt);
        let stats_due = self.stats.record(dt);

        FrameUpdate { dt, time, stats_due }
    }

    /// Scene time in seconds
    pub fn time(&self) -> f32 {
        self.animator.time()
    }

    /// Frames animated so far
    pub fn frame_count(&self) -> u64 {
        self.animator.frame_count()
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }
}
