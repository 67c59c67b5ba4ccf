//! Per-frame time uniform
//!
//! The animated lamp body reads a single scalar, the elapsed scene time in
//! seconds. [`FrameAnimator`] owns that scalar, advances it once per rendered
//! frame by the frame's delta, and publishes it to a [`UniformTarget`] before
//! the frame is drawn.

/// Accumulated scene time in seconds
///
/// Starts at zero, never decreases, and is never reset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeUniform {
    value: f32,
}

impl TimeUniform {
    /// Create a time uniform starting at zero
    pub fn new() -> Self {
        Self { value: 0.0 }
    }

    /// Current accumulated time
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Add `delta` seconds and return the new value
    ///
    /// Negative or non-finite deltas are treated as zero.
    pub fn advance(&mut self, delta: f32) -> f32 {
        self.value += sanitize_delta(delta);
        self.value
    }
}

/// Receiver of the published time value
///
/// Implemented by the GPU shader material (writes its uniform buffer) and by
/// test doubles that record what was published.
pub trait UniformTarget {
    /// Write the scene time into the shader's uniform input
    fn publish_time(&mut self, time: f32);
}

/// Drives the time uniform from the host render loop
#[derive(Debug, Default)]
pub struct FrameAnimator {
    time: TimeUniform,
    frames: u64,
}

impl FrameAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame and publish the result
    ///
    /// The stored time is incremented exactly once and `target` receives
    /// exactly one write per call.
    pub fn on_frame<T: UniformTarget + ?Sized>(&mut self, delta: f32, target: &mut T) -> f32 {
        let time = self.time.advance(delta);
        self.frames += 1;
        target.publish_time(time);
        time
    }

    /// Current scene time in seconds
    pub fn time(&self) -> f32 {
        self.time.value()
    }

    /// Number of frames advanced so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

fn sanitize_delta(delta: f32) -> f32 {
    if delta.is_finite() && delta >= 0.0 {
        delta
    } else {
        log::warn!("Ignoring invalid frame delta {}", delta);
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<f32>,
    }

    impl UniformTarget for Recorder {
        fn publish_time(&mut self, time: f32) {
            self.writes.push(time);
        }
    }

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(TimeUniform::new().value(), 0.0);
        assert_eq!(FrameAnimator::new().time(), 0.0);
    }

    #[test]
    fn test_single_frame_applied_once() {
        let mut animator = FrameAnimator::new();
        let mut target = Recorder::default();
        animator.on_frame(0.5, &mut target);

        let prior = animator.time();
        let published = animator.on_frame(0.25, &mut target);

        assert_eq!(published, prior + 0.25);
        assert_eq!(target.writes, vec![0.5, 0.75]);
        assert_eq!(animator.frame_count(), 2);
    }

    #[test]
    fn test_zero_delta_never_changes_value() {
        let mut animator = FrameAnimator::new();
        let mut target = Recorder::default();
        for _ in 0..100 {
            animator.on_frame(0.0, &mut target);
        }
        assert_eq!(target.writes.len(), 100);
        assert!(target.writes.iter().all(|&t| t == 0.0));
    }

    #[test]
    fn test_invalid_delta_ignored() {
        let mut time = TimeUniform::new();
        time.advance(1.0);
        assert_eq!(time.advance(-0.5), 1.0);
        assert_eq!(time.advance(f32::NAN), 1.0);
        assert_eq!(time.advance(f32::INFINITY), 1.0);
    }
}
