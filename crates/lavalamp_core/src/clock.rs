//! Frame delta measurement

use std::time::Instant;

/// Default upper bound on a single frame delta (seconds)
pub const DEFAULT_MAX_FRAME_DELTA: f32 = 0.25;

/// Wall-clock frame timer
///
/// Produces the delta fed to the time uniform. Deltas are capped so a stall
/// (window drag, breakpoint, first frame after device creation) does not
/// make the animation jump.
pub struct FrameClock {
    last_frame: Instant,
    max_delta: f32,
}

impl FrameClock {
    /// Create a clock with the default cap
    pub fn new() -> Self {
        Self::with_max_delta(DEFAULT_MAX_FRAME_DELTA)
    }

    /// Create a clock with a custom cap (non-positive disables capping)
    pub fn with_max_delta(max_delta: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            max_delta,
        }
    }

    /// Measure the time since the previous tick
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw_dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.cap(raw_dt)
    }

    /// Apply the delta cap
    ///
    /// Non-finite deltas pass through untouched so the animator can reject them.
    pub fn cap(&self, raw_dt: f32) -> f32 {
        if self.max_delta > 0.0 && raw_dt.is_finite() {
            raw_dt.min(self.max_delta)
        } else {
            raw_dt
        }
    }

    /// Configured cap in seconds
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap() {
        let clock = FrameClock::with_max_delta(0.1);
        assert_eq!(clock.cap(0.05), 0.05);
        assert_eq!(clock.cap(3.0), 0.1);
    }

    #[test]
    fn test_cap_disabled() {
        let clock = FrameClock::with_max_delta(0.0);
        assert_eq!(clock.cap(3.0), 3.0);
    }

    #[test]
    fn test_cap_keeps_non_finite_deltas() {
        let clock = FrameClock::with_max_delta(0.25);
        assert!(clock.cap(f32::NAN).is_nan());
        assert_eq!(clock.cap(f32::INFINITY), f32::INFINITY);
        // Negative deltas are below any cap
        assert_eq!(clock.cap(-1.0), -1.0);
    }

    #[test]
    fn test_tick_measures_elapsed_time() {
        let mut clock = FrameClock::with_max_delta(10.0);
        std::thread::sleep(std::time::Duration::from_millis(20));
        let dt = clock.tick();
        assert!(dt >= 0.02);
        assert!(clock.tick() >= 0.0);
    }

    #[test]
    fn test_tick_capped_after_stall() {
        let mut clock = FrameClock::with_max_delta(0.01);
        std::thread::sleep(std::time::Duration::from_millis(30));
        assert_eq!(clock.tick(), 0.01);
    }
}
