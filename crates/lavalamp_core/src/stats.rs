//! Rolling frame statistics for the debug overlay

use std::collections::VecDeque;

/// Default number of frames averaged
pub const DEFAULT_WINDOW: usize = 60;

/// How often [`FrameStats::record`] reports that a summary is due (seconds)
const REPORT_INTERVAL: f32 = 1.0;

/// Rolling window of frame deltas
#[derive(Debug, Clone)]
pub struct FrameStats {
    samples: VecDeque<f32>,
    window: usize,
    since_report: f32,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    /// Create stats averaging over the last `window` frames (at least one)
    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
            since_report: 0.0,
        }
    }

    /// Record a frame delta in seconds
    ///
    /// Returns true roughly once per second, when a log summary is due.
    pub fn record(&mut self, dt: f32) -> bool {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(dt);

        self.since_report += dt;
        if self.since_report >= REPORT_INTERVAL {
            self.since_report = 0.0;
            true
        } else {
            false
        }
    }

    /// Number of samples currently in the window
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Average frame time in seconds (0 with no samples)
    pub fn average_frame_time(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f32>() / self.samples.len() as f32
    }

    /// Average frames per second (0 with no samples)
    pub fn fps(&self) -> f32 {
        let avg = self.average_frame_time();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    /// Slowest frame in the window, in seconds
    pub fn worst_frame_time(&self) -> f32 {
        self.samples.iter().copied().fold(0.0, f32::max)
    }

    /// Short human-readable summary, e.g. `60 FPS (16.7 ms, worst 18.2 ms)`
    pub fn summary(&self) -> String {
        format!(
            "{:.0} FPS ({:.1} ms, worst {:.1} ms)",
            self.fps(),
            self.average_frame_time() * 1000.0,
            self.worst_frame_time() * 1000.0
        )
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = FrameStats::new();
        assert_eq!(stats.fps(), 0.0);
        assert_eq!(stats.average_frame_time(), 0.0);
        assert_eq!(stats.worst_frame_time(), 0.0);
    }

    #[test]
    fn test_average_and_fps() {
        let mut stats = FrameStats::new();
        stats.record(0.25);
        stats.record(0.25);
        stats.record(0.5);
        assert!((stats.average_frame_time() - 1.0 / 3.0).abs() < 1e-6);
        assert!((stats.fps() - 3.0).abs() < 1e-4);
        assert_eq!(stats.worst_frame_time(), 0.5);
    }

    #[test]
    fn test_window_drops_old_samples() {
        let mut stats = FrameStats::with_window(2);
        stats.record(1.0);
        stats.record(0.5);
        stats.record(0.5);
        assert_eq!(stats.sample_count(), 2);
        assert_eq!(stats.worst_frame_time(), 0.5);
    }

    #[test]
    fn test_report_due_once_per_second() {
        let mut stats = FrameStats::new();
        let due: Vec<bool> = (0..8).map(|_| stats.record(0.25)).collect();
        assert_eq!(due, vec![false, false, false, true, false, false, false, true]);
    }

    #[test]
    fn test_summary_format() {
        let mut stats = FrameStats::new();
        stats.record(0.02);
        assert_eq!(stats.summary(), "50 FPS (20.0 ms, worst 20.0 ms)");
    }
}
