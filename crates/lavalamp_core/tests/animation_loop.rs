//! Integration tests for the per-frame time uniform
//!
//! Drives FrameAnimator the way the render loop does: one delta per frame,
//! one publication per frame, and checks what the shader would have seen.

use lavalamp_core::{FrameAnimator, FrameClock, UniformTarget};

/// Stands in for the GPU uniform buffer
#[derive(Default)]
struct UniformBuffer {
    time: f32,
    writes: usize,
}

impl UniformTarget for UniformBuffer {
    fn publish_time(&mut self, time: f32) {
        self.time = time;
        self.writes += 1;
    }
}

fn run(deltas: &[f32]) -> (FrameAnimator, UniformBuffer) {
    let mut animator = FrameAnimator::new();
    let mut buffer = UniformBuffer::default();
    for &dt in deltas {
        animator.on_frame(dt, &mut buffer);
    }
    (animator, buffer)
}

#[test]
fn test_accumulated_time_is_sum_of_deltas() {
    // Dyadic fractions are exact in f32, so the sum is exact too
    let deltas = [0.015625, 0.03125, 0.0, 0.5, 0.0078125, 0.25, 0.125];
    let (animator, buffer) = run(&deltas);

    let expected: f32 = deltas.iter().sum();
    assert_eq!(animator.time(), expected);
    assert_eq!(buffer.time, expected);
    assert_eq!(buffer.writes, deltas.len());
}

#[test]
fn test_sixty_hz_for_a_minute() {
    let deltas = vec![1.0 / 60.0; 3600];
    let (animator, buffer) = run(&deltas);

    let expected: f32 = deltas.iter().sum();
    assert_eq!(animator.time(), expected);
    assert!((buffer.time - 60.0).abs() < 1e-2);
    assert_eq!(animator.frame_count(), 3600);
}

#[test]
fn test_uneven_frame_pacing() {
    // Deterministic pseudo-random pacing between 0 and ~50 ms
    let mut seed: u32 = 0x2545_f491;
    let deltas: Vec<f32> = (0..500)
        .map(|_| {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (seed >> 8) as f32 / (1u32 << 24) as f32 * 0.05
        })
        .collect();
    let (animator, _) = run(&deltas);

    let expected: f32 = deltas.iter().sum();
    assert_eq!(animator.time(), expected);
}

#[test]
fn test_published_value_is_monotonic() {
    let mut animator = FrameAnimator::new();
    let mut buffer = UniformBuffer::default();
    let mut previous = 0.0;
    for dt in [0.016, 0.0, 0.033, -1.0, 0.02] {
        animator.on_frame(dt, &mut buffer);
        assert!(buffer.time >= previous);
        previous = buffer.time;
    }
}

#[test]
fn test_zero_deltas_keep_uniform_constant() {
    let (animator, buffer) = run(&[0.0; 240]);
    assert_eq!(animator.time(), 0.0);
    assert_eq!(buffer.time, 0.0);
    assert_eq!(buffer.writes, 240);
}

#[test]
fn test_clock_feeds_animator() {
    let mut clock = FrameClock::with_max_delta(0.25);
    let mut animator = FrameAnimator::new();
    let mut buffer = UniformBuffer::default();

    let mut total = 0.0;
    for _ in 0..3 {
        std::thread::sleep(std::time::Duration::from_millis(5));
        let dt = clock.tick();
        total += dt;
        animator.on_frame(dt, &mut buffer);
    }

    assert_eq!(buffer.time, total);
    assert!(buffer.time >= 0.015);
}
