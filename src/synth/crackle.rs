//! Sparse impulse generation for the fire crackle layer.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::buffer::SampleBuffer;

/// Per-sample probability of an impulse (~35 snaps per second at 44.1 kHz).
pub const CRACKLE_PROBABILITY: f64 = 0.0008;

/// Peak amplitude of an impulse.
pub const CRACKLE_AMPLITUDE: f32 = 0.9;

/// Generate a mostly-zero buffer with sparse random impulses.
///
/// Approximates wood-snap transients without a physical model: each sample is,
/// with probability [`CRACKLE_PROBABILITY`], uniform in
/// ±[`CRACKLE_AMPLITUDE`], otherwise silent. Looped behind a highpass filter
/// this reads as a crackling fire.
pub fn crackle_buffer(seconds: f32, sample_rate: u32) -> SampleBuffer {
    crackle_buffer_with(seconds, sample_rate, &mut SmallRng::from_entropy())
}

/// Generate with a caller-provided random source.
pub fn crackle_buffer_with<R: Rng>(seconds: f32, sample_rate: u32, rng: &mut R) -> SampleBuffer {
    let len = (seconds * sample_rate as f32) as usize;
    let mut samples = vec![0.0f32; len];
    for sample in samples.iter_mut() {
        if rng.gen_bool(CRACKLE_PROBABILITY) {
            *sample = rng.gen_range(-1.0..1.0) * CRACKLE_AMPLITUDE;
        }
    }
    SampleBuffer::new(samples, sample_rate)
}
