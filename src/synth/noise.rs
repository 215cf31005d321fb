//! Colored noise generation.
//!
//! The pink and brown recipes are the widely circulated time-domain
//! approximations (Kellett's filtered white noise and a leaky integrator).
//! Their coefficients are kept verbatim: the audible character of the result
//! is the acceptance criterion, not spectral purity.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::buffer::SampleBuffer;

/// Spectral shaping algorithm for a noise buffer.
///
/// Names follow the usual color convention: power density flat (white),
/// ~1/f (pink), ~1/f² (brown).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NoiseKind {
    White,
    Pink,
    Brown,
}

impl NoiseKind {
    /// Generate `seconds * sample_rate` samples of this noise color.
    ///
    /// Each sample lies in [-1, 1]. Statistically deterministic only; use
    /// [`generate_with`](Self::generate_with) with a seeded rng for
    /// reproducible buffers.
    pub fn generate(self, seconds: f32, sample_rate: u32) -> SampleBuffer {
        self.generate_with(seconds, sample_rate, &mut SmallRng::from_entropy())
    }

    /// Generate with a caller-provided random source.
    pub fn generate_with<R: Rng>(self, seconds: f32, sample_rate: u32, rng: &mut R) -> SampleBuffer {
        let len = (seconds * sample_rate as f32) as usize;
        let mut samples = vec![0.0f32; len];
        self.fill(rng, &mut samples);
        SampleBuffer::new(samples, sample_rate)
    }

    /// Fill `out` with this noise color.
    pub fn fill<R: Rng>(self, rng: &mut R, out: &mut [f32]) {
        match self {
            NoiseKind::White => {
                for sample in out.iter_mut() {
                    *sample = rng.gen_range(-1.0..1.0);
                }
            }
            NoiseKind::Pink => {
                let mut pink = Pink::default();
                for sample in out.iter_mut() {
                    *sample = pink.next(rng.gen_range(-1.0..1.0));
                }
            }
            NoiseKind::Brown => {
                let mut brown = Brown::default();
                for sample in out.iter_mut() {
                    *sample = brown.next(rng.gen_range(-1.0..1.0));
                }
            }
        }
    }
}

/// Kellett's 7-state pink noise filter. Roughly 1/f down to ~10 Hz.
#[derive(Default)]
struct Pink {
    b0: f32,
    b1: f32,
    b2: f32,
    b3: f32,
    b4: f32,
    b5: f32,
    b6: f32,
}

impl Pink {
    #[inline]
    fn next(&mut self, white: f32) -> f32 {
        self.b0 = 0.99886 * self.b0 + white * 0.0555179;
        self.b1 = 0.99332 * self.b1 + white * 0.0750759;
        self.b2 = 0.96900 * self.b2 + white * 0.1538520;
        self.b3 = 0.86650 * self.b3 + white * 0.3104856;
        self.b4 = 0.55000 * self.b4 + white * 0.5329522;
        self.b5 = -0.7616 * self.b5 - white * 0.0168980;
        let out =
            (self.b0 + self.b1 + self.b2 + self.b3 + self.b4 + self.b5 + self.b6 + white * 0.5362)
                * 0.11;
        self.b6 = white * 0.115926;
        out.clamp(-1.0, 1.0)
    }
}

/// Leaky integrator of white noise, ~1/f². The 1/1.02 leak bounds the random
/// walk; the integrator state is kept pre-scaling so it can never exceed unity.
#[derive(Default)]
struct Brown {
    last: f32,
}

impl Brown {
    #[inline]
    fn next(&mut self, white: f32) -> f32 {
        self.last = (self.last + 0.02 * white) / 1.02;
        (self.last * 3.5).clamp(-1.0, 1.0)
    }
}
