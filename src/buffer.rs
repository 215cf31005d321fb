//! Fixed-length mono sample buffers.

/// An immutable run of mono f32 amplitude samples at a fixed sample rate.
///
/// Buffers are synthesized once, handed to exactly one
/// [`LoopingSource`](crate::nodes::LoopingSource), and dropped when that node
/// is torn down. The sample rate is recorded at construction and always
/// matches the graph the buffer plays in.
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Wrap pre-generated samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration of the buffer in seconds.
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}
