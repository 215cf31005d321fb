//! Looping sample buffer source.

use dasp_graph::{Buffer, Input};

use crate::buffer::SampleBuffer;
use crate::node::{AudioNode, ProcessContext};

/// Plays a [`SampleBuffer`] on loop, forever.
///
/// The node takes exclusive ownership of its buffer; the samples are released
/// when the node is removed from the graph. Soundscape beds are only a couple
/// of seconds long, so the wrap-around is constant and inaudible for noise
/// material.
pub struct LoopingSource {
    buffer: SampleBuffer,
    position: usize,
}

impl LoopingSource {
    /// Create a source that loops the given buffer from the start.
    pub fn new(buffer: SampleBuffer) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Sample rate the buffer was synthesized at.
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.buffer.sample_rate()
    }

    /// Length of one loop in seconds.
    #[inline]
    pub fn loop_secs(&self) -> f64 {
        self.buffer.duration_secs()
    }
}

impl AudioNode for LoopingSource {
    type Message = ();

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        _messages: impl Iterator<Item = ()>,
        _inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        if outputs.is_empty() {
            return;
        }

        let samples = self.buffer.samples();
        if samples.is_empty() {
            for buffer in outputs.iter_mut() {
                buffer.iter_mut().for_each(|s| *s = 0.0);
            }
            return;
        }

        // Fill the first channel, then copy to any remaining ones
        let (first, rest) = outputs.split_first_mut().unwrap();
        for sample in first.iter_mut() {
            *sample = samples[self.position];
            self.position += 1;
            if self.position >= samples.len() {
                self.position = 0;
            }
        }

        for buffer in rest.iter_mut() {
            buffer.copy_from_slice(first);
        }
    }

    #[inline]
    fn num_inputs(&self) -> usize {
        0
    }

    #[inline]
    fn num_outputs(&self) -> usize {
        1
    }
}
