//! Ring buffer sink for offline rendering and tests.

use dasp_graph::{Buffer, Input};
use rtrb::Producer;

use crate::node::{AudioNode, ProcessContext};

/// A sink that pushes the mono mix into an rtrb ring buffer.
///
/// Stands in for [`CpalSink`](super::CpalSink) wherever no audio device is
/// wanted: rendering to a file, inspecting the mix in tests, or feeding the
/// signal to another thread.
pub struct RingSink {
    producer: Producer<f32>,
}

impl RingSink {
    /// Create a sink that writes mono samples to the given producer.
    pub fn new(producer: Producer<f32>) -> Self {
        Self { producer }
    }

    /// Returns how many sample slots are available
    #[inline]
    pub fn available(&self) -> usize {
        self.producer.slots()
    }
}

impl AudioNode for RingSink {
    type Message = (); // No control messages

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        _messages: impl Iterator<Item = ()>,
        inputs: &[Input],
        _outputs: &mut [Buffer],
    ) {
        if inputs.is_empty() {
            return;
        }

        let buffers = inputs[0].buffers();
        if buffers.is_empty() {
            return;
        }

        let channel = &buffers[0];

        // Skip if buffer is full
        if self.producer.slots() < channel.len() {
            return;
        }

        for &sample in channel.iter() {
            let _ = self.producer.push(sample);
        }
    }

    #[inline]
    fn num_inputs(&self) -> usize {
        1
    }

    #[inline]
    fn num_outputs(&self) -> usize {
        0
    }
}
