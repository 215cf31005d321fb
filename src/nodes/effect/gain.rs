//! Summing gain stage with linear ramps.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use dasp_graph::{Buffer, Input};

use crate::node::{AudioNode, ProcessContext};

/// Control messages for [`Gain`].
#[derive(Clone, Copy, Debug)]
pub enum GainMessage {
    /// Jump to the given level immediately, cancelling any ramp.
    Set(f32),
    /// Ramp linearly from the current level to `target` over `seconds`.
    ///
    /// The ramp advances on the audio clock: one step per rendered sample,
    /// regardless of how render blocks are paced.
    Ramp { target: f32, seconds: f32 },
}

/// Read side of a [`Gain`] node's current level.
///
/// Cheap to clone and safe to poll from any thread while the node lives on
/// the render side. Updated once per rendered block.
#[derive(Clone)]
pub struct GainLevel(Arc<AtomicU32>);

impl GainLevel {
    /// Level as of the most recently rendered block.
    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }
}

/// Sums all of its inputs and scales the mix by a (possibly ramping) level.
///
/// Doubles as the mix bus: connect several chains to one `Gain` and they are
/// summed before scaling. No headroom management is applied; keep layer trims
/// conservative instead.
pub struct Gain {
    level: f32,
    target: f32,
    /// Per-sample increment while a ramp is active.
    step: f32,
    remaining: usize,
    shared: Arc<AtomicU32>,
}

impl Gain {
    pub fn new(level: f32) -> Self {
        Self {
            level,
            target: level,
            step: 0.0,
            remaining: 0,
            shared: Arc::new(AtomicU32::new(level.to_bits())),
        }
    }

    /// Handle for observing the level from outside the graph.
    pub fn level_handle(&self) -> GainLevel {
        GainLevel(Arc::clone(&self.shared))
    }

    fn apply(&mut self, message: GainMessage, sample_rate: u32) {
        match message {
            GainMessage::Set(level) => {
                self.level = level;
                self.target = level;
                self.remaining = 0;
            }
            GainMessage::Ramp { target, seconds } => {
                let steps = (seconds * sample_rate as f32) as usize;
                if steps == 0 {
                    self.level = target;
                    self.target = target;
                    self.remaining = 0;
                } else {
                    self.target = target;
                    self.step = (target - self.level) / steps as f32;
                    self.remaining = steps;
                }
            }
        }
    }
}

impl AudioNode for Gain {
    type Message = GainMessage;

    fn process(
        &mut self,
        ctx: &ProcessContext,
        messages: impl Iterator<Item = GainMessage>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        for message in messages {
            self.apply(message, ctx.sample_rate);
        }

        let Some(out) = outputs.first_mut() else {
            return;
        };

        // Sum every input's first channel into the output
        out.silence();
        for input in inputs {
            if let Some(channel) = input.buffers().first() {
                for (sample, &in_sample) in out.iter_mut().zip(channel.iter()) {
                    *sample += in_sample;
                }
            }
        }

        for sample in out.iter_mut() {
            if self.remaining > 0 {
                self.level += self.step;
                self.remaining -= 1;
                if self.remaining == 0 {
                    // Land exactly on the target, whatever rounding did
                    self.level = self.target;
                }
            }
            *sample *= self.level;
        }

        self.shared.store(self.level.to_bits(), Ordering::Relaxed);
    }

    #[inline]
    fn num_inputs(&self) -> usize {
        usize::MAX
    }

    #[inline]
    fn num_outputs(&self) -> usize {
        1
    }
}
