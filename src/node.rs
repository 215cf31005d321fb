//! Core node trait and context types.

use dasp_graph::{Buffer, Input};

/// Information available during audio processing.
///
/// Passed to every [`AudioNode::process`] call. Contains the graph's sample rate
/// and the buffer size (always 64 samples in the current implementation).
#[derive(Clone, Copy, Debug)]
pub struct ProcessContext {
    /// Sample rate of the graph in Hz (e.g., 44100, 48000)
    pub sample_rate: u32,
    /// Number of samples per buffer (currently always 64)
    pub buffer_size: usize,
}

/// Unique identifier for a node within a graph.
///
/// Stable for the node's whole lifetime, including across removal of other
/// nodes. Sessions hold these to tear their nodes down exhaustively.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub(crate) u32);

/// The core trait for audio processing nodes.
///
/// Nodes come in three shapes:
/// - **Sources**: generate audio (0 inputs, 1+ outputs) - looping noise buffers
/// - **Effects**: process audio (1+ inputs, 1+ outputs) - filters, gain stages
/// - **Sinks**: consume audio (1+ inputs, 0 outputs) - device output, ring buffers
///
/// # Message-Based Parameters
///
/// Instead of shared mutable state, nodes receive parameter updates via
/// lock-free message queues, drained at the start of each audio block:
///
/// ```
/// use rauschen::{AudioNode, ProcessContext};
/// use dasp_graph::{Buffer, Input};
///
/// enum TremoloMessage {
///     SetDepth(f32),
/// }
///
/// struct Tremolo {
///     depth: f32,
///     phase: f32,
/// }
///
/// impl AudioNode for Tremolo {
///     type Message = TremoloMessage;
///
///     fn process(
///         &mut self,
///         ctx: &ProcessContext,
///         messages: impl Iterator<Item = TremoloMessage>,
///         inputs: &[Input],
///         outputs: &mut [Buffer],
///     ) {
///         for msg in messages {
///             match msg {
///                 TremoloMessage::SetDepth(d) => self.depth = d.clamp(0.0, 1.0),
///             }
///         }
///
///         let in_buf = &inputs[0].buffers()[0];
///         for (out, &sample) in outputs[0].iter_mut().zip(in_buf.iter()) {
///             let lfo = 1.0 - self.depth * 0.5 * (1.0 + (self.phase * std::f32::consts::TAU).sin());
///             *out = sample * lfo;
///             self.phase = (self.phase + 5.0 / ctx.sample_rate as f32) % 1.0;
///         }
///     }
///
///     fn num_inputs(&self) -> usize { 1 }
/// }
/// ```
///
/// Nodes without runtime parameters use `()` as their message type.
pub trait AudioNode: Send + 'static {
    /// Message type for parameter updates.
    ///
    /// Use a custom enum for nodes with parameters, or `()` for nodes without.
    type Message: Send + 'static;

    /// Process one block of audio.
    ///
    /// Called once per audio block (64 samples). Implementations should:
    /// 1. Drain and handle all pending messages
    /// 2. Read from `inputs` (if any)
    /// 3. Write to `outputs`
    fn process(
        &mut self,
        ctx: &ProcessContext,
        messages: impl Iterator<Item = Self::Message>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    );

    /// Number of audio input channels (0 for sources).
    fn num_inputs(&self) -> usize {
        0
    }

    /// Number of audio output channels.
    fn num_outputs(&self) -> usize {
        1
    }
}
