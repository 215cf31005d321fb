//! Built-in audio nodes, grouped by role in the graph:
//!
//! - [`source`] - nodes that generate audio ([`LoopingSource`])
//! - [`effect`] - nodes that transform audio ([`BiquadFilter`], [`Gain`])
//! - [`sink`] - nodes that consume audio ([`CpalSink`], [`RingSink`])

pub mod effect;
pub mod sink;
pub mod source;

pub use effect::{BiquadFilter, FilterMessage, FilterMode, Gain, GainLevel, GainMessage};
pub use sink::{CpalSink, RingSink};
pub use source::LoopingSource;
