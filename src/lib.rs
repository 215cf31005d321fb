//! # rauschen
//!
//! Procedural ambient soundscape engine: synthesizes looping noise textures,
//! shapes them through a small audio graph, and plays them on the system
//! output.
//!
//! - [`SoundscapeEngine`] - toggle/stop control over the built-in profiles
//! - [`SoundProfile`] - the available soundscapes (rain, fire)
//! - [`AudioGraph`] / [`AudioNode`] - the underlying block-based graph,
//!   usable on its own for custom signal chains
//! - [`synth`] - the raw noise and crackle generators
//!
//! ```no_run
//! use rauschen::{SoundProfile, SoundscapeEngine};
//!
//! let mut engine = SoundscapeEngine::new();
//! engine.toggle(SoundProfile::Rain)?;
//! // pump the graph from your run loop:
//! engine.advance(std::time::Duration::from_millis(50));
//! # Ok::<(), rauschen::InitError>(())
//! ```

mod buffer;
mod device;
mod engine;
mod error;
mod graph;
mod node;
mod profile;
mod session;

pub mod nodes;
pub mod synth;

pub use buffer::SampleBuffer;
pub use device::OutputDevice;
pub use engine::{EngineState, SoundscapeEngine, FADE_IN_SECS, MASTER_LEVEL};
pub use error::InitError;
pub use graph::{AudioGraph, Handle};
pub use node::{AudioNode, NodeId, ProcessContext};
pub use profile::{SoundProfile, UnknownProfile, CRACKLE_SECONDS, NOISE_SECONDS};
pub use synth::NoiseKind;
