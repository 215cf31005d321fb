//! Procedural texture synthesis.
//!
//! Everything audible in a soundscape starts here: colored noise beds
//! ([`NoiseKind`]) and the sparse crackle layer ([`crackle_buffer`]). All
//! generation is pure computation into a fresh [`SampleBuffer`]; nothing in
//! this module touches the audio device or the graph.

mod crackle;
mod noise;

pub use crackle::{crackle_buffer, crackle_buffer_with, CRACKLE_AMPLITUDE, CRACKLE_PROBABILITY};
pub use noise::NoiseKind;
