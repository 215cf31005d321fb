//! Effect nodes - transform audio from their inputs.

mod filter;
mod gain;

pub use filter::{BiquadFilter, FilterMessage, FilterMode};
pub use gain::{Gain, GainLevel, GainMessage};
