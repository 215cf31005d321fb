//! Sink nodes - consume audio, terminate the graph.

mod cpal_sink;
mod ring;

pub use cpal_sink::CpalSink;
pub use ring::RingSink;
