//! Source nodes - generate audio, no audio inputs.

mod looper;

pub use looper::LoopingSource;
