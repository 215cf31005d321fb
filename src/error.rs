//! Engine error types.

use thiserror::Error;

/// Failure to acquire the audio output device.
///
/// Raised by the one-time device acquisition on the first
/// [`toggle`](crate::SoundscapeEngine::toggle). The engine stays
/// `Uninitialized`; retrying is up to the caller (typically on the next user
/// gesture, e.g. a "tap to enable sound" affordance).
#[derive(Debug, Error)]
pub enum InitError {
    /// No output device is available, or the platform refuses to hand one
    /// out without a prior user gesture.
    #[error("no audio output device available")]
    NoOutputDevice,

    /// The device exists but rejected its own default stream configuration.
    #[error("output device rejected its stream config: {0}")]
    UnsupportedConfig(String),

    /// Building or starting the output stream failed.
    #[error("failed to start output stream: {0}")]
    Stream(String),
}
