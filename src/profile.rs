//! Soundscape profiles and their layer recipes.
//!
//! A profile is a static recipe: which textures to synthesize, how long their
//! loop buffers are, and how each layer is filtered and trimmed before it
//! reaches the mix bus. The recipes live here as data; `Session` turns them
//! into live graph nodes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::nodes::effect::FilterMode;
use crate::synth::NoiseKind;

/// Loop length for noise beds. Long enough that the loop is inaudible,
/// short enough to keep resident memory per layer small.
pub const NOISE_SECONDS: f32 = 2.0;

/// Loop length for the crackle layer. Longer than the noise beds so the
/// impulse pattern repeats less obviously.
pub const CRACKLE_SECONDS: f32 = 3.0;

/// An available ambient soundscape.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SoundProfile {
    /// Steady rainfall: a pink noise bed with a faint high sizzle.
    Rain,
    /// Campfire: a brown noise rumble with sparse crackles.
    Fire,
}

/// Error for [`SoundProfile::from_str`].
#[derive(Error, Debug)]
#[error("unknown soundscape profile: {0:?}")]
pub struct UnknownProfile(String);

impl SoundProfile {
    pub const ALL: [SoundProfile; 2] = [SoundProfile::Rain, SoundProfile::Fire];

    pub fn as_str(self) -> &'static str {
        match self {
            SoundProfile::Rain => "rain",
            SoundProfile::Fire => "fire",
        }
    }

    /// The layers this profile mixes, in no particular order.
    pub(crate) fn layers(self) -> &'static [LayerSpec] {
        match self {
            SoundProfile::Rain => &RAIN_LAYERS,
            SoundProfile::Fire => &FIRE_LAYERS,
        }
    }
}

impl fmt::Display for SoundProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundProfile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rain" => Ok(SoundProfile::Rain),
            "fire" => Ok(SoundProfile::Fire),
            other => Err(UnknownProfile(other.to_owned())),
        }
    }
}

/// What a layer loops.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Texture {
    Noise(NoiseKind),
    Crackle,
}

/// One source-filter-trim chain of a profile.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LayerSpec {
    /// Name used in logs.
    pub name: &'static str,
    pub texture: Texture,
    /// Loop buffer length.
    pub seconds: f32,
    pub filter_mode: FilterMode,
    pub cutoff_hz: f32,
    /// Fixed per-layer gain between the filter and the mix bus. `None`
    /// connects the filter to the bus directly.
    pub trim: Option<f32>,
}

pub(crate) static RAIN_LAYERS: [LayerSpec; 2] = [
    // Body of the rainfall
    LayerSpec {
        name: "rain-bed",
        texture: Texture::Noise(NoiseKind::Pink),
        seconds: NOISE_SECONDS,
        filter_mode: FilterMode::Lowpass,
        cutoff_hz: 600.0,
        trim: None,
    },
    // Faint droplet sizzle on top
    LayerSpec {
        name: "rain-sizzle",
        texture: Texture::Noise(NoiseKind::White),
        seconds: NOISE_SECONDS,
        filter_mode: FilterMode::Highpass,
        cutoff_hz: 3000.0,
        trim: Some(0.05),
    },
];

pub(crate) static FIRE_LAYERS: [LayerSpec; 2] = [
    // Low rumble of the fire itself
    LayerSpec {
        name: "fire-rumble",
        texture: Texture::Noise(NoiseKind::Brown),
        seconds: NOISE_SECONDS,
        filter_mode: FilterMode::Lowpass,
        cutoff_hz: 150.0,
        trim: Some(0.8),
    },
    // Wood snaps, highpassed so only the transient bite remains
    LayerSpec {
        name: "fire-crackle",
        texture: Texture::Crackle,
        seconds: CRACKLE_SECONDS,
        filter_mode: FilterMode::Highpass,
        cutoff_hz: 800.0,
        trim: None,
    },
];
