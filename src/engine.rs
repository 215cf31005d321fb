//! Engine - lazy device acquisition and the toggle/stop state machine.

use std::time::Duration;

use tracing::debug;

use crate::device::OutputDevice;
use crate::error::InitError;
use crate::graph::AudioGraph;
use crate::node::{AudioNode, NodeId};
use crate::profile::SoundProfile;
use crate::session::Session;

/// Steady-state mix bus level once a soundscape has faded in.
pub const MASTER_LEVEL: f32 = 0.4;

/// Fade-in duration, in seconds of audio time.
pub const FADE_IN_SECS: f32 = 0.5;

/// Where the engine is in its lifecycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EngineState {
    /// No output acquired yet. The first [`toggle`](SoundscapeEngine::toggle)
    /// attempts acquisition.
    Uninitialized,
    /// Output is up, nothing is playing.
    Idle,
    /// The given profile is playing.
    Playing(SoundProfile),
}

enum Output {
    /// Acquire the system default output device on first use.
    SystemDefault,
    /// Never acquire anything. Used by [`SoundscapeEngine::detached`] and
    /// after [`with_output`](SoundscapeEngine::with_output), where the sink
    /// already exists.
    Detached,
}

struct EngineCore {
    graph: AudioGraph,
    sink: NodeId,
}

/// Procedural ambient soundscape engine.
///
/// One engine drives one output. Profiles are started and stopped with
/// [`toggle`](Self::toggle); at most one plays at a time, and switching
/// profiles tears the old session down before the new one is built.
///
/// Construction never touches the audio device. Acquisition happens on the
/// first `toggle`, so the fallible call sits where the caller can retry it,
/// and an [`InitError`] leaves the engine [`Uninitialized`](EngineState) for
/// exactly that retry.
///
/// The engine spawns no threads of its own and control calls run on the
/// caller's thread. Rendering is pumped explicitly with
/// [`process_block`](Self::process_block) or [`advance`](Self::advance); with
/// a [`CpalSink`](crate::nodes::CpalSink) the pump keeps a ring buffer ahead
/// of the device's own stream thread.
pub struct SoundscapeEngine {
    output: Output,
    core: Option<EngineCore>,
    session: Option<Session>,
}

impl SoundscapeEngine {
    /// An engine that will lazily open the system default output device.
    pub fn new() -> Self {
        Self {
            output: Output::SystemDefault,
            core: None,
            session: None,
        }
    }

    /// An engine with no output device available.
    ///
    /// Every acquisition attempt fails with [`InitError::NoOutputDevice`].
    /// Models headless hosts, and exercises the error path in tests.
    pub fn detached() -> Self {
        Self {
            output: Output::Detached,
            core: None,
            session: None,
        }
    }

    /// An engine rendering into a caller-supplied sink instead of a device.
    ///
    /// Starts [`Idle`](EngineState): there is nothing left to acquire, so
    /// `toggle` cannot fail. Pair with
    /// [`RingSink`](crate::nodes::RingSink) for offline rendering.
    pub fn with_output<S: AudioNode>(sample_rate: u32, sink: S) -> Self {
        let mut graph = AudioGraph::new(sample_rate);
        let handle = graph.add(sink);
        graph.set_terminal(handle.id());
        Self {
            output: Output::Detached,
            core: Some(EngineCore {
                graph,
                sink: handle.id(),
            }),
            session: None,
        }
    }

    pub fn state(&self) -> EngineState {
        match (&self.core, &self.session) {
            (None, _) => EngineState::Uninitialized,
            (Some(_), None) => EngineState::Idle,
            (Some(_), Some(session)) => EngineState::Playing(session.profile()),
        }
    }

    /// The profile currently playing, if any.
    pub fn current_profile(&self) -> Option<SoundProfile> {
        self.session.as_ref().map(Session::profile)
    }

    /// Mix bus level as of the last rendered block. `None` when nothing is
    /// playing. Rises from 0.0 toward [`MASTER_LEVEL`] during the fade-in.
    pub fn master_gain(&self) -> Option<f32> {
        self.session.as_ref().map(Session::master_level)
    }

    /// Output sample rate, once an output exists.
    pub fn sample_rate(&self) -> Option<u32> {
        self.core.as_ref().map(|core| core.graph.sample_rate())
    }

    /// Nodes alive in the graph, the sink included. Zero before acquisition.
    pub fn node_count(&self) -> usize {
        self.core
            .as_ref()
            .map(|core| core.graph.node_count())
            .unwrap_or(0)
    }

    /// Start, switch, or stop a soundscape.
    ///
    /// - `profile` already playing: stop it. Returns [`EngineState::Idle`].
    /// - otherwise: stop whatever plays, build `profile`, and fade its mix
    ///   bus from 0 to [`MASTER_LEVEL`] over [`FADE_IN_SECS`]. Returns
    ///   [`EngineState::Playing`].
    ///
    /// The first call acquires the output device; on failure the engine stays
    /// [`Uninitialized`](EngineState) and the call can simply be retried.
    pub fn toggle(&mut self, profile: SoundProfile) -> Result<EngineState, InitError> {
        self.ensure_output()?;

        if self.current_profile() == Some(profile) {
            self.stop();
            return Ok(EngineState::Idle);
        }

        self.stop();

        // ensure_output above guarantees the core exists
        let core = self.core.as_mut().unwrap();
        let mut session = Session::build(&mut core.graph, profile, core.sink);
        session.fade_in(MASTER_LEVEL, FADE_IN_SECS);
        debug!(profile = %profile, "soundscape started");
        self.session = Some(session);

        Ok(EngineState::Playing(profile))
    }

    /// Stop playback and tear the session's nodes out of the graph.
    ///
    /// No fade-out; the looped textures end at an arbitrary phase and cutting
    /// them is unobtrusive. Idempotent: a no-op when nothing plays.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let profile = session.profile();
        if let Some(core) = self.core.as_mut() {
            session.teardown(&mut core.graph);
        }
        debug!(profile = %profile, "soundscape stopped");
    }

    /// Stop playback and release the graph and output device.
    ///
    /// The engine returns to [`Uninitialized`](EngineState). An engine built
    /// with [`new`](Self::new) re-acquires on the next `toggle`; one built
    /// with [`with_output`](Self::with_output) has nothing to re-acquire and
    /// stays unusable.
    pub fn close(&mut self) {
        self.stop();
        self.core = None;
    }

    /// Render one 64-sample block into the sink.
    pub fn process_block(&mut self) {
        if let Some(core) = self.core.as_mut() {
            core.graph.process();
        }
    }

    /// Render `duration` worth of audio, block by block.
    ///
    /// Renders as fast as possible; pacing against a real device is the
    /// caller's loop (see `demos/ambient_player.rs`).
    pub fn advance(&mut self, duration: Duration) {
        let Some(core) = self.core.as_mut() else {
            return;
        };
        let samples = duration.as_secs_f64() * core.graph.sample_rate() as f64;
        let blocks = (samples / 64.0).ceil() as usize;
        for _ in 0..blocks {
            core.graph.process();
        }
    }

    fn ensure_output(&mut self) -> Result<(), InitError> {
        if self.core.is_some() {
            return Ok(());
        }
        match self.output {
            Output::Detached => Err(InitError::NoOutputDevice),
            Output::SystemDefault => {
                let device = OutputDevice::default_output()?;
                let sink = device.create_sink()?;
                let mut graph = AudioGraph::new(device.sample_rate());
                let handle = graph.add(sink);
                graph.set_terminal(handle.id());
                self.core = Some(EngineCore {
                    graph,
                    sink: handle.id(),
                });
                Ok(())
            }
        }
    }
}

impl Default for SoundscapeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SoundscapeEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
