//! A live soundscape: the graph nodes of one playing profile.

use tracing::debug;

use crate::graph::{AudioGraph, Handle};
use crate::node::NodeId;
use crate::nodes::effect::{BiquadFilter, FilterMode, Gain, GainLevel, GainMessage};
use crate::nodes::source::LoopingSource;
use crate::profile::{LayerSpec, SoundProfile, Texture, FIRE_LAYERS, RAIN_LAYERS};
use crate::synth::crackle_buffer;

/// The graph nodes of one source-filter-trim chain.
struct LayerNodes {
    source: NodeId,
    filter: NodeId,
    trim: Option<NodeId>,
}

/// The nodes of a session, tagged by profile and named per layer.
///
/// An enum rather than a flat list so teardown is exhaustive by construction:
/// every variant's pattern must bind every layer, and a new layer field is a
/// compile error until teardown names it too.
enum SessionNodes {
    Rain { bed: LayerNodes, sizzle: LayerNodes },
    Fire { rumble: LayerNodes, crackle: LayerNodes },
}

/// Everything a playing profile put into the graph.
///
/// Building a session synthesizes the profile's loop buffers, adds all of its
/// nodes, and wires them through a shared mix bus into the sink - the nodes
/// are live (and audible, once the bus gain comes up) by the time `build`
/// returns. Tearing it down removes every one of those nodes, which frees the
/// loop buffers and leaves the graph holding only the sink again.
pub(crate) struct Session {
    master: Handle<GainMessage>,
    master_level: GainLevel,
    nodes: SessionNodes,
}

impl Session {
    /// Build the profile's layers into `graph`, connected to `sink`.
    ///
    /// The mix bus starts at zero gain; call [`fade_in`](Self::fade_in) to
    /// bring it up.
    pub(crate) fn build(graph: &mut AudioGraph, profile: SoundProfile, sink: NodeId) -> Self {
        let bus = Gain::new(0.0);
        let master_level = bus.level_handle();
        let master = graph.add(bus);
        graph.connect(master.id(), sink);

        let nodes = match profile {
            SoundProfile::Rain => {
                let [bed, sizzle] = RAIN_LAYERS;
                SessionNodes::Rain {
                    bed: build_layer(graph, &bed, master.id()),
                    sizzle: build_layer(graph, &sizzle, master.id()),
                }
            }
            SoundProfile::Fire => {
                let [rumble, crackle] = FIRE_LAYERS;
                SessionNodes::Fire {
                    rumble: build_layer(graph, &rumble, master.id()),
                    crackle: build_layer(graph, &crackle, master.id()),
                }
            }
        };

        Self {
            master,
            master_level,
            nodes,
        }
    }

    pub(crate) fn profile(&self) -> SoundProfile {
        match self.nodes {
            SessionNodes::Rain { .. } => SoundProfile::Rain,
            SessionNodes::Fire { .. } => SoundProfile::Fire,
        }
    }

    /// Mix bus level as of the last rendered block.
    pub(crate) fn master_level(&self) -> f32 {
        self.master_level.get()
    }

    /// Ramp the mix bus from its current level to `target` over `seconds`
    /// of audio time.
    pub(crate) fn fade_in(&mut self, target: f32, seconds: f32) {
        let _ = self.master.send(GainMessage::Ramp { target, seconds });
    }

    /// Remove every node this session added. Loop buffers and filter state
    /// are dropped with their nodes; the sink stays.
    pub(crate) fn teardown(self, graph: &mut AudioGraph) {
        let profile = self.profile();
        let layers = match &self.nodes {
            SessionNodes::Rain { bed, sizzle } => [bed, sizzle],
            SessionNodes::Fire { rumble, crackle } => [rumble, crackle],
        };
        for layer in layers {
            graph.remove(layer.source);
            graph.remove(layer.filter);
            if let Some(trim) = layer.trim {
                graph.remove(trim);
            }
        }
        graph.remove(self.master.id());
        debug!(profile = %profile, "session torn down");
    }
}

/// Synthesize a layer's loop buffer and wire source → filter → (trim) → bus.
fn build_layer(graph: &mut AudioGraph, spec: &LayerSpec, bus: NodeId) -> LayerNodes {
    let sample_rate = graph.sample_rate();
    let buffer = match spec.texture {
        Texture::Noise(kind) => kind.generate(spec.seconds, sample_rate),
        Texture::Crackle => crackle_buffer(spec.seconds, sample_rate),
    };
    debug!(layer = spec.name, samples = buffer.len(), "synthesized layer buffer");

    let source = graph.add(LoopingSource::new(buffer));
    let filter = graph.add(match spec.filter_mode {
        FilterMode::Lowpass => BiquadFilter::lowpass(spec.cutoff_hz),
        FilterMode::Highpass => BiquadFilter::highpass(spec.cutoff_hz),
    });
    graph.connect(source.id(), filter.id());

    let trim = spec.trim.map(|level| {
        let trim = graph.add(Gain::new(level));
        graph.connect(filter.id(), trim.id());
        trim.id()
    });

    graph.connect(trim.unwrap_or(filter.id()), bus);

    LayerNodes {
        source: source.id(),
        filter: filter.id(),
        trim,
    }
}
