//! Graph-level behavior: wiring, message delivery, node removal.

use std::f32::consts::TAU;

use rauschen::nodes::{BiquadFilter, FilterMessage, Gain, GainMessage, LoopingSource, RingSink};
use rauschen::{AudioGraph, SampleBuffer};
use rtrb::RingBuffer;

const SAMPLE_RATE: u32 = 44_100;
const BLOCK: usize = 64;

fn dc_source(level: f32) -> LoopingSource {
    LoopingSource::new(SampleBuffer::new(vec![level; 256], SAMPLE_RATE))
}

fn drain(consumer: &mut rtrb::Consumer<f32>) -> Vec<f32> {
    std::iter::from_fn(|| consumer.pop().ok()).collect()
}

#[test]
fn gain_scales_and_honors_messages() {
    let (producer, mut consumer) = RingBuffer::new(1 << 16);
    let mut graph = AudioGraph::new(SAMPLE_RATE);

    let source = graph.add(dc_source(1.0));
    let mut gain = graph.add(Gain::new(1.0));
    let sink = graph.add(RingSink::new(producer));
    graph.connect(source.id(), gain.id());
    graph.connect(gain.id(), sink.id());
    graph.set_terminal(sink.id());

    graph.process();
    let out = drain(&mut consumer);
    assert_eq!(out.len(), BLOCK);
    assert!(out.iter().all(|&s| (s - 1.0).abs() < 1e-6));

    gain.send(GainMessage::Set(0.5)).unwrap();
    graph.process();
    let out = drain(&mut consumer);
    assert!(out.iter().all(|&s| (s - 0.5).abs() < 1e-6));
}

#[test]
fn gain_ramp_advances_on_the_audio_clock() {
    let (producer, mut consumer) = RingBuffer::new(1 << 16);
    let mut graph = AudioGraph::new(SAMPLE_RATE);

    let source = graph.add(dc_source(1.0));
    let mut gain = graph.add(Gain::new(0.0));
    let sink = graph.add(RingSink::new(producer));
    graph.connect(source.id(), gain.id());
    graph.connect(gain.id(), sink.id());
    graph.set_terminal(sink.id());

    let level = {
        // one block = 64 samples; ramp over exactly two blocks
        let seconds = (2 * BLOCK) as f32 / SAMPLE_RATE as f32;
        gain.send(GainMessage::Ramp {
            target: 1.0,
            seconds,
        })
        .unwrap();
        graph.process();
        graph.process();
        graph.process();
        drain(&mut consumer)
    };

    assert_eq!(level.len(), 3 * BLOCK);
    // monotone rise through the first two blocks, flat at the target after
    assert!(level[..2 * BLOCK].windows(2).all(|w| w[1] >= w[0]));
    assert!((level[2 * BLOCK - 1] - 1.0).abs() < 1e-4);
    assert!(level[2 * BLOCK..].iter().all(|&s| (s - 1.0).abs() < 1e-6));
}

#[test]
fn gain_sums_multiple_inputs() {
    let (producer, mut consumer) = RingBuffer::new(1 << 16);
    let mut graph = AudioGraph::new(SAMPLE_RATE);

    let a = graph.add(dc_source(0.25));
    let b = graph.add(dc_source(0.5));
    let bus = graph.add(Gain::new(1.0));
    let sink = graph.add(RingSink::new(producer));
    graph.connect(a.id(), bus.id());
    graph.connect(b.id(), bus.id());
    graph.connect(bus.id(), sink.id());
    graph.set_terminal(sink.id());

    graph.process();
    let out = drain(&mut consumer);
    assert!(out.iter().all(|&s| (s - 0.75).abs() < 1e-6));
}

#[test]
fn lowpass_passes_dc_and_highpass_blocks_it() {
    for (filter, expected) in [
        (BiquadFilter::lowpass(600.0), 1.0f32),
        (BiquadFilter::highpass(600.0), 0.0f32),
    ] {
        let (producer, mut consumer) = RingBuffer::new(1 << 16);
        let mut graph = AudioGraph::new(SAMPLE_RATE);

        let source = graph.add(dc_source(1.0));
        let filter = graph.add(filter);
        let sink = graph.add(RingSink::new(producer));
        graph.connect(source.id(), filter.id());
        graph.connect(filter.id(), sink.id());
        graph.set_terminal(sink.id());

        // ~0.2s, long past the filter transient
        for _ in 0..138 {
            graph.process();
        }
        let out = drain(&mut consumer);
        let tail = &out[out.len() - BLOCK..];
        assert!(
            tail.iter().all(|&s| (s - expected).abs() < 0.05),
            "settled output {:?}.. should be near {expected}",
            &tail[..4]
        );
    }
}

#[test]
fn filter_cutoff_messages_take_effect() {
    // 0.1s of a 1 kHz tone; 100 whole cycles, so the loop seam is continuous
    let tone: Vec<f32> = (0..4410)
        .map(|i| (TAU * 1000.0 * i as f32 / SAMPLE_RATE as f32).sin())
        .collect();

    let (producer, mut consumer) = RingBuffer::new(1 << 16);
    let mut graph = AudioGraph::new(SAMPLE_RATE);

    let source = graph.add(LoopingSource::new(SampleBuffer::new(tone, SAMPLE_RATE)));
    let mut filter = graph.add(BiquadFilter::lowpass(600.0));
    let sink = graph.add(RingSink::new(producer));
    graph.connect(source.id(), filter.id());
    graph.connect(filter.id(), sink.id());
    graph.set_terminal(sink.id());

    fn settled_rms(graph: &mut AudioGraph, consumer: &mut rtrb::Consumer<f32>) -> f32 {
        for _ in 0..69 {
            graph.process();
        }
        let out = drain(consumer);
        let tail = &out[out.len() - BLOCK..];
        (tail.iter().map(|&s| s * s).sum::<f32>() / BLOCK as f32).sqrt()
    }

    // 1 kHz sits above a 600 Hz lowpass: attenuated well below the tone's
    // natural rms of ~0.707
    let attenuated = settled_rms(&mut graph, &mut consumer);
    assert!(attenuated < 0.35, "rms {attenuated} not attenuated");

    filter.send(FilterMessage::SetCutoff(8000.0)).unwrap();
    let passed = settled_rms(&mut graph, &mut consumer);
    assert!(passed > 0.6, "rms {passed} should pass nearly unattenuated");
}

#[test]
fn removal_frees_nodes_and_is_idempotent() {
    let (producer, _consumer) = RingBuffer::new(1 << 16);
    let mut graph = AudioGraph::new(SAMPLE_RATE);

    let source = graph.add(dc_source(1.0));
    let sink = graph.add(RingSink::new(producer));
    graph.connect(source.id(), sink.id());
    graph.set_terminal(sink.id());
    assert_eq!(graph.node_count(), 2);

    graph.remove(source.id());
    assert!(!graph.contains(source.id()));
    assert!(graph.contains(sink.id()));
    assert_eq!(graph.node_count(), 1);

    // removing again is a no-op
    graph.remove(source.id());
    assert_eq!(graph.node_count(), 1);

    // graph still processes with the source gone
    graph.process();
}
