//! Engine state machine and playback behavior, rendered offline.

use std::time::Duration;

use rauschen::nodes::RingSink;
use rauschen::{
    EngineState, InitError, SoundProfile, SoundscapeEngine, FADE_IN_SECS, MASTER_LEVEL,
};
use rtrb::RingBuffer;

const SAMPLE_RATE: u32 = 44_100;

fn offline_engine() -> (SoundscapeEngine, rtrb::Consumer<f32>) {
    let (producer, consumer) = RingBuffer::new(1 << 21);
    let engine = SoundscapeEngine::with_output(SAMPLE_RATE, RingSink::new(producer));
    (engine, consumer)
}

fn drain(consumer: &mut rtrb::Consumer<f32>) -> Vec<f32> {
    std::iter::from_fn(|| consumer.pop().ok()).collect()
}

#[test]
fn lazy_engine_starts_uninitialized() {
    let engine = SoundscapeEngine::new();
    assert_eq!(engine.state(), EngineState::Uninitialized);
    assert_eq!(engine.current_profile(), None);
    assert_eq!(engine.node_count(), 0);
    assert_eq!(engine.sample_rate(), None);
}

#[test]
fn offline_engine_starts_idle() {
    let (engine, _consumer) = offline_engine();
    assert_eq!(engine.state(), EngineState::Idle);
    assert_eq!(engine.sample_rate(), Some(SAMPLE_RATE));
    // just the sink
    assert_eq!(engine.node_count(), 1);
}

#[test]
fn toggle_twice_returns_to_idle_and_frees_every_node() {
    let (mut engine, _consumer) = offline_engine();

    let state = engine.toggle(SoundProfile::Rain).unwrap();
    assert_eq!(state, EngineState::Playing(SoundProfile::Rain));
    assert_eq!(engine.current_profile(), Some(SoundProfile::Rain));
    assert!(engine.node_count() > 1);

    let state = engine.toggle(SoundProfile::Rain).unwrap();
    assert_eq!(state, EngineState::Idle);
    assert_eq!(engine.current_profile(), None);
    assert_eq!(engine.node_count(), 1);
}

#[test]
fn switching_profiles_replaces_the_session() {
    let (mut engine, _consumer) = offline_engine();

    engine.toggle(SoundProfile::Rain).unwrap();
    let rain_nodes = engine.node_count();

    let state = engine.toggle(SoundProfile::Fire).unwrap();
    assert_eq!(state, EngineState::Playing(SoundProfile::Fire));
    assert_eq!(engine.current_profile(), Some(SoundProfile::Fire));
    // the rain session is gone, not accumulated under the fire one
    assert_eq!(engine.node_count(), rain_nodes);

    engine.stop();
    assert_eq!(engine.node_count(), 1);
}

#[test]
fn stop_when_idle_is_a_no_op() {
    let (mut engine, _consumer) = offline_engine();
    engine.stop();
    engine.stop();
    assert_eq!(engine.state(), EngineState::Idle);
}

#[test]
fn detached_engine_surfaces_the_device_error_and_stays_retryable() {
    let mut engine = SoundscapeEngine::detached();

    let err = engine.toggle(SoundProfile::Fire).unwrap_err();
    assert!(matches!(err, InitError::NoOutputDevice));
    assert_eq!(engine.state(), EngineState::Uninitialized);
    assert_eq!(engine.current_profile(), None);

    // a retry fails the same way rather than panicking or wedging
    assert!(engine.toggle(SoundProfile::Fire).is_err());
}

#[test]
fn fade_in_ramps_the_mix_bus_to_the_master_level() {
    let (mut engine, _consumer) = offline_engine();

    engine.toggle(SoundProfile::Rain).unwrap();
    // nothing rendered yet, so the bus still sits at zero
    let initial = engine.master_gain().unwrap();
    assert!(initial.abs() < 1e-6);

    // halfway through the fade
    engine.advance(Duration::from_secs_f32(FADE_IN_SECS / 2.0));
    let mid = engine.master_gain().unwrap();
    assert!(
        (0.15..0.25).contains(&mid),
        "mid-fade level {mid} not near {}",
        MASTER_LEVEL / 2.0
    );

    // well past the fade end
    engine.advance(Duration::from_secs_f32(FADE_IN_SECS));
    let settled = engine.master_gain().unwrap();
    assert!(
        (settled - MASTER_LEVEL).abs() < 1e-4,
        "settled level {settled} should be {MASTER_LEVEL}"
    );
}

#[test]
fn playback_produces_audible_bounded_output() {
    let (mut engine, mut consumer) = offline_engine();

    engine.toggle(SoundProfile::Fire).unwrap();
    engine.advance(Duration::from_millis(700));

    let rendered = drain(&mut consumer);
    assert!(!rendered.is_empty());
    assert!(rendered.iter().any(|&s| s != 0.0), "output was silent");
    // layers are trimmed and bus-limited; the sum stays well inside unity
    assert!(rendered.iter().all(|&s| s.abs() <= 1.0));
}

#[test]
fn stopped_engine_renders_silence() {
    let (mut engine, mut consumer) = offline_engine();

    engine.toggle(SoundProfile::Rain).unwrap();
    engine.advance(Duration::from_millis(100));
    engine.stop();
    drain(&mut consumer);

    engine.advance(Duration::from_millis(100));
    let after = drain(&mut consumer);
    // with the session gone the sink has no input, so nothing is pushed
    assert!(after.iter().all(|&s| s == 0.0));
}

#[test]
fn close_releases_the_output() {
    let (mut engine, _consumer) = offline_engine();

    engine.toggle(SoundProfile::Rain).unwrap();
    engine.close();
    assert_eq!(engine.state(), EngineState::Uninitialized);
    assert_eq!(engine.node_count(), 0);
    assert_eq!(engine.master_gain(), None);

    // the caller-supplied sink is gone with the graph; this engine cannot
    // re-acquire an output
    assert!(matches!(
        engine.toggle(SoundProfile::Rain),
        Err(InitError::NoOutputDevice)
    ));
}
