//! Plays each soundscape on the default output device for a few seconds.
//!
//! ```sh
//! cargo run --example ambient_player
//! ```

use std::thread::sleep;
use std::time::Duration;

use rauschen::{InitError, OutputDevice, SoundProfile, SoundscapeEngine};

fn main() -> Result<(), InitError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    for device in OutputDevice::list_outputs() {
        println!(
            "output: {} ({} Hz, {} ch)",
            device.name(),
            device.sample_rate(),
            device.channels()
        );
    }

    let mut engine = SoundscapeEngine::new();

    for profile in SoundProfile::ALL {
        println!("playing {profile} for 5s...");
        engine.toggle(profile)?;

        // Prefill the sink's ring buffer, then pump at roughly real time.
        // The sink drops whole blocks when the ring is full, so a small
        // steady lead is all we want here.
        engine.advance(Duration::from_millis(80));
        for _ in 0..100 {
            engine.advance(Duration::from_millis(50));
            sleep(Duration::from_millis(50));
        }

        engine.stop();
        sleep(Duration::from_millis(200));
    }

    Ok(())
}
