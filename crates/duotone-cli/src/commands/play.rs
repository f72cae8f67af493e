//! Live playback command: the full stream lifecycle with one note per
//! oscillator.

use super::common;
use clap::Args;
use duotone_io::{AudioEngine, CpalBackend};
use duotone_synth::{OscillatorId, SynthHandle};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Args)]
pub struct PlayArgs {
    /// Preset name or path (defaults to the startup parameters)
    #[arg(short, long)]
    preset: Option<String>,

    /// Seconds to hold the notes before release
    #[arg(short, long, default_value = "2.0")]
    duration: f64,
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    let state = common::state_for(args.preset.as_deref())?;
    let handle = SynthHandle::new(state);

    let mut engine = AudioEngine::new(Box::new(CpalBackend::new()), handle.clone());
    engine.initialize()?;
    engine.start()?;

    let release_tail = {
        let osc1 = handle.snapshot(OscillatorId::Wave1)?;
        let osc2 = handle.snapshot(OscillatorId::Wave2)?;
        osc1.params.release_time.max(osc2.params.release_time)
    };

    println!(
        "Playing for {:.1} s (+{:.1} s release)... Press Ctrl+C to stop early.",
        args.duration, release_tail
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        println!("\nStopping...");
        r.store(false, Ordering::SeqCst);
    })?;

    handle.note_on(OscillatorId::Wave1);
    handle.note_on(OscillatorId::Wave2);

    // Hold the gate, watching for Ctrl+C and render failure
    wait_until(
        Instant::now() + Duration::from_secs_f64(args.duration),
        &running,
        &engine,
    );

    handle.note_off(OscillatorId::Wave1);
    handle.note_off(OscillatorId::Wave2);

    // Let the release ramps finish before tearing the stream down
    wait_until(
        Instant::now() + Duration::from_secs_f64(release_tail + 0.1),
        &running,
        &engine,
    );

    let aborted = engine.aborted();
    engine.stop();
    engine.terminate()?;

    if aborted {
        anyhow::bail!("audio stream aborted: synthesis state was unusable");
    }

    println!("Done!");
    Ok(())
}

fn wait_until(deadline: Instant, running: &Arc<AtomicBool>, engine: &AudioEngine) {
    while Instant::now() < deadline && running.load(Ordering::SeqCst) && !engine.aborted() {
        std::thread::sleep(Duration::from_millis(20));
    }
}
