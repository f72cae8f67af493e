//! Offline rendering command: one note from both oscillators to a WAV file.

use super::common;
use clap::Args;
use duotone_io::{WavSpec, render_note, write_wav};
use std::path::PathBuf;

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset name or path (defaults to the startup parameters)
    #[arg(short, long)]
    preset: Option<String>,

    /// Seconds to hold the notes before release
    #[arg(short, long, default_value = "1.0")]
    duration: f64,

    /// Bits per sample: 16 or 24 write integer PCM, 32 writes float
    #[arg(long, default_value = "16")]
    bits: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let state = common::state_for(args.preset.as_deref())?;
    let sample_rate = state.sample_rate;

    let samples = render_note(state, args.duration);

    let spec = WavSpec {
        sample_rate: sample_rate as u32,
        bits_per_sample: args.bits,
    };
    write_wav(&args.output, &samples, spec)?;

    println!(
        "Wrote {} frames ({:.2} s at {} Hz) to {}",
        samples.len(),
        samples.len() as f64 / sample_rate,
        spec.sample_rate,
        args.output.display()
    );
    Ok(())
}
