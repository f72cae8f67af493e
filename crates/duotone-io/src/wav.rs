//! Offline rendering to WAV files.
//!
//! The render path reuses the exact per-buffer loop the live stream runs,
//! fed from an owned [`SynthState`] instead of the shared lock: trigger both
//! oscillators, render the gate time, release, and render until the longest
//! release tail is over.

use crate::Result;
use duotone_synth::{SynthState, render_frames};
use hound::{SampleFormat, WavWriter};
use std::path::Path;

/// Frames rendered per chunk when producing a file.
const RENDER_CHUNK: usize = 256;

/// Output WAV format. Files are always mono, matching the synth output.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample: 32 writes IEEE float, anything else integer PCM.
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            bits_per_sample: 16,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: 1,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Render one complete note through both oscillators.
///
/// Triggers a note on each oscillator, renders `gate_secs` of audio,
/// releases both notes, and keeps rendering until the longer of the two
/// release times has passed. Both envelopes are back in Idle when this
/// returns, so the buffer always ends in silence.
///
/// # Example
/// ```ignore
/// let samples = render_note(SynthState::default(), 1.0);
/// write_wav("note.wav", &samples, WavSpec::default())?;
/// ```
pub fn render_note(mut state: SynthState, gate_secs: f64) -> Vec<f32> {
    let sample_rate = state.sample_rate;

    state.osc1.note_on();
    state.osc2.note_on();

    let gate_frames = (gate_secs * sample_rate) as usize;
    let mut samples = vec![0.0f32; gate_frames];
    for chunk in samples.chunks_mut(RENDER_CHUNK) {
        render_frames(&mut state, chunk);
    }

    state.osc1.note_off();
    state.osc2.note_off();

    let tail_secs = state
        .osc1
        .params
        .release_time
        .max(state.osc2.params.release_time);
    let tail_frames = (tail_secs * sample_rate).ceil() as usize + RENDER_CHUNK;
    let gate_end = samples.len();
    samples.resize(gate_end + tail_frames, 0.0);
    for chunk in samples[gate_end..].chunks_mut(RENDER_CHUNK) {
        render_frames(&mut state, chunk);
    }

    samples
}

/// Write mono samples to a WAV file.
///
/// 32-bit specs write IEEE float samples as-is; other bit depths quantize
/// to integer PCM with clipping at full scale.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let hound_spec = hound::WavSpec::from(spec);
    let mut writer = WavWriter::create(path, hound_spec)?;

    if spec.bits_per_sample == 32 {
        for &sample in samples {
            writer.write_sample(sample)?;
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        for &sample in samples {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
    }

    writer.finalize()?;
    Ok(())
}
