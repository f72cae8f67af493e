//! Per-buffer render loop.
//!
//! [`render_frames`] is the pure core: it advances both oscillators
//! sample-by-sample through an exclusively borrowed [`SynthState`] and fills
//! a mono f32 buffer. [`render_buffer`] is the thin concurrent wrapper the
//! audio callback uses: snapshot under the lock, render lock-free, write the
//! advanced state back under the lock. Each critical section only copies
//! fields, so its duration is independent of the buffer size.

use crate::state::SynthState;

#[cfg(feature = "std")]
use crate::oscillator::OscillatorState;
#[cfg(feature = "std")]
use crate::state::SynthHandle;

/// What the audio backend should do after a buffer callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStatus {
    /// Buffer filled; keep streaming.
    Continue,
    /// Unrecoverable failure; the stream must stop.
    Abort,
}

/// Fill `buffer` with mono samples, advancing `state` in place.
///
/// For each frame, both oscillators advance independently (envelope step,
/// then waveform sample and phase advance when audible), their outputs are
/// summed, and the sum is hard-clipped to [-1, 1]. Runs without locks,
/// allocation, or I/O, so it can be driven directly with synthetic buffers
/// in tests and offline renders.
///
/// # Example
///
/// ```rust
/// use duotone_synth::{OscillatorId, SynthState, render_frames};
///
/// let mut state = SynthState::default();
/// state.oscillator_mut(OscillatorId::Wave1).note_on();
///
/// let mut buffer = [0.0f32; 256];
/// render_frames(&mut state, &mut buffer);
///
/// assert!(buffer.iter().any(|s| *s != 0.0));
/// ```
pub fn render_frames(state: &mut SynthState, buffer: &mut [f32]) {
    let sample_rate = state.sample_rate;
    let dt = 1.0 / sample_rate;

    for out in buffer.iter_mut() {
        let first = state.osc1.advance(sample_rate, dt);
        let second = state.osc2.advance(sample_rate, dt);
        let mixed = (first + second).min(1.0).max(-1.0);
        *out = mixed as f32;
    }
}

/// Render one callback buffer against the shared state.
///
/// Lock, copy the whole state out, unlock; render; lock again and write back
/// each oscillator's phase, stage, time, and note flag. The release anchor
/// is deliberately not written back, the control thread owns it.
///
/// A poisoned lock before rendering fills the buffer with silence and
/// aborts. A poisoned lock at write-back aborts without touching the shared
/// state; a partial write could leave a stage paired with another stage's
/// timing.
#[cfg(feature = "std")]
pub fn render_buffer(handle: &SynthHandle, buffer: &mut [f32]) -> RenderStatus {
    let mut local = match handle.lock() {
        Ok(state) => *state,
        Err(_) => {
            tracing::error!("render snapshot failed: state lock poisoned, aborting stream");
            buffer.fill(0.0);
            return RenderStatus::Abort;
        }
    };

    render_frames(&mut local, buffer);

    match handle.lock() {
        Ok(mut shared) => {
            write_back(&mut shared.osc1.state, &local.osc1.state);
            write_back(&mut shared.osc2.state, &local.osc2.state);
            RenderStatus::Continue
        }
        Err(_) => {
            tracing::error!("render write-back failed: state lock poisoned, aborting stream");
            RenderStatus::Abort
        }
    }
}

#[cfg(feature = "std")]
fn write_back(shared: &mut OscillatorState, local: &OscillatorState) {
    shared.phase = local.phase;
    shared.time_in_stage = local.time_in_stage;
    shared.stage = local.stage;
    shared.note_active = local.note_active;
    // last_env_value stays: a note-off landing mid-render must keep its anchor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::EnvelopeStage;
    use crate::oscillator::OscillatorParams;
    use crate::state::OscillatorId;
    use crate::waveform::Waveform;

    const SAMPLE_RATE: f64 = 44100.0;
    const BUFFER_SIZE: usize = 256;
    const TOLERANCE: f32 = 0.05;

    /// Single active oscillator against a silent partner, like the original
    /// hardware-verification scenarios: 440 Hz sine, amplitude 0.8, envelope
    /// 0.1 / 0.2 / 0.5 / 0.3.
    fn one_voice_state() -> SynthState {
        let params = OscillatorParams {
            frequency: 440.0,
            amplitude: 0.8,
            waveform: Waveform::Sine,
            attack_time: 0.1,
            decay_time: 0.2,
            sustain_level: 0.5,
            release_time: 0.3,
        };
        // Second oscillator stays Idle and therefore silent
        SynthState::with_params(params, OscillatorParams::wave2(), SAMPLE_RATE)
    }

    fn render(state: &mut SynthState) -> [f32; BUFFER_SIZE] {
        let mut buffer = [0.0f32; BUFFER_SIZE];
        render_frames(state, &mut buffer);
        buffer
    }

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    #[test]
    fn test_idle_renders_silence() {
        let mut state = one_voice_state();
        let buffer = render(&mut state);

        assert!(buffer.iter().all(|s| *s == 0.0));
        assert_eq!(state.osc1.state.stage, EnvelopeStage::Idle);
        assert_eq!(state.osc1.state.phase, 0.0);
    }

    #[test]
    fn test_attack_ramp_grows_within_buffer() {
        let mut state = one_voice_state();
        state.osc1.note_on();
        let buffer = render(&mut state);

        assert_eq!(state.osc1.state.stage, EnvelopeStage::Attack);
        let expected_time = BUFFER_SIZE as f64 / SAMPLE_RATE;
        assert!(
            (state.osc1.state.time_in_stage - expected_time).abs() < 1e-9,
            "Expected {} s in stage, got {}",
            expected_time,
            state.osc1.state.time_in_stage
        );

        // Envelope is still far below peak 256 samples into a 0.1 s attack
        assert!(
            peak(&buffer) < 0.8 * 0.9,
            "Attack peaked too early: {}",
            peak(&buffer)
        );
        // And rising: the second half is louder than the first
        let first = peak(&buffer[..BUFFER_SIZE / 2]);
        let second = peak(&buffer[BUFFER_SIZE / 2..]);
        assert!(
            second > first,
            "Attack should grow across the buffer: {} then {}",
            first,
            second
        );
    }

    #[test]
    fn test_sub_buffer_attack_reaches_decay() {
        let mut state = one_voice_state();
        state.osc1.params.attack_time = 0.001;
        state.osc1.note_on();
        render(&mut state);

        assert_eq!(state.osc1.state.stage, EnvelopeStage::Decay);
    }

    #[test]
    fn test_decay_ramp_falls_toward_sustain() {
        let mut state = one_voice_state();
        state.osc1.params.decay_time = 0.1;
        state.osc1.params.sustain_level = 0.25;
        state.osc1.state.stage = EnvelopeStage::Decay;
        state.osc1.state.note_active = true;
        let buffer = render(&mut state);

        assert_eq!(state.osc1.state.stage, EnvelopeStage::Decay);
        assert!(peak(&buffer) <= 0.8 + TOLERANCE);
        assert!(
            peak(&buffer) > 0.8 * 0.25,
            "Decay should still be above the sustain floor"
        );
        let first = peak(&buffer[..BUFFER_SIZE / 2]);
        let second = peak(&buffer[BUFFER_SIZE / 2..]);
        assert!(
            second < first,
            "Decay should fall across the buffer: {} then {}",
            first,
            second
        );
    }

    #[test]
    fn test_sub_buffer_decay_reaches_sustain() {
        let mut state = one_voice_state();
        state.osc1.params.decay_time = 0.001;
        state.osc1.state.stage = EnvelopeStage::Decay;
        state.osc1.state.note_active = true;
        let buffer = render(&mut state);

        assert_eq!(state.osc1.state.stage, EnvelopeStage::Sustain);
        // Tail of the buffer sits at amplitude x sustain
        let tail_peak = peak(&buffer[BUFFER_SIZE / 2..]);
        assert!(
            (tail_peak - 0.4).abs() < TOLERANCE,
            "Expected sustain plateau near 0.4, got {}",
            tail_peak
        );
    }

    #[test]
    fn test_sustain_holds_level() {
        let mut state = one_voice_state();
        state.osc1.state.stage = EnvelopeStage::Sustain;
        state.osc1.state.note_active = true;
        let buffer = render(&mut state);

        assert_eq!(state.osc1.state.stage, EnvelopeStage::Sustain);
        assert!(
            (peak(&buffer) - 0.4).abs() < TOLERANCE,
            "Expected peak near amplitude x sustain = 0.4, got {}",
            peak(&buffer)
        );
    }

    #[test]
    fn test_release_ramp_decays_from_anchor() {
        let mut state = one_voice_state();
        state.osc1.params.release_time = 0.1;
        state.osc1.state.stage = EnvelopeStage::Release;
        state.osc1.state.note_active = true;
        state.osc1.state.last_env_value = 0.4;
        let buffer = render(&mut state);

        assert_eq!(state.osc1.state.stage, EnvelopeStage::Release);
        assert!(
            state.osc1.state.note_active,
            "Note stays active until release completes"
        );
        assert!(peak(&buffer) <= 0.4 * 1.05);
        let first = peak(&buffer[..BUFFER_SIZE / 2]);
        let second = peak(&buffer[BUFFER_SIZE / 2..]);
        assert!(second < first, "Release should fall across the buffer");
    }

    #[test]
    fn test_sub_buffer_release_reaches_idle() {
        let mut state = one_voice_state();
        state.osc1.params.release_time = 0.001;
        state.osc1.state.stage = EnvelopeStage::Release;
        state.osc1.state.note_active = true;
        state.osc1.state.last_env_value = 0.4;
        let buffer = render(&mut state);

        assert_eq!(state.osc1.state.stage, EnvelopeStage::Idle);
        assert!(!state.osc1.state.note_active);
        assert_eq!(buffer[BUFFER_SIZE - 1], 0.0, "Idle tail must be silent");
    }

    #[test]
    fn test_square_sustain_is_full_scale_with_sign_flips() {
        let mut state = one_voice_state();
        state.osc1.params.waveform = Waveform::Square;
        state.osc1.params.amplitude = 0.6;
        state.osc1.params.sustain_level = 1.0;
        state.osc1.state.stage = EnvelopeStage::Sustain;
        state.osc1.state.note_active = true;
        let buffer = render(&mut state);

        for (i, s) in buffer.iter().enumerate() {
            assert!(
                (s.abs() - 0.6).abs() < 1e-3,
                "Square sample {} should sit at +/-0.6, got {}",
                i,
                s
            );
        }
        let flips = buffer
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count();
        // 256 samples at 440 Hz cover about 2.5 periods
        assert!(flips >= 2, "Expected sign flips across periods, got {}", flips);
    }

    #[test]
    fn test_sawtooth_drops_once_per_period() {
        let mut state = one_voice_state();
        state.osc1.params.waveform = Waveform::Sawtooth;
        state.osc1.params.sustain_level = 1.0;
        state.osc1.state.stage = EnvelopeStage::Sustain;
        state.osc1.state.note_active = true;
        let buffer = render(&mut state);

        let drops = buffer.windows(2).filter(|w| w[1] < w[0] - 0.1).count();
        assert!(
            drops >= 2,
            "Sawtooth should reset at least twice in 2.5 periods, got {}",
            drops
        );
        assert!(peak(&buffer) <= 0.8 * 1.05);
    }

    #[test]
    fn test_triangle_turns_and_stays_bounded() {
        let mut state = one_voice_state();
        state.osc1.params.waveform = Waveform::Triangle;
        state.osc1.params.sustain_level = 1.0;
        state.osc1.state.stage = EnvelopeStage::Sustain;
        state.osc1.state.note_active = true;
        let buffer = render(&mut state);

        let mut direction_changes = 0;
        for w in buffer.windows(3) {
            if (w[1] - w[0]) * (w[2] - w[1]) < 0.0 {
                direction_changes += 1;
            }
        }
        assert!(
            direction_changes >= 4,
            "Triangle should turn at peaks and valleys, got {} turns",
            direction_changes
        );
        assert!(peak(&buffer) <= 0.8 + TOLERANCE);
    }

    #[test]
    fn test_two_sustained_oscillators_mix() {
        // Effective levels 0.4 and 0.3, same frequency and phase, so crests
        // coincide and the mix peaks near 0.7
        let first = OscillatorParams {
            frequency: 440.0,
            amplitude: 0.8,
            waveform: Waveform::Sine,
            sustain_level: 0.5,
            ..OscillatorParams::wave1()
        };
        let second = OscillatorParams {
            frequency: 440.0,
            amplitude: 0.6,
            waveform: Waveform::Sine,
            sustain_level: 0.5,
            ..OscillatorParams::wave1()
        };
        let mut state = SynthState::with_params(first, second, SAMPLE_RATE);
        for id in [OscillatorId::Wave1, OscillatorId::Wave2] {
            state.oscillator_mut(id).state.stage = EnvelopeStage::Sustain;
            state.oscillator_mut(id).state.note_active = true;
        }
        let buffer = render(&mut state);

        let mixed_peak = peak(&buffer);
        assert!(
            (mixed_peak - 0.7).abs() < TOLERANCE,
            "Expected mixed peak near 0.7, got {}",
            mixed_peak
        );
        assert!(
            mixed_peak > 0.4 && mixed_peak > 0.3,
            "Mix should exceed each oscillator alone"
        );
    }

    #[test]
    fn test_hard_clip_saturates_loud_mix() {
        let loud = OscillatorParams {
            frequency: 440.0,
            amplitude: 0.8,
            waveform: Waveform::Square,
            sustain_level: 1.0,
            ..OscillatorParams::wave1()
        };
        let louder = OscillatorParams {
            frequency: 440.0,
            amplitude: 0.7,
            waveform: Waveform::Square,
            sustain_level: 1.0,
            ..OscillatorParams::wave1()
        };
        let mut state = SynthState::with_params(loud, louder, SAMPLE_RATE);
        for id in [OscillatorId::Wave1, OscillatorId::Wave2] {
            state.oscillator_mut(id).state.stage = EnvelopeStage::Sustain;
            state.oscillator_mut(id).state.note_active = true;
        }
        let buffer = render(&mut state);

        assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)));
        // The raw sum is +/-1.5, so the clipper must actually engage
        assert!(buffer.iter().any(|s| *s == 1.0));
        assert!(buffer.iter().any(|s| *s == -1.0));
    }

    #[test]
    fn test_render_buffer_advances_shared_state() {
        let handle = SynthHandle::new(SynthState::default());
        handle.note_on(OscillatorId::Wave1);

        let mut buffer = [0.0f32; BUFFER_SIZE];
        let status = render_buffer(&handle, &mut buffer);

        assert_eq!(status, RenderStatus::Continue);
        let osc = handle.snapshot(OscillatorId::Wave1).unwrap();
        assert_eq!(osc.state.stage, EnvelopeStage::Attack);
        assert!(osc.state.time_in_stage > 0.0);
        assert!(osc.state.phase > 0.0);
        assert_eq!(
            osc.state.last_env_value, 0.0,
            "Render must not touch the release anchor"
        );
        assert!(buffer.iter().any(|s| *s != 0.0));
    }

    #[test]
    fn test_render_buffer_aborts_on_poisoned_lock() {
        let handle = SynthHandle::new(SynthState::default());
        let poisoner = handle.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the synthesis state");
        })
        .join();

        let mut buffer = [0.5f32; BUFFER_SIZE];
        let status = render_buffer(&handle, &mut buffer);

        assert_eq!(status, RenderStatus::Abort);
        assert!(
            buffer.iter().all(|s| *s == 0.0),
            "Aborted render must leave silence, not stale samples"
        );
    }
}
