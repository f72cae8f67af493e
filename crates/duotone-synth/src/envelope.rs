//! Linear ADSR envelope state machine.
//!
//! The envelope is expressed as two pure functions over explicit state rather
//! than a self-contained generator object: the stage and timing live in the
//! shared synthesis state, where both the render callback and the control
//! thread's note-off handler need them. [`level_at`] computes the
//! instantaneous multiplier for any stage, and [`advance`] steps the state
//! machine by one sample. Note-off snapshots its release anchor through the
//! same [`level_at`] the render path uses, so the ramp math exists exactly
//! once.

/// Levels at or below this are treated as silence.
///
/// Used both to gate waveform synthesis and to detect that a release ramp
/// has run out before its nominal time.
pub const LEVEL_EPSILON: f64 = 1e-9;

/// Stage of the per-oscillator amplitude envelope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// No note sounding; level is zero.
    #[default]
    Idle,
    /// Level ramps linearly from zero up to the master amplitude.
    Attack,
    /// Level ramps linearly from the master amplitude down to the sustain
    /// level.
    Decay,
    /// Level holds at the sustain level until note-off.
    Sustain,
    /// Level ramps linearly from the captured note-off level down to zero.
    Release,
}

/// Timing parameters plus the master amplitude they scale.
///
/// Extracted from `OscillatorParams` for each envelope evaluation; keeping
/// the envelope free of any oscillator-level types lets it be tested and
/// reasoned about in isolation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeParams {
    /// Attack ramp duration in seconds. Zero or negative means instant.
    pub attack_time: f64,
    /// Decay ramp duration in seconds. Zero or negative means instant.
    pub decay_time: f64,
    /// Sustain level as a fraction of the master amplitude, nominally [0, 1].
    pub sustain_level: f64,
    /// Release ramp duration in seconds. Zero or negative means instant.
    pub release_time: f64,
    /// Master amplitude; the level never leaves [0, amplitude].
    pub amplitude: f64,
}

/// Result of advancing the envelope by one sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeStep {
    /// Stage after the step.
    pub stage: EnvelopeStage,
    /// Time in the (possibly new) stage, seconds. Zeroed on every transition.
    pub time_in_stage: f64,
    /// Amplitude multiplier for this sample, clamped to [0, amplitude].
    pub level: f64,
    /// Cleared when a release ramp completes; otherwise passed through.
    pub note_active: bool,
}

/// Instantaneous envelope level for a stage at a given time, without
/// advancing or transitioning.
///
/// `last_env_value` only matters in [`EnvelopeStage::Release`], where it
/// anchors the top of the ramp. The result is clamped to [0, amplitude].
pub fn level_at(
    params: &EnvelopeParams,
    stage: EnvelopeStage,
    time_in_stage: f64,
    last_env_value: f64,
) -> f64 {
    let level = match stage {
        EnvelopeStage::Idle => 0.0,
        EnvelopeStage::Attack => {
            if params.attack_time <= 0.0 {
                params.amplitude
            } else {
                params.amplitude * (time_in_stage / params.attack_time).min(1.0)
            }
        }
        EnvelopeStage::Decay => {
            let sustain = params.amplitude * params.sustain_level;
            if params.decay_time <= 0.0 || params.sustain_level >= 1.0 {
                sustain
            } else {
                let factor = (time_in_stage / params.decay_time).min(1.0);
                let ramp = params.amplitude * (1.0 - (1.0 - params.sustain_level) * factor);
                // Never undershoot the sustain target mid-decay
                ramp.max(sustain)
            }
        }
        EnvelopeStage::Sustain => params.amplitude * params.sustain_level,
        EnvelopeStage::Release => {
            if params.release_time <= 0.0 || last_env_value <= LEVEL_EPSILON {
                0.0
            } else {
                last_env_value * (1.0 - time_in_stage / params.release_time).max(0.0)
            }
        }
    };
    level.min(params.amplitude).max(0.0)
}

/// Step the envelope by one sample and apply stage transitions.
///
/// `time_in_stage` must already include the current sample period; the
/// caller adds `1.0 / sample_rate` before calling. Transition rules:
///
/// - Attack ends once time reaches `attack_time` (instantly when it is
///   zero), snapping the level to the full amplitude and entering Decay.
/// - Decay ends once time reaches `decay_time` (instantly when it is zero
///   or the sustain level is at or above 1), snapping to the sustain level
///   and entering Sustain.
/// - Release ends once time reaches `release_time` or the ramp has dropped
///   to silence, entering Idle with `note_active` cleared.
/// - Idle and Sustain only change stage through note-on / note-off, which
///   are external to this function.
///
/// Every transition zeroes `time_in_stage`.
pub fn advance(
    params: &EnvelopeParams,
    stage: EnvelopeStage,
    time_in_stage: f64,
    note_active: bool,
    last_env_value: f64,
) -> EnvelopeStep {
    let mut stage = stage;
    let mut time = time_in_stage;
    let mut note_active = note_active;
    let mut level = level_at(params, stage, time, last_env_value);

    match stage {
        EnvelopeStage::Idle | EnvelopeStage::Sustain => {}
        EnvelopeStage::Attack => {
            if params.attack_time <= 0.0 || time >= params.attack_time {
                level = params.amplitude;
                stage = EnvelopeStage::Decay;
                time = 0.0;
            }
        }
        EnvelopeStage::Decay => {
            if params.decay_time <= 0.0 || params.sustain_level >= 1.0 || time >= params.decay_time
            {
                level = params.amplitude * params.sustain_level;
                stage = EnvelopeStage::Sustain;
                time = 0.0;
            }
        }
        EnvelopeStage::Release => {
            if params.release_time <= 0.0 || time >= params.release_time || level <= LEVEL_EPSILON {
                level = 0.0;
                stage = EnvelopeStage::Idle;
                time = 0.0;
                note_active = false;
            }
        }
    }

    EnvelopeStep {
        stage,
        time_in_stage: time,
        level: level.min(params.amplitude).max(0.0),
        note_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> EnvelopeParams {
        EnvelopeParams {
            attack_time: 0.1,
            decay_time: 0.2,
            sustain_level: 0.5,
            release_time: 0.3,
            amplitude: 0.8,
        }
    }

    #[test]
    fn test_idle_holds_zero() {
        let p = params();
        assert_eq!(level_at(&p, EnvelopeStage::Idle, 0.0, 0.0), 0.0);
        let step = advance(&p, EnvelopeStage::Idle, 5.0, false, 0.0);
        assert_eq!(step.stage, EnvelopeStage::Idle);
        assert_eq!(step.level, 0.0);
        assert_eq!(step.time_in_stage, 5.0);
        assert!(!step.note_active);
    }

    #[test]
    fn test_attack_ramps_linearly() {
        let p = params();
        let half = level_at(&p, EnvelopeStage::Attack, 0.05, 0.0);
        assert!(
            (half - 0.4).abs() < 1e-12,
            "Expected half-amplitude at half attack time, got {}",
            half
        );
        let step = advance(&p, EnvelopeStage::Attack, 0.05, true, 0.0);
        assert_eq!(step.stage, EnvelopeStage::Attack);
        assert!((step.level - 0.4).abs() < 1e-12);
        assert!(step.note_active);
    }

    #[test]
    fn test_attack_completes_into_decay() {
        let p = params();
        let step = advance(&p, EnvelopeStage::Attack, 0.1, true, 0.0);
        assert_eq!(step.stage, EnvelopeStage::Decay);
        assert_eq!(step.time_in_stage, 0.0);
        assert!(
            (step.level - 0.8).abs() < 1e-12,
            "Attack should peak at full amplitude, got {}",
            step.level
        );
    }

    #[test]
    fn test_instant_attack_snaps_to_peak() {
        let mut p = params();
        p.attack_time = 0.0;
        let step = advance(&p, EnvelopeStage::Attack, 1.0 / 44100.0, true, 0.0);
        assert_eq!(step.stage, EnvelopeStage::Decay);
        assert_eq!(step.time_in_stage, 0.0);
        assert!((step.level - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_decay_interpolates_toward_sustain() {
        let p = params();
        // Halfway through decay: midway between amplitude and sustain level
        let mid = level_at(&p, EnvelopeStage::Decay, 0.1, 0.0);
        assert!(
            (mid - 0.6).abs() < 1e-12,
            "Expected midpoint of 0.8 -> 0.4 ramp, got {}",
            mid
        );
        let step = advance(&p, EnvelopeStage::Decay, 0.1, true, 0.0);
        assert_eq!(step.stage, EnvelopeStage::Decay);
        assert!((step.level - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_decay_never_undershoots_sustain() {
        let p = params();
        // Numerically past the ramp floor but before the time boundary
        let level = level_at(&p, EnvelopeStage::Decay, 0.2 - 1e-15, 0.0);
        assert!(
            level >= 0.8 * 0.5,
            "Decay level fell below sustain target: {}",
            level
        );
    }

    #[test]
    fn test_decay_reaches_sustain_exactly_at_boundary() {
        let p = params();
        // One representable instant before the boundary: still decaying
        let before = advance(&p, EnvelopeStage::Decay, 0.2 - 1e-9, true, 0.0);
        assert_eq!(before.stage, EnvelopeStage::Decay);
        // At the boundary: transition fires, time resets, level snaps
        let at = advance(&p, EnvelopeStage::Decay, 0.2, true, 0.0);
        assert_eq!(at.stage, EnvelopeStage::Sustain);
        assert_eq!(at.time_in_stage, 0.0);
        assert!((at.level - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_instant_decay_snaps_to_sustain() {
        let mut p = params();
        p.decay_time = 0.0;
        let step = advance(&p, EnvelopeStage::Decay, 1.0 / 44100.0, true, 0.0);
        assert_eq!(step.stage, EnvelopeStage::Sustain);
        assert!((step.level - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_full_sustain_skips_decay() {
        let mut p = params();
        p.sustain_level = 1.0;
        let step = advance(&p, EnvelopeStage::Decay, 1.0 / 44100.0, true, 0.0);
        assert_eq!(step.stage, EnvelopeStage::Sustain);
        assert!(
            (step.level - 0.8).abs() < 1e-12,
            "Sustain at 1.0 should hold full amplitude, got {}",
            step.level
        );
    }

    #[test]
    fn test_sustain_holds_indefinitely() {
        let p = params();
        for time in [0.0, 1.0, 60.0, 3600.0] {
            let step = advance(&p, EnvelopeStage::Sustain, time, true, 0.0);
            assert_eq!(step.stage, EnvelopeStage::Sustain);
            assert!((step.level - 0.4).abs() < 1e-12);
            assert!(step.note_active);
        }
    }

    #[test]
    fn test_release_ramps_from_captured_level() {
        let p = params();
        // Captured level 0.4, a third of the way through the release
        let level = level_at(&p, EnvelopeStage::Release, 0.1, 0.4);
        assert!(
            (level - 0.4 * (2.0 / 3.0)).abs() < 1e-12,
            "Release ramp off, got {}",
            level
        );
        let step = advance(&p, EnvelopeStage::Release, 0.1, true, 0.4);
        assert_eq!(step.stage, EnvelopeStage::Release);
        assert!(step.note_active, "Note stays active until release finishes");
    }

    #[test]
    fn test_release_completes_into_idle() {
        let p = params();
        let step = advance(&p, EnvelopeStage::Release, 0.3, true, 0.4);
        assert_eq!(step.stage, EnvelopeStage::Idle);
        assert_eq!(step.time_in_stage, 0.0);
        assert_eq!(step.level, 0.0);
        assert!(!step.note_active);
    }

    #[test]
    fn test_instant_release_goes_idle() {
        let mut p = params();
        p.release_time = 0.0;
        let step = advance(&p, EnvelopeStage::Release, 1.0 / 44100.0, true, 0.4);
        assert_eq!(step.stage, EnvelopeStage::Idle);
        assert_eq!(step.level, 0.0);
        assert!(!step.note_active);
    }

    #[test]
    fn test_release_from_negligible_level_goes_idle() {
        let p = params();
        let step = advance(&p, EnvelopeStage::Release, 1.0 / 44100.0, true, 1e-12);
        assert_eq!(step.stage, EnvelopeStage::Idle);
        assert_eq!(step.level, 0.0);
        assert!(!step.note_active);
    }

    #[test]
    fn test_level_clamped_to_amplitude() {
        let mut p = params();
        // Out-of-contract sustain level must not push past the amplitude
        p.sustain_level = 1.5;
        let held = level_at(&p, EnvelopeStage::Sustain, 0.0, 0.0);
        assert_eq!(held, 0.8);
        let step = advance(&p, EnvelopeStage::Decay, 1.0 / 44100.0, true, 0.0);
        assert_eq!(step.stage, EnvelopeStage::Sustain);
        assert_eq!(step.level, 0.8);
    }

    #[test]
    fn test_release_clamped_when_amplitude_lowered() {
        let mut p = params();
        // Amplitude edited below the captured release anchor
        p.amplitude = 0.2;
        let level = level_at(&p, EnvelopeStage::Release, 0.0, 0.7);
        assert!(level <= 0.2, "Release exceeded lowered amplitude: {}", level);
    }

    #[test]
    fn test_advance_matches_level_at_within_stage() {
        let p = params();
        let dt = 1.0 / 44100.0;
        let mut time = 0.0;
        for _ in 0..256 {
            time += dt;
            let step = advance(&p, EnvelopeStage::Attack, time, true, 0.0);
            if step.stage != EnvelopeStage::Attack {
                break;
            }
            let direct = level_at(&p, EnvelopeStage::Attack, time, 0.0);
            assert_eq!(
                step.level, direct,
                "advance and level_at disagree at t = {}",
                time
            );
        }
    }
}
