//! One oscillator: control parameters, render state, and note triggering.
//!
//! Parameters belong to the control thread, state to the render thread; the
//! two exceptions are note-on and note-off, which the control thread applies
//! to the state while holding the shared lock.

use crate::envelope::{self, EnvelopeParams, EnvelopeStage, LEVEL_EPSILON};
use crate::waveform::{Waveform, advance_phase};

/// Control-thread owned settings for one oscillator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OscillatorParams {
    /// Tone frequency in Hz. Expected positive.
    pub frequency: f64,
    /// Master amplitude in [0, 1]; scales the whole envelope.
    pub amplitude: f64,
    /// Selected waveform shape.
    pub waveform: Waveform,
    /// Envelope attack time in seconds.
    pub attack_time: f64,
    /// Envelope decay time in seconds.
    pub decay_time: f64,
    /// Envelope sustain level as a fraction of the amplitude, [0, 1].
    pub sustain_level: f64,
    /// Envelope release time in seconds.
    pub release_time: f64,
}

impl OscillatorParams {
    /// Startup settings for the first oscillator: A4 sine with a snappy
    /// envelope.
    pub fn wave1() -> Self {
        Self {
            frequency: 440.0,
            amplitude: 0.5,
            waveform: Waveform::Sine,
            attack_time: 0.01,
            decay_time: 0.1,
            sustain_level: 0.7,
            release_time: 0.3,
        }
    }

    /// Startup settings for the second oscillator: a quieter square a fifth
    /// above the first, with a slower envelope.
    pub fn wave2() -> Self {
        Self {
            frequency: 660.0,
            amplitude: 0.3,
            waveform: Waveform::Square,
            attack_time: 0.05,
            decay_time: 0.2,
            sustain_level: 0.5,
            release_time: 0.5,
        }
    }

    /// The envelope's view of these parameters.
    #[inline]
    pub fn envelope(&self) -> EnvelopeParams {
        EnvelopeParams {
            attack_time: self.attack_time,
            decay_time: self.decay_time,
            sustain_level: self.sustain_level,
            release_time: self.release_time,
            amplitude: self.amplitude,
        }
    }
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self::wave1()
    }
}

/// Render-thread owned state for one oscillator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OscillatorState {
    /// Waveform phase in radians, kept in [0, 2π).
    pub phase: f64,
    /// Current envelope stage.
    pub stage: EnvelopeStage,
    /// Seconds spent in the current stage; zeroed on every transition.
    pub time_in_stage: f64,
    /// True from note-on until the release ramp completes.
    pub note_active: bool,
    /// Envelope level captured at note-off; anchors the release ramp.
    /// Written only by the control thread.
    pub last_env_value: f64,
}

/// A single tone generator: parameters plus mutable render state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillator {
    /// Control-thread owned settings.
    pub params: OscillatorParams,
    /// Render-thread owned state.
    pub state: OscillatorState,
}

impl Oscillator {
    /// Create an idle oscillator with the given parameters.
    pub fn new(params: OscillatorParams) -> Self {
        Self {
            params,
            state: OscillatorState::default(),
        }
    }

    /// Start a note from silence.
    ///
    /// Only honored in [`EnvelopeStage::Idle`]; re-triggering a sounding
    /// note is ignored so a stuck control surface cannot restart the attack
    /// mid-ramp.
    pub fn note_on(&mut self) {
        if self.state.stage != EnvelopeStage::Idle {
            return;
        }
        self.state.note_active = true;
        self.state.stage = EnvelopeStage::Attack;
        self.state.time_in_stage = 0.0;
        self.state.phase = 0.0;
        self.state.last_env_value = 0.0;
    }

    /// Begin the release ramp from the envelope's instantaneous level.
    ///
    /// Valid from Attack, Decay, and Sustain; a no-op when Idle or already
    /// releasing. The captured level anchors the ramp regardless of how far
    /// the attack or decay had progressed.
    pub fn note_off(&mut self) {
        match self.state.stage {
            EnvelopeStage::Attack | EnvelopeStage::Decay | EnvelopeStage::Sustain => {
                self.state.last_env_value = envelope::level_at(
                    &self.params.envelope(),
                    self.state.stage,
                    self.state.time_in_stage,
                    self.state.last_env_value,
                );
                self.state.stage = EnvelopeStage::Release;
                self.state.time_in_stage = 0.0;
            }
            EnvelopeStage::Idle | EnvelopeStage::Release => {}
        }
    }

    /// Drop the envelope back to Idle with cleared timing and release anchor.
    pub fn reset_envelope(&mut self) {
        self.state.stage = EnvelopeStage::Idle;
        self.state.time_in_stage = 0.0;
        self.state.last_env_value = 0.0;
        self.state.note_active = false;
    }

    /// Advance by one sample: step the envelope, then synthesize and move the
    /// phase when audible.
    ///
    /// `dt` is `1.0 / sample_rate`, hoisted by the render loop. While the
    /// envelope is silent the phase is left untouched, so a new note always
    /// starts from a clean cycle.
    #[inline]
    pub fn advance(&mut self, sample_rate: f64, dt: f64) -> f64 {
        self.state.time_in_stage += dt;
        let step = envelope::advance(
            &self.params.envelope(),
            self.state.stage,
            self.state.time_in_stage,
            self.state.note_active,
            self.state.last_env_value,
        );
        self.state.stage = step.stage;
        self.state.time_in_stage = step.time_in_stage;
        self.state.note_active = step.note_active;

        if step.level > LEVEL_EPSILON {
            let sample = self.params.waveform.sample(self.state.phase) * step.level;
            self.state.phase = advance_phase(self.state.phase, self.params.frequency, sample_rate);
            sample
        } else {
            0.0
        }
    }
}
