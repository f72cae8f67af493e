//! Shared synthesis state: both oscillators and the sample rate behind one
//! lock.
//!
//! [`SynthState`] is plain copyable data; [`SynthHandle`] wraps it in an
//! `Arc<Mutex>` and owns the locking discipline. Every accessor holds the
//! lock only long enough to copy or assign fields, which is what keeps the
//! render callback's two critical sections short and bounded.

use crate::oscillator::{Oscillator, OscillatorParams};
use crate::waveform::Waveform;

#[cfg(feature = "std")]
use std::sync::{Arc, Mutex, MutexGuard};

/// Sample rate used when nothing else is configured, in Hz.
pub const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

/// Which of the two oscillators an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OscillatorId {
    /// The first oscillator.
    Wave1,
    /// The second oscillator.
    Wave2,
}

/// Everything the render callback and the control thread share.
///
/// The sample rate is fixed once the state is built; both oscillators render
/// against it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SynthState {
    /// First oscillator ("Wave 1").
    pub osc1: Oscillator,
    /// Second oscillator ("Wave 2").
    pub osc2: Oscillator,
    /// Output sample rate in Hz.
    pub sample_rate: f64,
}

impl SynthState {
    /// Build the state with startup parameters for both oscillators.
    pub fn new(sample_rate: f64) -> Self {
        Self::with_params(
            OscillatorParams::wave1(),
            OscillatorParams::wave2(),
            sample_rate,
        )
    }

    /// Build the state with explicit parameters for both oscillators.
    pub fn with_params(wave1: OscillatorParams, wave2: OscillatorParams, sample_rate: f64) -> Self {
        Self {
            osc1: Oscillator::new(wave1),
            osc2: Oscillator::new(wave2),
            sample_rate,
        }
    }

    /// Shared access to one oscillator.
    pub fn oscillator(&self, id: OscillatorId) -> &Oscillator {
        match id {
            OscillatorId::Wave1 => &self.osc1,
            OscillatorId::Wave2 => &self.osc2,
        }
    }

    /// Exclusive access to one oscillator.
    pub fn oscillator_mut(&mut self, id: OscillatorId) -> &mut Oscillator {
        match id {
            OscillatorId::Wave1 => &mut self.osc1,
            OscillatorId::Wave2 => &mut self.osc2,
        }
    }

    /// Return both envelopes to Idle with cleared timing and release anchors.
    pub fn reset_envelopes(&mut self) {
        self.osc1.reset_envelope();
        self.osc2.reset_envelope();
    }
}

impl Default for SynthState {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

/// The shared state lock was poisoned by a panic on another thread.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatePoisoned;

#[cfg(feature = "std")]
impl core::fmt::Display for StatePoisoned {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("synthesis state lock poisoned")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StatePoisoned {}

/// Cloneable, mutex-guarded handle to the shared [`SynthState`].
///
/// This is the accessor contract both threads go through. Parameter edits
/// and note events that hit a poisoned lock are logged and dropped, so a
/// crashed render thread cannot take the control thread down with it;
/// operations the stream lifecycle depends on return [`StatePoisoned`]
/// instead so the failure propagates.
///
/// # Example
///
/// ```rust
/// use duotone_synth::{OscillatorId, SynthHandle, SynthState};
///
/// let handle = SynthHandle::new(SynthState::default());
/// handle.set_frequency(OscillatorId::Wave1, 523.25);
/// handle.note_on(OscillatorId::Wave1);
///
/// let osc = handle.snapshot(OscillatorId::Wave1).unwrap();
/// assert_eq!(osc.params.frequency, 523.25);
/// assert!(osc.state.note_active);
/// ```
#[cfg(feature = "std")]
#[derive(Clone, Debug)]
pub struct SynthHandle {
    inner: Arc<Mutex<SynthState>>,
}

#[cfg(feature = "std")]
impl SynthHandle {
    /// Wrap a state block in a shareable handle.
    pub fn new(state: SynthState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Acquire the lock directly.
    ///
    /// For callers that need multi-field consistency, like the render
    /// callback's snapshot and write-back sections. Keep the guard scope
    /// tight; no computation, logging, or I/O while it lives.
    pub fn lock(&self) -> Result<MutexGuard<'_, SynthState>, StatePoisoned> {
        self.inner.lock().map_err(|_| StatePoisoned)
    }

    fn edit(&self, op: &'static str, apply: impl FnOnce(&mut SynthState)) {
        match self.inner.lock() {
            Ok(mut state) => apply(&mut state),
            Err(_) => tracing::warn!(op, "edit dropped: synthesis state lock poisoned"),
        }
    }

    /// Trigger a note on one oscillator. Honored only from Idle.
    pub fn note_on(&self, id: OscillatorId) {
        self.edit("note_on", |state| state.oscillator_mut(id).note_on());
    }

    /// Release a note on one oscillator. No-op when Idle or releasing.
    pub fn note_off(&self, id: OscillatorId) {
        self.edit("note_off", |state| state.oscillator_mut(id).note_off());
    }

    /// Set one oscillator's frequency in Hz.
    pub fn set_frequency(&self, id: OscillatorId, hz: f64) {
        self.edit("set_frequency", |state| {
            state.oscillator_mut(id).params.frequency = hz;
        });
    }

    /// Set one oscillator's master amplitude.
    pub fn set_amplitude(&self, id: OscillatorId, amplitude: f64) {
        self.edit("set_amplitude", |state| {
            state.oscillator_mut(id).params.amplitude = amplitude;
        });
    }

    /// Select one oscillator's waveform shape.
    pub fn set_waveform(&self, id: OscillatorId, waveform: Waveform) {
        self.edit("set_waveform", |state| {
            state.oscillator_mut(id).params.waveform = waveform;
        });
    }

    /// Set one oscillator's envelope attack time in seconds.
    pub fn set_attack_time(&self, id: OscillatorId, seconds: f64) {
        self.edit("set_attack_time", |state| {
            state.oscillator_mut(id).params.attack_time = seconds;
        });
    }

    /// Set one oscillator's envelope decay time in seconds.
    pub fn set_decay_time(&self, id: OscillatorId, seconds: f64) {
        self.edit("set_decay_time", |state| {
            state.oscillator_mut(id).params.decay_time = seconds;
        });
    }

    /// Set one oscillator's envelope sustain level.
    pub fn set_sustain_level(&self, id: OscillatorId, level: f64) {
        self.edit("set_sustain_level", |state| {
            state.oscillator_mut(id).params.sustain_level = level;
        });
    }

    /// Set one oscillator's envelope release time in seconds.
    pub fn set_release_time(&self, id: OscillatorId, seconds: f64) {
        self.edit("set_release_time", |state| {
            state.oscillator_mut(id).params.release_time = seconds;
        });
    }

    /// Replace one oscillator's whole parameter block under a single lock
    /// acquisition. Used when applying a preset.
    pub fn set_params(&self, id: OscillatorId, params: OscillatorParams) {
        self.edit("set_params", |state| {
            state.oscillator_mut(id).params = params;
        });
    }

    /// Read the stream sample rate.
    pub fn sample_rate(&self) -> Result<f64, StatePoisoned> {
        Ok(self.lock()?.sample_rate)
    }

    /// Copy out one oscillator's parameters and state for display.
    pub fn snapshot(&self, id: OscillatorId) -> Result<Oscillator, StatePoisoned> {
        Ok(*self.lock()?.oscillator(id))
    }

    /// Return both envelopes to Idle, as stream initialization requires.
    ///
    /// Unlike the fire-and-forget edits, failure here must surface: a
    /// lifecycle that cannot reset the envelopes has to abandon bring-up.
    pub fn reset_envelopes(&self) -> Result<(), StatePoisoned> {
        self.lock()?.reset_envelopes();
        Ok(())
    }
}
