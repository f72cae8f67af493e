//! Duotone Synth - Real-time synthesis core for the duotone synthesizer
//!
//! This crate implements the dual-oscillator voice model: waveform
//! generation, linear ADSR envelopes, the mutex-guarded state shared between
//! the control and audio threads, and the per-buffer render loop the audio
//! callback drives.
//!
//! # Core Components
//!
//! ## Waveforms
//!
//! Phase-driven waveform evaluation:
//!
//! - [`Waveform`] - Shape selection (Sine, Square, Sawtooth, Triangle)
//!
//! ```rust
//! use duotone_synth::Waveform;
//!
//! let crest = Waveform::Sine.sample(core::f64::consts::FRAC_PI_2);
//! assert!((crest - 1.0).abs() < 1e-12);
//! assert_eq!(Waveform::Square.sample(0.0), 1.0);
//! ```
//!
//! ## Envelopes
//!
//! Stateless linear ADSR arithmetic over explicit stage and timing values:
//!
//! - [`EnvelopeParams`] - Attack, decay, sustain, release, and amplitude
//! - [`EnvelopeStage`] - The five-stage state machine
//! - [`EnvelopeStep`] - One advanced sample of envelope output
//!
//! ```rust
//! use duotone_synth::{EnvelopeParams, EnvelopeStage, envelope};
//!
//! let params = EnvelopeParams {
//!     attack_time: 0.01,
//!     decay_time: 0.1,
//!     sustain_level: 0.7,
//!     release_time: 0.3,
//!     amplitude: 1.0,
//! };
//!
//! // Halfway through the attack ramp
//! let step = envelope::advance(&params, EnvelopeStage::Attack, 0.005, true, 0.0);
//! assert_eq!(step.stage, EnvelopeStage::Attack);
//! assert_eq!(step.level, 0.5);
//! ```
//!
//! ## Oscillators
//!
//! One complete voice: parameters, phase and envelope state, note events:
//!
//! - [`Oscillator`] - Parameters plus mutable state, advanced per sample
//! - [`OscillatorParams`] - Frequency, amplitude, waveform, envelope settings
//! - [`OscillatorState`] - Phase, stage, timing, and the release anchor
//!
//! ```rust
//! use duotone_synth::{Oscillator, OscillatorParams};
//!
//! let mut osc = Oscillator::new(OscillatorParams::wave1());
//! osc.note_on();
//!
//! let dt = 1.0 / 44100.0;
//! let sample = osc.advance(44100.0, dt);
//! assert!(sample.abs() <= 1.0);
//! ```
//!
//! ## Shared State
//!
//! What the two threads exchange, and the lock that guards it:
//!
//! - [`SynthState`] - Both oscillators and the sample rate, plain data
//! - [`SynthHandle`] - Cloneable handle owning the locking discipline
//! - [`OscillatorId`] - Selects which oscillator an edit targets
//!
//! ## Rendering
//!
//! The per-buffer loop:
//!
//! - [`render_frames`] - Lock-free core over an exclusive [`SynthState`]
//! - [`render_buffer`] - Snapshot, render, write back through a [`SynthHandle`]
//! - [`RenderStatus`] - Tells the backend to continue or abort
//!
//! # no_std Support
//!
//! The synthesis math ([`Waveform`], the envelope functions, [`Oscillator`],
//! [`render_frames`]) is `no_std` compatible. Disable the default `std`
//! feature:
//!
//! ```toml
//! [dependencies]
//! duotone-synth = { version = "0.1", default-features = false }
//! ```
//!
//! [`SynthHandle`] and [`render_buffer`] need `std` for the mutex.
//!
//! # Example: Rendering a Note
//!
//! ```rust
//! use duotone_synth::{OscillatorId, RenderStatus, SynthHandle, SynthState, render_buffer};
//!
//! let handle = SynthHandle::new(SynthState::default());
//! handle.set_frequency(OscillatorId::Wave1, 261.63); // C4
//! handle.note_on(OscillatorId::Wave1);
//!
//! // The audio callback renders one buffer at a time
//! let mut buffer = vec![0.0f32; 1024];
//! let status = render_buffer(&handle, &mut buffer);
//!
//! assert_eq!(status, RenderStatus::Continue);
//! assert!(buffer.iter().any(|s| *s != 0.0));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod envelope;
pub mod oscillator;
pub mod render;
pub mod state;
pub mod waveform;

// Re-export main types at crate root
pub use envelope::{EnvelopeParams, EnvelopeStage, EnvelopeStep, LEVEL_EPSILON};
pub use oscillator::{Oscillator, OscillatorParams, OscillatorState};
pub use render::{RenderStatus, render_frames};
pub use state::{DEFAULT_SAMPLE_RATE, OscillatorId, SynthState};
pub use waveform::Waveform;

#[cfg(feature = "std")]
pub use render::render_buffer;
#[cfg(feature = "std")]
pub use state::{StatePoisoned, SynthHandle};
