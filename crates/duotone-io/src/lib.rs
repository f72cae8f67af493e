//! Audio I/O layer for the duotone synthesizer.
//!
//! This crate connects the synthesis core to the outside world:
//!
//! - **Device streaming**: [`AudioEngine`] drives the stream lifecycle over a
//!   pluggable [`AudioBackend`] ([`CpalBackend`] for real hardware,
//!   [`MockBackend`] for deterministic tests)
//! - **Offline rendering**: [`render_note`] and [`write_wav`] turn the same
//!   synthesis state into a WAV file without touching an audio device
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use duotone_io::{AudioEngine, CpalBackend};
//! use duotone_synth::{OscillatorId, SynthHandle, SynthState};
//!
//! let handle = SynthHandle::new(SynthState::default());
//! let mut engine = AudioEngine::new(Box::new(CpalBackend::new()), handle.clone());
//!
//! engine.initialize()?;
//! engine.start()?;
//! handle.note_on(OscillatorId::Wave1);
//! // ... play ...
//! engine.stop();
//! engine.terminate()?;
//! ```

pub mod backend;
pub mod cpal_backend;
pub mod engine;
pub mod mock;
pub mod wav;

pub use backend::{
    AudioBackend, AudioDevice, BackendStreamConfig, ErrorCallback, OutputCallback, StreamHandle,
};
pub use cpal_backend::CpalBackend;
pub use engine::AudioEngine;
pub use mock::MockBackend;
pub use wav::{WavSpec, render_note, write_wav};

/// Error types for audio device and file operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Stream construction or runtime error.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// No audio output device is available.
    #[error("no audio output device available")]
    NoDevice,

    /// Backend library initialization or shutdown error.
    #[error("audio backend error: {0}")]
    Backend(String),

    /// The shared synthesis state lock was poisoned.
    #[error("synthesis state lock poisoned")]
    StatePoisoned(#[from] duotone_synth::StatePoisoned),

    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
