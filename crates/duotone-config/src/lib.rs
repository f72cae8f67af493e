//! Preset persistence for the duotone synthesizer.
//!
//! This crate stores the full parameter set of both oscillators as TOML
//! preset files, and knows the platform-specific directories those files
//! live in. The synthesis core never sees a file format: presets resolve
//! to [`duotone_synth::OscillatorParams`] pairs that a control surface
//! applies under the shared lock.
//!
//! # Example
//!
//! ```rust,no_run
//! use duotone_config::{Preset, preset_path};
//!
//! // Start from the factory defaults, tweak, and save
//! let mut preset = Preset::new("bright-fifth");
//! preset.wave1.frequency = 523.25;
//! preset.save(preset_path("bright-fifth").unwrap()).unwrap();
//!
//! // Load it back and resolve to live parameters
//! let loaded = Preset::load(preset_path("bright-fifth").unwrap()).unwrap();
//! let (wave1, wave2) = loaded.params().unwrap();
//! assert_eq!(wave1.frequency, 523.25);
//! assert_eq!(wave2.frequency, 660.0);
//! ```

mod error;
mod preset;

/// Platform-specific paths for presets and configuration.
pub mod paths;

pub use error::ConfigError;
pub use paths::{
    config_dir, ensure_presets_dir, find_preset, list_presets, preset_path, presets_dir,
};
pub use preset::{OscillatorPreset, Preset};
