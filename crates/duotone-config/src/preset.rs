//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use duotone_synth::{OscillatorParams, Waveform};

/// Flat per-oscillator parameter record as stored on disk.
///
/// The waveform is stored as its numeric tag (0 = sine, 1 = square,
/// 2 = sawtooth, 3 = triangle); times are seconds, levels are fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatorPreset {
    /// Tone frequency in Hz.
    pub frequency: f64,
    /// Master amplitude in [0, 1].
    pub amplitude: f64,
    /// Numeric waveform tag, 0..=3.
    pub waveform: u8,
    /// Envelope attack time in seconds.
    pub attack: f64,
    /// Envelope decay time in seconds.
    pub decay: f64,
    /// Envelope sustain level in [0, 1].
    pub sustain: f64,
    /// Envelope release time in seconds.
    pub release: f64,
}

impl From<OscillatorParams> for OscillatorPreset {
    fn from(params: OscillatorParams) -> Self {
        Self {
            frequency: params.frequency,
            amplitude: params.amplitude,
            waveform: params.waveform.index(),
            attack: params.attack_time,
            decay: params.decay_time,
            sustain: params.sustain_level,
            release: params.release_time,
        }
    }
}

impl TryFrom<OscillatorPreset> for OscillatorParams {
    type Error = ConfigError;

    fn try_from(preset: OscillatorPreset) -> Result<Self, ConfigError> {
        let waveform = Waveform::from_index(preset.waveform)
            .ok_or(ConfigError::UnknownWaveform(preset.waveform))?;
        Ok(Self {
            frequency: preset.frequency,
            amplitude: preset.amplitude,
            waveform,
            attack_time: preset.attack,
            decay_time: preset.decay,
            sustain_level: preset.sustain,
            release_time: preset.release,
        })
    }
}

/// Preset file for the full synthesizer: both oscillators' parameters.
///
/// Presets are stored as TOML files and can be loaded from disk, created
/// programmatically, and saved back.
///
/// # TOML Format
///
/// ```toml
/// name = "Default"
///
/// [wave1]
/// frequency = 440.0
/// amplitude = 0.5
/// waveform = 0
/// attack = 0.01
/// decay = 0.1
/// sustain = 0.7
/// release = 0.3
///
/// [wave2]
/// frequency = 660.0
/// amplitude = 0.3
/// waveform = 1
/// attack = 0.05
/// decay = 0.2
/// sustain = 0.5
/// release = 0.5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,
    /// First oscillator's parameters.
    pub wave1: OscillatorPreset,
    /// Second oscillator's parameters.
    pub wave2: OscillatorPreset,
}

impl Preset {
    /// Create a preset with the startup parameters and the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wave1: OscillatorParams::wave1().into(),
            wave2: OscillatorParams::wave2().into(),
        }
    }

    /// Build a preset from live oscillator parameters.
    pub fn from_params(
        name: impl Into<String>,
        wave1: OscillatorParams,
        wave2: OscillatorParams,
    ) -> Self {
        Self {
            name: name.into(),
            wave1: wave1.into(),
            wave2: wave2.into(),
        }
    }

    /// Resolve both records into live oscillator parameters.
    ///
    /// Fails with [`ConfigError::UnknownWaveform`] when either record
    /// carries a waveform tag outside 0..=3.
    pub fn params(&self) -> Result<(OscillatorParams, OscillatorParams), ConfigError> {
        Ok((self.wave1.try_into()?, self.wave2.try_into()?))
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset: Preset = toml::from_str(&content)?;
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Default")
    }
}
