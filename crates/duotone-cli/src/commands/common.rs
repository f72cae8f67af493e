//! Shared CLI helpers used across multiple commands.

use duotone_config::{Preset, find_preset};
use duotone_synth::{DEFAULT_SAMPLE_RATE, SynthState};

/// Load a preset by name or file path.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    let Some(path) = find_preset(name) else {
        anyhow::bail!(
            "Preset '{}' not found. Use 'duotone preset list' to see available presets.",
            name
        );
    };
    Ok(Preset::load(&path)?)
}

/// Build the synthesis state from an optional preset name, at the startup
/// sample rate.
pub fn state_for(preset: Option<&str>) -> anyhow::Result<SynthState> {
    match preset {
        None => Ok(SynthState::default()),
        Some(name) => {
            let preset = load_preset(name)?;
            println!("Loaded preset: {}", preset.name);
            let (wave1, wave2) = preset.params()?;
            Ok(SynthState::with_params(wave1, wave2, DEFAULT_SAMPLE_RATE))
        }
    }
}
