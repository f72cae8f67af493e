//! Preset management commands.

use super::common;
use clap::{Args, Subcommand};
use duotone_config::{Preset, ensure_presets_dir, list_presets, preset_path};
use duotone_synth::OscillatorParams;

#[derive(Args)]
pub struct PresetArgs {
    #[command(subcommand)]
    command: PresetCommand,
}

#[derive(Subcommand)]
enum PresetCommand {
    /// Write the startup parameters to a named preset file
    Init {
        /// Preset name
        #[arg(default_value = "default")]
        name: String,

        /// Overwrite if the preset already exists
        #[arg(long)]
        force: bool,
    },

    /// List presets in the user preset directory
    List,

    /// Print a preset's parameters
    Show {
        /// Preset name or path
        name: String,
    },
}

pub fn run(args: PresetArgs) -> anyhow::Result<()> {
    match args.command {
        PresetCommand::Init { name, force } => init_preset(&name, force),
        PresetCommand::List => list(),
        PresetCommand::Show { name } => show(&name),
    }
}

fn init_preset(name: &str, force: bool) -> anyhow::Result<()> {
    ensure_presets_dir()?;
    let path = preset_path(name)?;

    if path.exists() && !force {
        anyhow::bail!("Preset '{}' already exists. Use --force to overwrite.", name);
    }

    let preset = Preset::new(name);
    preset.save(&path)?;
    println!("Saved preset '{}' to {}", name, path.display());
    Ok(())
}

fn list() -> anyhow::Result<()> {
    let names = list_presets();

    if names.is_empty() {
        println!("No user presets found.");
        println!("Create one with: duotone preset init <name>");
        return Ok(());
    }

    println!("User Presets:");
    println!("=============");
    for name in names {
        println!("  {name}");
    }
    Ok(())
}

fn show(name: &str) -> anyhow::Result<()> {
    let preset = common::load_preset(name)?;
    let (wave1, wave2) = preset.params()?;

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    println!();
    print_wave("Wave 1", &wave1);
    println!();
    print_wave("Wave 2", &wave2);
    Ok(())
}

fn print_wave(label: &str, params: &OscillatorParams) {
    println!("{label}:");
    println!("  Frequency: {} Hz", params.frequency);
    println!("  Amplitude: {}", params.amplitude);
    println!("  Waveform:  {}", params.waveform.name());
    println!(
        "  Envelope:  attack {} s, decay {} s, sustain {}, release {} s",
        params.attack_time, params.decay_time, params.sustain_level, params.release_time
    );
}
