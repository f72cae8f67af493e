//! Duotone CLI - command-line driver for the dual-oscillator synthesizer.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duotone")]
#[command(author, version, about = "Dual-oscillator synthesizer CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play both oscillators through the default output device
    Play(commands::play::PlayArgs),

    /// Render a note to a WAV file without an audio device
    Render(commands::render::RenderArgs),

    /// List audio output devices
    Devices(commands::devices::DevicesArgs),

    /// Manage preset files
    Preset(commands::preset::PresetArgs),
}

fn main() -> anyhow::Result<()> {
    // Quiet by default; RUST_LOG=debug surfaces the stream lifecycle
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => commands::play::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Preset(args) => commands::preset::run(args),
    }
}
