//! Audio device listing command.

use clap::Args;
use duotone_io::CpalBackend;
use duotone_io::backend::AudioBackend;

#[derive(Args)]
pub struct DevicesArgs {}

pub fn run(_args: DevicesArgs) -> anyhow::Result<()> {
    let backend = CpalBackend::new();
    let devices = backend.list_output_devices()?;

    if devices.is_empty() {
        println!("No audio output devices found.");
        return Ok(());
    }

    println!("Output Devices:");
    println!("===============");
    for (idx, device) in devices.iter().enumerate() {
        let marker = if device.is_default { " (default)" } else { "" };
        println!(
            "  [{}] {} ({} ch, {} Hz){}",
            idx, device.name, device.max_output_channels, device.default_sample_rate, marker
        );
    }
    Ok(())
}
