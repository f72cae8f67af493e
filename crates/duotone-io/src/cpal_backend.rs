//! cpal-based audio backend.
//!
//! [`CpalBackend`] is the hardware implementation of
//! [`AudioBackend`], wrapping [cpal](https://crates.io/crates/cpal) for
//! cross-platform output: ALSA on Linux, CoreAudio on macOS, WASAPI on
//! Windows. cpal has no global init or teardown of its own, so the trait's
//! `initialize` and `shutdown` keep their no-op defaults.

use crate::backend::{
    AudioBackend, AudioDevice, BackendStreamConfig, ErrorCallback, OutputCallback, StreamHandle,
};
use crate::{Error, Result};
use cpal::Host;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// Extract device name via `description()` (cpal 0.17+).
fn device_name(device: &cpal::Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Audio backend over the platform's default cpal host.
pub struct CpalBackend {
    host: Host,
}

impl CpalBackend {
    /// Create a backend on the platform's default audio host.
    pub fn new() -> Self {
        tracing::info!(
            host = cpal::default_host().id().name(),
            "cpal backend initialized"
        );
        Self {
            host: cpal::default_host(),
        }
    }

    fn find_output_device(&self, name: Option<&str>) -> Result<cpal::Device> {
        match name {
            Some(search) => {
                let search_lower = search.to_lowercase();
                let devices = self
                    .host
                    .output_devices()
                    .map_err(|e| Error::Stream(e.to_string()))?;

                for device in devices {
                    if let Ok(dev_name) = device_name(&device)
                        && dev_name.to_lowercase().contains(search_lower.as_str())
                    {
                        return Ok(device);
                    }
                }
                Err(Error::Stream(format!(
                    "no output device matching '{}'",
                    search
                )))
            }
            None => self.host.default_output_device().ok_or(Error::NoDevice),
        }
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for CpalBackend {
    fn name(&self) -> &'static str {
        "cpal"
    }

    fn list_output_devices(&self) -> Result<Vec<AudioDevice>> {
        let default_name = self
            .host
            .default_output_device()
            .and_then(|d| device_name(&d).ok());

        let mut devices = Vec::new();
        let outputs = self
            .host
            .output_devices()
            .map_err(|e| Error::Stream(e.to_string()))?;
        for device in outputs {
            let Ok(name) = device_name(&device) else {
                continue;
            };
            let (channels, sample_rate) = device
                .default_output_config()
                .map(|c| (c.channels(), c.sample_rate()))
                .unwrap_or((1, 44100));

            let is_default = default_name.as_deref() == Some(name.as_str());
            devices.push(AudioDevice {
                name,
                max_output_channels: channels,
                default_sample_rate: sample_rate,
                is_default,
            });
        }
        Ok(devices)
    }

    fn default_output_device(&self) -> Result<Option<AudioDevice>> {
        let Some(device) = self.host.default_output_device() else {
            return Ok(None);
        };
        let name = device_name(&device).map_err(|e| Error::Stream(e.to_string()))?;
        let (channels, sample_rate) = device
            .default_output_config()
            .map(|c| (c.channels(), c.sample_rate()))
            .unwrap_or((1, 44100));

        Ok(Some(AudioDevice {
            name,
            max_output_channels: channels,
            default_sample_rate: sample_rate,
            is_default: true,
        }))
    }

    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        mut callback: OutputCallback,
        mut error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        let device = self.find_output_device(config.device_name.as_deref())?;

        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate: config.sample_rate,
            buffer_size: match config.buffer_size {
                Some(frames) => cpal::BufferSize::Fixed(frames),
                None => cpal::BufferSize::Default,
            },
        };

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    callback(data);
                },
                move |err| {
                    error_callback(&err.to_string());
                },
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(
            channels = config.channels,
            sample_rate = config.sample_rate,
            "output stream started"
        );

        Ok(StreamHandle::new(stream))
    }
}
