//! Audio stream lifecycle.
//!
//! [`AudioEngine`] walks a backend through the four lifecycle steps the
//! synthesizer needs: initialize the library and reset the envelopes, start
//! an output stream that renders the shared state, stop the stream, shut the
//! library down. The only stream state is the held [`StreamHandle`]; start
//! and stop are idempotent around it.

use crate::backend::{
    AudioBackend, AudioDevice, BackendStreamConfig, ErrorCallback, OutputCallback, StreamHandle,
};
use crate::{Error, Result};
use duotone_synth::{RenderStatus, SynthHandle, render_buffer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Stream lifecycle manager over a pluggable backend.
///
/// The engine owns the backend and a [`SynthHandle`] clone; the audio thread
/// gets its own handle clone inside the output callback. A render failure
/// (poisoned state lock) latches the abort flag: the callback outputs
/// silence from then on and [`aborted`] reports it, so the control thread
/// can stop the stream and surface the error.
///
/// [`aborted`]: AudioEngine::aborted
pub struct AudioEngine {
    backend: Box<dyn AudioBackend>,
    handle: SynthHandle,
    stream: Option<StreamHandle>,
    aborted: Arc<AtomicBool>,
}

impl AudioEngine {
    /// Build an engine over a backend and the shared synthesis state.
    pub fn new(backend: Box<dyn AudioBackend>, handle: SynthHandle) -> Self {
        Self {
            backend,
            handle,
            stream: None,
            aborted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Initialize the backend library and reset both envelopes to Idle.
    ///
    /// A poisoned state lock here abandons bring-up: the backend is shut
    /// down again and the error surfaces.
    pub fn initialize(&mut self) -> Result<()> {
        self.backend.initialize()?;
        tracing::info!(backend = self.backend.name(), "audio backend initialized");

        if let Err(poisoned) = self.handle.reset_envelopes() {
            let _ = self.backend.shutdown();
            return Err(poisoned.into());
        }
        Ok(())
    }

    /// Open and start the output stream on the default device.
    ///
    /// A no-op when the stream is already running. Fails with
    /// [`Error::NoDevice`] when the system has no output device. The stream
    /// is mono, at the sample rate stored in the shared state, with the
    /// backend's preferred buffer size.
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            tracing::debug!("audio stream already started");
            return Ok(());
        }

        let device = self
            .backend
            .default_output_device()?
            .ok_or(Error::NoDevice)?;
        tracing::info!(device = %device.name, "using default output device");

        let sample_rate = self.handle.sample_rate()?;

        self.aborted.store(false, Ordering::SeqCst);
        let render_handle = self.handle.clone();
        let aborted = Arc::clone(&self.aborted);
        let callback: OutputCallback = Box::new(move |buffer: &mut [f32]| {
            if aborted.load(Ordering::SeqCst) {
                buffer.fill(0.0);
                return;
            }
            if render_buffer(&render_handle, buffer) == RenderStatus::Abort {
                aborted.store(true, Ordering::SeqCst);
            }
        });
        let error_callback: ErrorCallback = Box::new(|message| {
            tracing::error!(message, "audio stream error");
        });

        let config = BackendStreamConfig {
            sample_rate: sample_rate as u32,
            ..BackendStreamConfig::default()
        };
        let stream = self
            .backend
            .build_output_stream(&config, callback, error_callback)?;
        self.stream = Some(stream);
        tracing::info!(sample_rate, "audio stream started");
        Ok(())
    }

    /// Stop and close the stream. Safe to call when already stopped.
    pub fn stop(&mut self) {
        if self.stream.is_none() {
            return;
        }
        tracing::info!("stopping audio stream");
        self.stream = None;
    }

    /// Shut the backend library down, stopping the stream first if needed.
    pub fn terminate(&mut self) -> Result<()> {
        if self.stream.is_some() {
            tracing::warn!("terminating with an open stream, stopping first");
            self.stop();
        }
        self.backend.shutdown()?;
        tracing::info!("audio backend shut down");
        Ok(())
    }

    /// Whether an output stream is currently open.
    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    /// Whether the render callback hit an unrecoverable failure.
    ///
    /// Latched once set. The stream keeps running but outputs silence; the
    /// application should stop it and report the error.
    pub fn aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    /// The shared synthesis state this engine renders.
    pub fn handle(&self) -> &SynthHandle {
        &self.handle
    }

    /// List the backend's output devices.
    pub fn list_output_devices(&self) -> Result<Vec<AudioDevice>> {
        self.backend.list_output_devices()
    }
}
