//! Pluggable audio backend abstraction.
//!
//! [`AudioBackend`] decouples the stream lifecycle from any specific platform
//! audio API. [`crate::CpalBackend`] wraps cpal (ALSA, CoreAudio, WASAPI) for
//! real playback; [`crate::MockBackend`] gives tests a deterministic backend
//! with controllable failure modes.
//!
//! Callbacks are boxed closures rather than generic parameters, keeping the
//! trait object-safe so the engine can select a backend at runtime through
//! `Box<dyn AudioBackend>`. Streams come back as [`StreamHandle`], a
//! type-erased wrapper that stops playback when dropped, so backend-specific
//! stream types never leak into application code.

use crate::Result;

/// Description of one audio output device.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Maximum output channel count.
    pub max_output_channels: u16,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Whether this is the system default output device.
    pub is_default: bool,
}

/// Configuration for building an output stream.
#[derive(Debug, Clone)]
pub struct BackendStreamConfig {
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Fixed buffer size in frames, or `None` to let the backend choose.
    pub buffer_size: Option<u32>,
    /// Number of output channels.
    pub channels: u16,
    /// Optional device name (uses the system default if `None`).
    pub device_name: Option<String>,
}

impl Default for BackendStreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            buffer_size: None,
            channels: 1,
            device_name: None,
        }
    }
}

/// Type-erased audio stream handle.
///
/// Wraps a backend-specific stream object. The stream is active while this
/// handle exists; dropping it stops playback.
pub struct StreamHandle {
    _inner: Box<dyn Send>,
}

impl StreamHandle {
    /// Wrap a backend-specific stream object.
    ///
    /// The wrapped value is kept alive until this handle is dropped.
    pub fn new<T: Send + 'static>(stream: T) -> Self {
        Self {
            _inner: Box::new(stream),
        }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Audio output callback signature.
///
/// Called by the backend on the real-time audio thread with a buffer of f32
/// samples to fill. For mono streams the buffer length equals the frame
/// count. Implementations must stay bounded: no allocation, no I/O, and no
/// lock held for longer than a field copy.
pub type OutputCallback = Box<dyn FnMut(&mut [f32]) + Send>;

/// Error callback signature.
///
/// Called with a human-readable message when the backend hits a streaming
/// error outside the output callback.
pub type ErrorCallback = Box<dyn FnMut(&str) + Send>;

/// Pluggable audio backend.
///
/// Mirrors the lifecycle the engine walks through: initialize the library
/// once, query devices, build and hold a stream, shut the library down.
/// `initialize` and `shutdown` default to no-ops for backends whose library
/// has no global setup of its own.
pub trait AudioBackend: Send {
    /// Short name of this backend, for logs ("cpal", "mock").
    fn name(&self) -> &str;

    /// Initialize the backend library. Called once before any stream work.
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// List the available output devices.
    fn list_output_devices(&self) -> Result<Vec<AudioDevice>>;

    /// The system default output device, or `None` when the system has no
    /// output device at all.
    fn default_output_device(&self) -> Result<Option<AudioDevice>>;

    /// Open and start an output stream.
    ///
    /// `callback` runs on the audio thread for every buffer; `error_callback`
    /// receives runtime stream errors. The returned [`StreamHandle`] keeps
    /// the stream playing until it is dropped.
    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        callback: OutputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle>;

    /// Shut the backend library down. Called once after all streams are gone.
    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}
