//! Deterministic audio backend for tests.
//!
//! [`MockBackend`] implements [`AudioBackend`] without any audio hardware.
//! It records lifecycle calls, exposes failure switches for every stage, and
//! lets tests drive the output callback synchronously through [`pump`]. The
//! backend is a cheap clone around shared state, so a test can hand one clone
//! to the engine and keep another for inspection.
//!
//! [`pump`]: MockBackend::pump

use crate::backend::{
    AudioBackend, AudioDevice, BackendStreamConfig, ErrorCallback, OutputCallback, StreamHandle,
};
use crate::{Error, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct MockInner {
    no_device: bool,
    fail_initialize: bool,
    fail_build: bool,
    fail_shutdown: bool,
    initialize_calls: usize,
    shutdown_calls: usize,
    build_calls: usize,
    streaming: bool,
    callback: Option<OutputCallback>,
    last_config: Option<BackendStreamConfig>,
}

/// Stream guard handed to [`StreamHandle`]; dropping it ends the mock stream.
struct MockStream {
    inner: Arc<Mutex<MockInner>>,
}

impl Drop for MockStream {
    fn drop(&mut self) {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        inner.streaming = false;
        inner.callback = None;
    }
}

/// In-memory [`AudioBackend`] with scripted devices and failures.
///
/// # Example
///
/// ```rust
/// use duotone_io::backend::AudioBackend;
/// use duotone_io::mock::MockBackend;
///
/// let backend = MockBackend::new().without_device();
/// assert!(backend.default_output_device().unwrap().is_none());
/// ```
#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<MockInner>>,
}

impl MockBackend {
    /// A backend with one mock output device and no scripted failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a system with no output device at all.
    pub fn without_device(self) -> Self {
        self.state().no_device = true;
        self
    }

    /// Script `initialize` to fail.
    pub fn failing_initialize(self) -> Self {
        self.state().fail_initialize = true;
        self
    }

    /// Script `build_output_stream` to fail.
    pub fn failing_build(self) -> Self {
        self.state().fail_build = true;
        self
    }

    /// Script `shutdown` to fail.
    pub fn failing_shutdown(self) -> Self {
        self.state().fail_shutdown = true;
        self
    }

    /// Number of `initialize` calls so far.
    pub fn initialize_calls(&self) -> usize {
        self.state().initialize_calls
    }

    /// Number of `shutdown` calls so far.
    pub fn shutdown_calls(&self) -> usize {
        self.state().shutdown_calls
    }

    /// Number of `build_output_stream` calls so far, failed attempts included.
    pub fn build_calls(&self) -> usize {
        self.state().build_calls
    }

    /// Whether a stream is currently open.
    pub fn is_streaming(&self) -> bool {
        self.state().streaming
    }

    /// The configuration of the most recently built stream.
    pub fn last_config(&self) -> Option<BackendStreamConfig> {
        self.state().last_config.clone()
    }

    /// Drive the stored output callback for one buffer of `frames` samples.
    ///
    /// This is what the audio thread would do; tests call it synchronously.
    /// Returns the rendered buffer, or `None` when no stream is open.
    pub fn pump(&self, frames: usize) -> Option<Vec<f32>> {
        let mut callback = self.state().callback.take()?;
        let mut buffer = vec![0.0f32; frames];
        callback(&mut buffer);

        let mut state = self.state();
        if state.streaming {
            state.callback = Some(callback);
        }
        Some(buffer)
    }

    fn state(&self) -> MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mock_device() -> AudioDevice {
        AudioDevice {
            name: "Mock Device".to_string(),
            max_output_channels: 2,
            default_sample_rate: 44100,
            is_default: true,
        }
    }
}

impl AudioBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn initialize(&mut self) -> Result<()> {
        let mut state = self.state();
        state.initialize_calls += 1;
        if state.fail_initialize {
            return Err(Error::Backend("mock initialize failure".to_string()));
        }
        Ok(())
    }

    fn list_output_devices(&self) -> Result<Vec<AudioDevice>> {
        if self.state().no_device {
            return Ok(Vec::new());
        }
        Ok(vec![Self::mock_device()])
    }

    fn default_output_device(&self) -> Result<Option<AudioDevice>> {
        if self.state().no_device {
            return Ok(None);
        }
        Ok(Some(Self::mock_device()))
    }

    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        callback: OutputCallback,
        _error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        let mut state = self.state();
        state.build_calls += 1;
        if state.fail_build {
            return Err(Error::Stream("mock stream build failure".to_string()));
        }
        state.last_config = Some(config.clone());
        state.callback = Some(callback);
        state.streaming = true;
        drop(state);

        Ok(StreamHandle::new(MockStream {
            inner: Arc::clone(&self.inner),
        }))
    }

    fn shutdown(&mut self) -> Result<()> {
        let mut state = self.state();
        state.shutdown_calls += 1;
        if state.fail_shutdown {
            return Err(Error::Backend("mock shutdown failure".to_string()));
        }
        Ok(())
    }
}
