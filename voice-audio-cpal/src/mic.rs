//! cpal microphone capture device.
//!
//! Opens the system default input device at its native rate and channel
//! layout and delivers `f32` buffers via the core `AudioBufferCallback`.
//! Rate and channel mismatches against the requested configuration are the
//! core converter's responsibility.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use parking_lot::Mutex;

use voice_audio_core::models::audio_models::CaptureDeviceInfo;
use voice_audio_core::models::config::RecorderConfig;
use voice_audio_core::models::error::RecorderError;
use voice_audio_core::traits::capture_device::{
    AudioBufferCallback, CaptureDevice, CaptureErrorCallback,
};

/// Microphone capture over cpal's default input device.
///
/// The cpal stream is not `Send`, so it lives entirely on a dedicated
/// capture thread: `open()` resolves the device synchronously (fail-fast),
/// spawns the thread, and returns; `close()` flips the stop flag and joins
/// the thread, which drops the stream before exiting. That join is the
/// drain barrier the session relies on — once `close()` returns, no further
/// buffer callbacks will run.
pub struct CpalMicCapture {
    running: Arc<AtomicBool>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl CpalMicCapture {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }
}

impl Default for CpalMicCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureDevice for CpalMicCapture {
    fn is_available(&self) -> bool {
        cpal::default_host().default_input_device().is_some()
    }

    fn open(
        &mut self,
        config: &RecorderConfig,
        on_buffer: AudioBufferCallback,
        on_error: CaptureErrorCallback,
    ) -> Result<(), RecorderError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(RecorderError::InvalidState("capture already running".into()));
        }

        let device = cpal::default_host()
            .default_input_device()
            .ok_or(RecorderError::DeviceUnavailable)?;
        let supported = device
            .default_input_config()
            .map_err(|e| RecorderError::DeviceFailed(format!("no default input config: {}", e)))?;

        log::debug!(
            "opening mic: native {} Hz / {} ch ({:?}), requested {} Hz / {} ch",
            supported.sample_rate().0,
            supported.channels(),
            supported.sample_format(),
            config.sample_rate,
            config.channel_count
        );

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);

        let handle = thread::Builder::new()
            .name("cpal-mic-capture".into())
            .spawn(move || {
                if let Err(e) = capture_loop(&device, supported, running.clone(), on_buffer, &on_error) {
                    log::error!("mic capture error: {}", e);
                    on_error(e);
                }
                running.store(false, Ordering::SeqCst);
            })
            .map_err(|e| RecorderError::DeviceFailed(format!("failed to spawn capture thread: {}", e)))?;

        *self.worker.lock() = Some(handle);
        Ok(())
    }

    fn close(&mut self) -> Result<(), RecorderError> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
        Ok(())
    }

    fn info(&self) -> CaptureDeviceInfo {
        let name = cpal::default_host()
            .default_input_device()
            .and_then(|d| d.name().ok())
            .unwrap_or_else(|| "Default Microphone".into());
        CaptureDeviceInfo {
            id: "default-mic".into(),
            name,
            is_default: true,
        }
    }
}

/// Owns the cpal stream for the lifetime of the capture thread.
fn capture_loop(
    device: &cpal::Device,
    supported: cpal::SupportedStreamConfig,
    running: Arc<AtomicBool>,
    on_buffer: AudioBufferCallback,
    on_error: &CaptureErrorCallback,
) -> Result<(), RecorderError> {
    let sample_format = supported.sample_format();
    let sample_rate = supported.sample_rate().0;
    let channels = supported.channels();
    let stream_config: cpal::StreamConfig = supported.into();

    let err_callback = {
        let on_error = Arc::clone(on_error);
        move |e: cpal::StreamError| {
            on_error(RecorderError::DeviceFailed(format!("stream error: {}", e)));
        }
    };

    let build_error = |e: cpal::BuildStreamError| {
        RecorderError::DeviceFailed(format!("failed to build input stream: {}", e))
    };

    let stream = match sample_format {
        SampleFormat::F32 => device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    on_buffer(data, sample_rate, channels);
                },
                err_callback,
                None,
            )
            .map_err(build_error)?,
        SampleFormat::I16 => device
            .build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let floats: Vec<f32> = data.iter().map(|&s| s as f32 / 32768.0).collect();
                    on_buffer(&floats, sample_rate, channels);
                },
                err_callback,
                None,
            )
            .map_err(build_error)?,
        SampleFormat::U16 => device
            .build_input_stream(
                &stream_config,
                move |data: &[u16], _: &cpal::InputCallbackInfo| {
                    let floats: Vec<f32> = data.iter().map(|&s| (s as f32 - 32768.0) / 32768.0).collect();
                    on_buffer(&floats, sample_rate, channels);
                },
                err_callback,
                None,
            )
            .map_err(build_error)?,
        other => {
            return Err(RecorderError::DeviceFailed(format!(
                "unsupported sample format: {:?}",
                other
            )))
        }
    };

    stream
        .play()
        .map_err(|e| RecorderError::DeviceFailed(format!("failed to start stream: {}", e)))?;

    while running.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(10));
    }

    // Stream drops here, stopping hardware callbacks before the thread exits.
    drop(stream);
    Ok(())
}
