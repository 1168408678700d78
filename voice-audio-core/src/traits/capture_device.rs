use std::sync::Arc;

use crate::models::audio_models::CaptureDeviceInfo;
use crate::models::config::RecorderConfig;
use crate::models::error::RecorderError;

/// Callback invoked when a capture buffer is available.
///
/// Parameters:
/// - `samples`: interleaved f32 samples in `[-1.0, 1.0]`.
/// - `sample_rate`: the actual rate of the delivered audio in Hz.
/// - `channels`: number of interleaved channels (1 = mono, 2 = stereo).
///
/// Fires on a dedicated audio thread — keep processing minimal.
pub type AudioBufferCallback = Arc<dyn Fn(&[f32], u32, u16) + Send + Sync + 'static>;

/// Callback invoked when the capture stream fails mid-recording.
pub type CaptureErrorCallback = Arc<dyn Fn(RecorderError) + Send + Sync + 'static>;

/// Interface for platform-specific capture devices.
///
/// Implemented by `CpalMicCapture` in the `voice-audio-cpal` crate; further
/// platform backends (WASAPI, Core Audio) plug in behind the same trait.
/// The recording session depends only on this interface.
pub trait CaptureDevice: Send {
    /// Whether this capture source is currently available.
    fn is_available(&self) -> bool;

    /// Open the capture stream, delivering buffers via `on_buffer`.
    ///
    /// The stream runs at the device's native rate and channel layout;
    /// `config` is a hint the backend may or may not honor. Rate and channel
    /// mismatches are the converter's responsibility, not the device's.
    /// Stream failures after a successful open are reported via `on_error`.
    fn open(
        &mut self,
        config: &RecorderConfig,
        on_buffer: AudioBufferCallback,
        on_error: CaptureErrorCallback,
    ) -> Result<(), RecorderError>;

    /// Stop capturing and release the device.
    ///
    /// Must not return until no further `on_buffer` invocations will run —
    /// the session uses this as its drain barrier. Must be idempotent.
    fn close(&mut self) -> Result<(), RecorderError>;

    /// Information about the device backing this capture source.
    fn info(&self) -> CaptureDeviceInfo;
}
