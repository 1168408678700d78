use std::mem;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::models::audio_models::{AudioLevels, CaptureDeviceInfo, SessionDiagnostics};
use crate::models::config::RecorderConfig;
use crate::models::error::RecorderError;
use crate::models::status::RecorderStatus;
use crate::processing::{level_meter, sample_converter, wav_codec};
use crate::traits::capture_device::{AudioBufferCallback, CaptureDevice, CaptureErrorCallback};
use crate::traits::session_observer::SessionObserver;

/// Mutable session state shared with the capture callbacks, protected by
/// `parking_lot::Mutex`.
///
/// The PCM buffer has exactly one writer — the capture callback — and is
/// read only at `stop()`, after the device has been closed and its thread
/// joined. The status field doubles as the gate: callbacks that observe a
/// non-recording status drop their buffer.
struct SessionShared {
    status: RecorderStatus,
    levels: AudioLevels,
    pcm: Vec<u8>,
    diagnostics: SessionDiagnostics,
    last_error: Option<RecorderError>,
}

impl SessionShared {
    fn new() -> Self {
        Self {
            status: RecorderStatus::Idle,
            levels: AudioLevels::default(),
            pcm: Vec::new(),
            diagnostics: SessionDiagnostics::default(),
            last_error: None,
        }
    }
}

/// Recording session orchestrator, generic over the platform capture device.
///
/// Owns the capture lifecycle and the PCM buffer:
/// ```text
/// [CaptureDevice] → to_mono_pcm16 → [PCM buffer]
///                 → level_meter   → [AudioLevels slot]
/// ```
///
/// One shot per instance: `Idle → Recording → Stopped / Error`. Create a new
/// session to record again. The device is released on every exit path —
/// `stop()`, `cancel()`, capture failure, or drop.
pub struct RecordingSession<D: CaptureDevice> {
    device: D,
    device_open: bool,
    config: Option<RecorderConfig>,
    shared: Arc<Mutex<SessionShared>>,
    observer: Option<Arc<dyn SessionObserver>>,
    capture_start: Option<Instant>,
    captured_secs: f64,
}

impl<D: CaptureDevice> RecordingSession<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            device_open: false,
            config: None,
            shared: Arc::new(Mutex::new(SessionShared::new())),
            observer: None,
            capture_start: None,
            captured_secs: 0.0,
        }
    }

    /// Register an observer for status, level, and error events.
    pub fn set_observer(&mut self, observer: Arc<dyn SessionObserver>) {
        self.observer = Some(observer);
    }

    pub fn status(&self) -> RecorderStatus {
        self.shared.lock().status
    }

    /// Latest audio levels (latest-value-wins slot, overwritten per buffer).
    pub fn levels(&self) -> AudioLevels {
        self.shared.lock().levels
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        self.shared.lock().diagnostics
    }

    /// The error that moved the session to `Error`, if any.
    pub fn last_error(&self) -> Option<RecorderError> {
        self.shared.lock().last_error.clone()
    }

    /// Wall-clock capture time: running while recording, frozen at stop.
    pub fn elapsed_secs(&self) -> f64 {
        match self.capture_start {
            Some(start) if self.status().is_recording() => start.elapsed().as_secs_f64(),
            _ => self.captured_secs,
        }
    }

    pub fn is_device_available(&self) -> bool {
        self.device.is_available()
    }

    pub fn device_info(&self) -> CaptureDeviceInfo {
        self.device.info()
    }

    /// Validate the configuration and begin capturing.
    ///
    /// Invalid configuration moves the session to `Error` without touching
    /// the hardware. On success the device delivers buffers on its own
    /// capture thread until `stop()` or `cancel()`.
    pub fn start(&mut self, config: RecorderConfig) -> Result<(), RecorderError> {
        if !self.status().is_idle() {
            return Err(RecorderError::InvalidState(
                "start() requires an idle session".into(),
            ));
        }

        if let Err(e) = config.validate() {
            log::error!("rejecting recorder config: {}", e);
            self.set_status(RecorderStatus::Error);
            let mut s = self.shared.lock();
            s.last_error = Some(e.clone());
            drop(s);
            if let Some(ref o) = self.observer {
                o.on_error(&e);
            }
            return Err(e);
        }

        {
            let mut s = self.shared.lock();
            s.levels = AudioLevels::default();
            s.pcm.clear();
            s.pcm.reserve(config.sample_rate as usize * 2); // one second of mono PCM16
            s.diagnostics = SessionDiagnostics::default();
            s.last_error = None;
        }
        self.config = Some(config);
        self.capture_start = Some(Instant::now());

        // Recording before open: the device may deliver its first buffer
        // before open() returns, and the callback gate drops anything seen
        // outside the Recording status.
        self.set_status(RecorderStatus::Recording);

        let on_buffer = self.make_buffer_callback(config.sample_rate);
        let on_error = self.make_error_callback();

        if let Err(e) = self.device.open(&config, on_buffer, on_error) {
            log::error!("failed to open capture device: {}", e);
            self.set_status(RecorderStatus::Error);
            let mut s = self.shared.lock();
            s.last_error = Some(e.clone());
            drop(s);
            if let Some(ref o) = self.observer {
                o.on_error(&e);
            }
            return Err(e);
        }
        self.device_open = true;

        log::debug!(
            "recording started: {} Hz, {} ch, {} bit, wav={}",
            config.sample_rate,
            config.channel_count,
            config.bits_per_sample,
            config.wrap_as_wav
        );
        Ok(())
    }

    /// Finish the recording and return the captured audio.
    ///
    /// Blocks until the device's capture thread has drained, so the returned
    /// bytes are complete and immutable. Wraps in a WAV container when the
    /// config asks for it, falling back to raw PCM if encoding fails —
    /// captured audio is never discarded. Calling while not recording is a
    /// logged no-op returning empty bytes.
    pub fn stop(&mut self) -> Vec<u8> {
        let was_recording = {
            let mut s = self.shared.lock();
            if s.status.is_recording() {
                s.status = RecorderStatus::Stopped;
                true
            } else {
                false
            }
        };

        if !was_recording {
            log::warn!("stop() called while not recording; returning empty buffer");
            self.release_device();
            return Vec::new();
        }

        if let Some(start) = self.capture_start.take() {
            self.captured_secs = start.elapsed().as_secs_f64();
        }
        self.notify_status(RecorderStatus::Stopped);

        // Drain barrier: close() joins the capture thread, so no writer
        // exists past this point.
        self.release_device();

        let pcm = {
            let mut s = self.shared.lock();
            s.levels = AudioLevels::default();
            mem::take(&mut s.pcm)
        };

        log::debug!("recording stopped: {} bytes in {:.2}s", pcm.len(), self.captured_secs);

        let Some(config) = self.config else {
            return pcm;
        };
        if !config.wrap_as_wav {
            return pcm;
        }

        // The conversion path always yields mono 16-bit at the target rate.
        match wav_codec::encode(&pcm, config.sample_rate, 1, 16) {
            Ok(wav) => wav,
            Err(e) => {
                log::error!("WAV wrap failed ({}); returning raw PCM", e);
                pcm
            }
        }
    }

    /// Abort the recording, discarding any buffered audio.
    ///
    /// Valid from any state; safe against an in-flight buffer delivery. The
    /// device is released either way.
    pub fn cancel(&mut self) {
        let transitioned = {
            let mut s = self.shared.lock();
            let transitioned = if s.status.is_terminal() {
                false
            } else {
                s.status = RecorderStatus::Stopped;
                true
            };
            s.pcm = Vec::new();
            s.levels = AudioLevels::default();
            transitioned
        };

        if transitioned {
            log::debug!("recording cancelled");
            self.notify_status(RecorderStatus::Stopped);
        }
        if let Some(start) = self.capture_start.take() {
            self.captured_secs = start.elapsed().as_secs_f64();
        }
        self.release_device();
    }

    // --- Internal helpers ---

    fn make_buffer_callback(&self, target_rate: u32) -> AudioBufferCallback {
        let shared = Arc::clone(&self.shared);
        let observer = self.observer.clone();

        Arc::new(move |samples: &[f32], source_rate: u32, channels: u16| {
            // Convert and meter before taking the lock; the critical section
            // is only the append and the level-slot overwrite.
            let pcm = sample_converter::to_mono_pcm16(samples, channels, source_rate, target_rate);
            let raw_level = level_meter::rms(samples);

            let mut s = shared.lock();
            if !s.status.is_recording() {
                // Late delivery after stop()/cancel()/failure.
                return;
            }
            s.pcm.extend_from_slice(&pcm);
            s.diagnostics.callback_count += 1;
            s.diagnostics.samples_in += samples.len() as u64;
            s.diagnostics.bytes_out += pcm.len() as u64;

            let current = level_meter::smooth(raw_level, s.levels.current, level_meter::SMOOTHING_FACTOR);
            let peak = level_meter::update_peak(current, s.levels.peak, level_meter::PEAK_DECAY);
            s.levels = AudioLevels { current, peak };
            let levels = s.levels;
            drop(s);

            if let Some(ref o) = observer {
                o.on_levels_updated(&levels);
            }
        })
    }

    fn make_error_callback(&self) -> CaptureErrorCallback {
        let shared = Arc::clone(&self.shared);
        let observer = self.observer.clone();

        Arc::new(move |error: RecorderError| {
            log::error!("capture failure: {}", error);
            let transitioned = {
                let mut s = shared.lock();
                if s.status.is_terminal() {
                    false
                } else {
                    s.status = RecorderStatus::Error;
                    s.last_error = Some(error.clone());
                    true
                }
            };
            if transitioned {
                if let Some(ref o) = observer {
                    o.on_error(&error);
                    o.on_status_changed(RecorderStatus::Error);
                }
            }
        })
    }

    fn set_status(&self, status: RecorderStatus) {
        self.shared.lock().status = status;
        self.notify_status(status);
    }

    fn notify_status(&self, status: RecorderStatus) {
        if let Some(ref o) = self.observer {
            o.on_status_changed(status);
        }
    }

    fn release_device(&mut self) {
        if self.device_open {
            if let Err(e) = self.device.close() {
                log::error!("failed to close capture device: {}", e);
            }
            self.device_open = false;
        }
    }
}

impl<D: CaptureDevice> Drop for RecordingSession<D> {
    fn drop(&mut self) {
        self.release_device();
    }
}
