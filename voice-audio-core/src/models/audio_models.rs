/// Real-time audio level metering, both in the 0.0–1.0 range.
///
/// `current` is the smoothed RMS of the most recent capture buffer; `peak`
/// rises instantly to any higher level and decays geometrically otherwise.
/// Reset to zero on session start and on cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AudioLevels {
    pub current: f32,
    pub peak: f32,
}

/// A capture device available to back a recording session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureDeviceInfo {
    pub id: String,
    pub name: String,
    pub is_default: bool,
}

/// Counters for debugging a capture session.
///
/// `bytes_out` equals the payload length `stop()` returns, before any WAV
/// wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionDiagnostics {
    pub callback_count: u64,
    pub samples_in: u64,
    pub bytes_out: u64,
}
