use crate::models::audio_models::AudioLevels;
use crate::models::error::RecorderError;
use crate::models::status::RecorderStatus;

/// Event observer for recording session notifications.
///
/// Levels arrive once per captured hardware buffer (typically every
/// 10–30 ms). All methods are called from the capture or caller thread, not
/// the UI thread; implementations should marshal to the UI thread if needed
/// and must never block.
pub trait SessionObserver: Send + Sync {
    /// Called when the session status changes.
    fn on_status_changed(&self, status: RecorderStatus);

    /// Called with updated audio levels after each capture buffer.
    fn on_levels_updated(&self, levels: &AudioLevels);

    /// Called when an error occurs during capture.
    fn on_error(&self, error: &RecorderError);
}
