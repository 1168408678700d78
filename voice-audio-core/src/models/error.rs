use thiserror::Error;

/// Errors that can occur during recording and container operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid session state: {0}")]
    InvalidState(String),

    #[error("no capture device available")]
    DeviceUnavailable,

    #[error("capture device failed: {0}")]
    DeviceFailed(String),

    #[error("audio payload is empty")]
    EmptyAudio,

    #[error("not a RIFF/WAVE container: {0}")]
    NotAWav(String),

    #[error("storage error: {0}")]
    Storage(String),
}
