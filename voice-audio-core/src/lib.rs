//! # voice-audio-core
//!
//! Platform-agnostic audio pipeline for the voice-practice feature.
//!
//! Provides capture-session orchestration, real-time level metering, sample
//! format conversion, WAV container I/O, and streaming TTS response
//! decoding. Platform-specific capture backends (cpal, WASAPI, Core Audio)
//! implement the `CaptureDevice` trait and plug into the generic
//! `RecordingSession`.
//!
//! ## Architecture
//!
//! ```text
//! voice-audio-core (this crate)
//! ├── traits/       ← CaptureDevice, SessionObserver
//! ├── models/       ← RecorderConfig, RecorderStatus, RecorderError, AudioLevels
//! ├── processing/   ← level metering, PCM conversion, WAV codec
//! ├── session/      ← RecordingSession (generic orchestrator)
//! ├── storage/      ← streaming WAV file writer
//! └── tts/          ← TtsStreamDecoder (line stream → audio fragments)
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;
pub mod tts;

// Re-export key types at crate root for convenience.
pub use models::audio_models::{AudioLevels, CaptureDeviceInfo, SessionDiagnostics};
pub use models::config::{RecorderConfig, SUPPORTED_SAMPLE_RATES};
pub use models::error::RecorderError;
pub use models::status::RecorderStatus;
pub use processing::wav_codec::WavSummary;
pub use session::recording_session::RecordingSession;
pub use storage::wav_writer::WavFileWriter;
pub use traits::capture_device::{AudioBufferCallback, CaptureDevice, CaptureErrorCallback};
pub use traits::session_observer::SessionObserver;
pub use tts::stream_decoder::{AudioChunk, CharacterTimestamp, TtsStreamDecoder, TtsStreamError};
