//! # voice-audio-cpal
//!
//! Cross-platform microphone backend for `voice-audio-core`, built on
//! [`cpal`]. Implements the `CaptureDevice` trait against the system
//! default input device.

pub mod mic;

pub use mic::CpalMicCapture;
