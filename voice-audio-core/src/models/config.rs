use serde::{Deserialize, Serialize};

use super::error::RecorderError;

/// Sample rates the recorder accepts, in Hz.
pub const SUPPORTED_SAMPLE_RATES: [u32; 5] = [8000, 16000, 22050, 44100, 48000];

/// Configuration for a recording session.
///
/// `channel_count` and `bits_per_sample` describe the capture stream
/// requested from the device; the conversion path always normalizes
/// delivered buffers to mono 16-bit PCM at `sample_rate`.
///
/// Immutable once a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Target sample rate in Hz.
    pub sample_rate: u32,

    /// Number of capture channels (1 = mono, 2 = stereo).
    pub channel_count: u16,

    /// Bit depth requested from the device. Valid values: 16, 24, 32.
    pub bits_per_sample: u16,

    /// Wrap the finished take in a RIFF/WAVE container on `stop()`.
    pub wrap_as_wav: bool,
}

impl RecorderConfig {
    /// Low-bandwidth preset for speech-to-text submission: 16 kHz mono raw PCM.
    pub fn speech_to_text() -> Self {
        Self {
            sample_rate: 16000,
            channel_count: 1,
            bits_per_sample: 16,
            wrap_as_wav: false,
        }
    }

    /// High-quality preset for general capture: 44.1 kHz stereo WAV.
    pub fn high_quality() -> Self {
        Self {
            sample_rate: 44100,
            channel_count: 2,
            bits_per_sample: 16,
            wrap_as_wav: true,
        }
    }

    /// Check the configuration against the supported parameter sets.
    ///
    /// Runs before any hardware interaction; a violation is a typed failure,
    /// never a crash.
    pub fn validate(&self) -> Result<(), RecorderError> {
        if !SUPPORTED_SAMPLE_RATES.contains(&self.sample_rate) {
            return Err(RecorderError::InvalidConfig(format!(
                "unsupported sample rate: {}",
                self.sample_rate
            )));
        }
        if ![1, 2].contains(&self.channel_count) {
            return Err(RecorderError::InvalidConfig(format!(
                "unsupported channel count: {}",
                self.channel_count
            )));
        }
        if ![16, 24, 32].contains(&self.bits_per_sample) {
            return Err(RecorderError::InvalidConfig(format!(
                "unsupported bit depth: {}",
                self.bits_per_sample
            )));
        }
        Ok(())
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self::speech_to_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert!(RecorderConfig::speech_to_text().validate().is_ok());
        assert!(RecorderConfig::high_quality().validate().is_ok());
    }

    #[test]
    fn every_supported_rate_validates() {
        for rate in SUPPORTED_SAMPLE_RATES {
            let config = RecorderConfig {
                sample_rate: rate,
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "rate {} should validate", rate);
        }
    }

    #[test]
    fn rejects_unsupported_rate() {
        let config = RecorderConfig {
            sample_rate: 11025,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RecorderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_bad_channel_count() {
        for channels in [0u16, 3, 6] {
            let config = RecorderConfig {
                channel_count: channels,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{} channels should fail", channels);
        }
    }

    #[test]
    fn rejects_bad_bit_depth() {
        for bits in [0u16, 8, 12, 64] {
            let config = RecorderConfig {
                bits_per_sample: bits,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{} bits should fail", bits);
        }
    }

    #[test]
    fn config_json_round_trip() {
        let config = RecorderConfig::high_quality();
        let json = serde_json::to_string(&config).unwrap();
        let back: RecorderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
