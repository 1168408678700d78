//! Capture-format conversion: interleaved `f32` buffers at any rate and
//! channel layout down to mono 16-bit little-endian PCM.
//!
//! Resampling is integer-ratio decimation (keep every Nth frame) with no
//! anti-alias filter. That is lossy and non-ideal above speech bandwidth;
//! it is kept deliberately for its fixed cost on the capture thread.

/// Convert interleaved `f32` samples to mono 16-bit little-endian PCM at
/// `target_rate`.
///
/// Multi-channel frames are averaged down to one sample. Rate conversion
/// keeps every `round(source_rate / target_rate)`-th frame. Each sample in
/// `[-1.0, 1.0]` maps to `round(sample * 32767)` clamped to
/// `[-32768, 32767]`.
///
/// Makes exactly one allocation, pre-sized to the output length; safe to
/// call from the capture callback.
pub fn to_mono_pcm16(samples: &[f32], channels: u16, source_rate: u32, target_rate: u32) -> Vec<u8> {
    if samples.is_empty() || channels == 0 || source_rate == 0 || target_rate == 0 {
        return Vec::new();
    }

    let channels = channels as usize;
    let frame_count = samples.len() / channels;
    let step = (source_rate as f64 / target_rate as f64).round().max(1.0) as usize;
    let output_frames = frame_count.div_ceil(step);

    let mut pcm = Vec::with_capacity(output_frames * 2);
    let scale = 1.0 / channels as f32;

    let mut frame = 0;
    while frame < frame_count {
        let mut sum = 0.0f32;
        for ch in 0..channels {
            sum += samples[frame * channels + ch];
        }
        let mono = sum * scale;

        let quantized = (mono * 32767.0).round().clamp(-32768.0, 32767.0) as i16;
        pcm.extend_from_slice(&quantized.to_le_bytes());

        frame += step;
    }
    pcm
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_i16(pcm: &[u8]) -> Vec<i16> {
        pcm.chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect()
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(to_mono_pcm16(&[], 1, 16000, 16000).is_empty());
    }

    #[test]
    fn mono_same_rate_quantizes_every_sample() {
        let samples = vec![0.5f32; 1024];
        let pcm = to_mono_pcm16(&samples, 1, 16000, 16000);

        assert_eq!(pcm.len(), 2048);
        for value in decode_i16(&pcm) {
            assert_eq!(value, 16384); // round(0.5 * 32767)
        }
    }

    #[test]
    fn quantization_is_little_endian() {
        let pcm = to_mono_pcm16(&[0.5], 1, 16000, 16000);
        // 16384 = 0x4000, low byte first.
        assert_eq!(pcm, vec![0x00, 0x40]);
    }

    #[test]
    fn full_scale_and_clamping() {
        let pcm = to_mono_pcm16(&[1.0, -1.0, 2.0, -3.0], 1, 16000, 16000);
        let values = decode_i16(&pcm);
        assert_eq!(values, vec![32767, -32767, 32767, -32767]);
    }

    #[test]
    fn negative_extreme_reachable() {
        // -32768/32767 rounds to -32768 exactly at the clamp edge.
        let pcm = to_mono_pcm16(&[-32768.0 / 32767.0], 1, 16000, 16000);
        assert_eq!(decode_i16(&pcm), vec![-32768]);
    }

    #[test]
    fn decimation_keeps_every_nth_frame() {
        // 48 kHz → 16 kHz: step 3, keep frames 0, 3, 6, ...
        let samples: Vec<f32> = (0..12).map(|i| i as f32 / 100.0).collect();
        let pcm = to_mono_pcm16(&samples, 1, 48000, 16000);
        let values = decode_i16(&pcm);

        assert_eq!(values.len(), 4);
        let expected: Vec<i16> = [0.0f32, 0.03, 0.06, 0.09]
            .iter()
            .map(|s| (s * 32767.0).round() as i16)
            .collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn non_integer_ratio_rounds_step() {
        // 44100 → 16000 has ratio 2.756..., rounded to step 3.
        let samples = vec![0.1f32; 30];
        let pcm = to_mono_pcm16(&samples, 1, 44100, 16000);
        assert_eq!(pcm.len() / 2, 10);
    }

    #[test]
    fn upsampling_ratio_clamps_to_passthrough() {
        // 8 kHz → 16 kHz rounds to step 1; decimation never interpolates.
        let samples = vec![0.2f32; 100];
        let pcm = to_mono_pcm16(&samples, 1, 8000, 16000);
        assert_eq!(pcm.len() / 2, 100);
    }

    #[test]
    fn stereo_frames_average_to_mono() {
        // Frame [0.2, 0.8] must match the mono sample 0.5.
        let stereo = to_mono_pcm16(&[0.2, 0.8], 2, 16000, 16000);
        let mono = to_mono_pcm16(&[0.5], 1, 16000, 16000);
        assert_eq!(stereo, mono);
    }

    #[test]
    fn stereo_decimation_counts_frames_not_samples() {
        // 8 stereo frames at 48 kHz → 3 mono samples at 16 kHz (frames 0, 3, 6).
        let samples = vec![0.25f32; 16];
        let pcm = to_mono_pcm16(&samples, 2, 48000, 16000);
        assert_eq!(pcm.len() / 2, 3);
    }

    #[test]
    fn partial_trailing_frame_is_dropped() {
        // 5 samples at 2 channels = 2 whole frames; the odd sample is ignored.
        let pcm = to_mono_pcm16(&[0.1, 0.1, 0.2, 0.2, 0.3], 2, 16000, 16000);
        assert_eq!(pcm.len() / 2, 2);
    }
}
