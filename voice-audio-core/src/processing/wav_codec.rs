//! RIFF/WAVE container encoding and inspection.
//!
//! Produces the canonical 44-byte PCM header (format code 1, little-endian)
//! and can validate and summarize an existing container without panicking on
//! truncated or garbage input.

use crate::models::error::RecorderError;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Diagnostic summary of a WAV container produced by [`inspect`].
#[derive(Debug, Clone, PartialEq)]
pub struct WavSummary {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Data size declared in the header at offset 40.
    pub declared_data_size: u32,
    /// Bytes actually present after the 44-byte header.
    pub actual_data_size: u64,
    /// Duration estimated from the actual payload and the declared format.
    pub duration_secs: f64,
}

/// Generate a 44-byte WAV RIFF header.
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    file size - 8 (36 + data_size)
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * channels * bits / 8
/// [32-33]  block_align = channels * bits / 8
/// [34-35]  bits_per_sample
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
pub fn generate_header(sample_rate: u32, bits_per_sample: u16, channels: u16, data_size: u32) -> [u8; WAV_HEADER_SIZE] {
    let byte_rate = sample_rate * channels as u32 * bits_per_sample as u32 / 8;
    let block_align = channels * bits_per_sample / 8;
    let chunk_size = 36 + data_size;

    let mut header = [0u8; WAV_HEADER_SIZE];

    // RIFF chunk descriptor
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    // fmt sub-chunk
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&bits_per_sample.to_le_bytes());

    // data sub-chunk
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// Wrap raw PCM in a canonical WAV container.
///
/// Fails with [`RecorderError::EmptyAudio`] on empty input. An odd-length
/// payload is padded with one zero byte to keep 16-bit sample alignment
/// before sizes are computed.
pub fn encode(pcm: &[u8], sample_rate: u32, channels: u16, bits_per_sample: u16) -> Result<Vec<u8>, RecorderError> {
    if pcm.is_empty() {
        return Err(RecorderError::EmptyAudio);
    }

    let padded_len = pcm.len() + pcm.len() % 2;
    let header = generate_header(sample_rate, bits_per_sample, channels, padded_len as u32);

    let mut out = Vec::with_capacity(WAV_HEADER_SIZE + padded_len);
    out.extend_from_slice(&header);
    out.extend_from_slice(pcm);
    if pcm.len() % 2 != 0 {
        out.push(0);
    }
    Ok(out)
}

/// Validate and summarize a WAV container.
///
/// Checks the four markers at their fixed offsets and reads the format
/// fields with bounds-checked accessors that substitute 0 when out of
/// range. Never panics; unrecognized input yields
/// [`RecorderError::NotAWav`].
pub fn inspect(bytes: &[u8]) -> Result<WavSummary, RecorderError> {
    if bytes.len() < WAV_HEADER_SIZE {
        return Err(RecorderError::NotAWav(format!(
            "{} bytes is shorter than a WAV header",
            bytes.len()
        )));
    }

    for (offset, marker) in [(0usize, b"RIFF"), (8, b"WAVE"), (12, b"fmt "), (36, b"data")] {
        if &bytes[offset..offset + 4] != marker {
            return Err(RecorderError::NotAWav(format!(
                "missing {:?} marker at offset {}",
                String::from_utf8_lossy(marker),
                offset
            )));
        }
    }

    let channels = read_u16_le(bytes, 22);
    let sample_rate = read_u32_le(bytes, 24);
    let bits_per_sample = read_u16_le(bytes, 34);
    let declared_data_size = read_u32_le(bytes, 40);
    let actual_data_size = (bytes.len() - WAV_HEADER_SIZE) as u64;

    let byte_rate = sample_rate as u64 * channels as u64 * bits_per_sample as u64 / 8;
    let duration_secs = if byte_rate == 0 {
        0.0
    } else {
        actual_data_size as f64 / byte_rate as f64
    };

    Ok(WavSummary {
        channels,
        sample_rate,
        bits_per_sample,
        declared_data_size,
        actual_data_size,
        duration_secs,
    })
}

fn read_u16_le(bytes: &[u8], offset: usize) -> u16 {
    if offset + 2 > bytes.len() {
        return 0;
    }
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    if offset + 4 > bytes.len() {
        return 0;
    }
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_empty_fails() {
        assert_eq!(encode(&[], 16000, 1, 16), Err(RecorderError::EmptyAudio));
    }

    #[test]
    fn encode_100_bytes_at_44100() {
        let pcm = vec![0u8; 100];
        let wav = encode(&pcm, 44100, 1, 16).unwrap();

        assert_eq!(wav.len(), 144);

        let riff_size = u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]);
        assert_eq!(riff_size, 136); // 36 + 100

        let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
        assert_eq!(data_size, 100);
    }

    #[test]
    fn encode_header_fields() {
        let pcm = vec![0u8; 32000];
        let wav = encode(&pcm, 16000, 1, 16).unwrap();

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(&wav[36..40], b"data");

        assert_eq!(u16::from_le_bytes([wav[20], wav[21]]), 1); // PCM
        assert_eq!(u16::from_le_bytes([wav[22], wav[23]]), 1);
        assert_eq!(u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]), 16000);
        assert_eq!(u32::from_le_bytes([wav[28], wav[29], wav[30], wav[31]]), 32000); // byte rate
        assert_eq!(u16::from_le_bytes([wav[32], wav[33]]), 2); // block align
        assert_eq!(u16::from_le_bytes([wav[34], wav[35]]), 16);
    }

    #[test]
    fn encode_pads_odd_payload() {
        let pcm = vec![0x7fu8; 101];
        let wav = encode(&pcm, 16000, 1, 16).unwrap();

        assert_eq!(wav.len(), 44 + 102);
        assert_eq!(*wav.last().unwrap(), 0);

        let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
        assert_eq!(data_size, 102);
    }

    #[test]
    fn encode_preserves_payload_verbatim() {
        let pcm: Vec<u8> = (0..=255).collect();
        let wav = encode(&pcm, 48000, 2, 16).unwrap();
        assert_eq!(&wav[44..], &pcm[..]);
    }

    #[test]
    fn inspect_round_trip() {
        let pcm = vec![0x11u8; 6400];
        let wav = encode(&pcm, 16000, 1, 16).unwrap();
        let summary = inspect(&wav).unwrap();

        assert_eq!(summary.channels, 1);
        assert_eq!(summary.sample_rate, 16000);
        assert_eq!(summary.bits_per_sample, 16);
        assert_eq!(summary.declared_data_size, 6400);
        assert_eq!(summary.actual_data_size, 6400);
        // 6400 bytes / (16000 Hz * 2 bytes) = 0.2 s
        assert!((summary.duration_secs - 0.2).abs() < 1e-9);
    }

    #[test]
    fn inspect_short_input_is_not_a_wav() {
        assert!(matches!(inspect(&[]), Err(RecorderError::NotAWav(_))));
        assert!(matches!(inspect(&[0u8; 43]), Err(RecorderError::NotAWav(_))));
    }

    #[test]
    fn inspect_garbage_is_not_a_wav() {
        let garbage = vec![0xabu8; 256];
        assert!(matches!(inspect(&garbage), Err(RecorderError::NotAWav(_))));
    }

    #[test]
    fn inspect_wrong_marker_is_not_a_wav() {
        let mut wav = encode(&[0u8; 16], 16000, 1, 16).unwrap();
        wav[8..12].copy_from_slice(b"AVI ");
        assert!(matches!(inspect(&wav), Err(RecorderError::NotAWav(_))));
    }

    #[test]
    fn inspect_reports_truncated_payload() {
        let wav = encode(&vec![0u8; 1000], 16000, 1, 16).unwrap();
        let truncated = &wav[..44 + 100];
        let summary = inspect(truncated).unwrap();

        assert_eq!(summary.declared_data_size, 1000);
        assert_eq!(summary.actual_data_size, 100);
    }

    #[test]
    fn inspect_zero_rate_has_zero_duration() {
        let mut wav = encode(&[0u8; 16], 16000, 1, 16).unwrap();
        wav[24..28].copy_from_slice(&0u32.to_le_bytes());
        let summary = inspect(&wav).unwrap();
        assert_eq!(summary.duration_secs, 0.0);
    }
}
