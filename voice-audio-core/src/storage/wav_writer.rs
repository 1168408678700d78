use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::models::error::RecorderError;
use crate::processing::wav_codec;

/// Streaming WAV file writer for takes too long to hold in memory.
///
/// `open()` writes a placeholder 44-byte header, `write()` appends PCM as it
/// arrives, and `close()` pads the payload to even length and patches the
/// RIFF and data sizes in place.
pub struct WavFileWriter {
    file_path: PathBuf,
    file: Option<File>,
    total_bytes_written: u64,
    is_open: bool,
}

impl WavFileWriter {
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            file: None,
            total_bytes_written: 0,
            is_open: false,
        }
    }

    /// Create the file and write the initial header with a zero data size.
    pub fn open(&mut self, sample_rate: u32, channels: u16, bits_per_sample: u16) -> Result<(), RecorderError> {
        if self.is_open {
            return Ok(());
        }

        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RecorderError::Storage(format!("failed to create directory: {}", e)))?;
        }

        let file = File::create(&self.file_path)
            .map_err(|e| RecorderError::Storage(format!("failed to create file: {}", e)))?;
        self.file = Some(file);

        let header = wav_codec::generate_header(sample_rate, bits_per_sample, channels, 0);
        self.write_raw(&header)?;
        self.is_open = true;
        Ok(())
    }

    /// Append raw PCM data.
    pub fn write(&mut self, data: &[u8]) -> Result<(), RecorderError> {
        if !self.is_open {
            return Err(RecorderError::Storage("file is not open for writing".into()));
        }
        self.write_raw(data)
    }

    /// Finalize the file: pad to 16-bit alignment and patch the header
    /// sizes. Returns the final payload size in bytes.
    pub fn close(&mut self) -> Result<u64, RecorderError> {
        if !self.is_open {
            return Err(RecorderError::Storage("file is not open".into()));
        }

        let data_bytes = self.total_bytes_written - wav_codec::WAV_HEADER_SIZE as u64;
        if data_bytes % 2 != 0 {
            self.write_raw(&[0u8])?;
        }
        let data_size = self.total_bytes_written - wav_codec::WAV_HEADER_SIZE as u64;

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| RecorderError::Storage("file is not open".into()))?;

        // Patch RIFF chunk size at offset 4
        file.seek(SeekFrom::Start(4))
            .map_err(|e| RecorderError::Storage(e.to_string()))?;
        let riff_size = (self.total_bytes_written - 8) as u32;
        file.write_all(&riff_size.to_le_bytes())
            .map_err(|e| RecorderError::Storage(e.to_string()))?;

        // Patch data size at offset 40
        file.seek(SeekFrom::Start(40))
            .map_err(|e| RecorderError::Storage(e.to_string()))?;
        file.write_all(&(data_size as u32).to_le_bytes())
            .map_err(|e| RecorderError::Storage(e.to_string()))?;

        file.flush().map_err(|e| RecorderError::Storage(e.to_string()))?;
        self.file = None;
        self.is_open = false;
        Ok(data_size)
    }

    /// Total bytes written so far, including the header.
    pub fn bytes_written(&self) -> u64 {
        self.total_bytes_written
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), RecorderError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| RecorderError::Storage("file is not open".into()))?;
        file.write_all(data)
            .map_err(|e| RecorderError::Storage(format!("write failed: {}", e)))?;
        self.total_bytes_written += data.len() as u64;
        Ok(())
    }
}
