//! Streaming decoder for line-delimited TTS responses.
//!
//! Each non-blank line of the response is one JSON object carrying a
//! base64-encoded audio fragment and its per-character timing. The decoder
//! is a lazy, single-pass iterator: chunks come out in line order, one line
//! is held at a time, and a malformed line is logged and skipped rather
//! than aborting the stream. Only a transport failure ends the sequence.

use std::io::{self, BufRead, Lines};
use std::sync::mpsc;
use std::thread;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use thiserror::Error;

/// One decoded audio fragment with its character timing.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    pub audio: Vec<u8>,
    pub timestamps: Vec<CharacterTimestamp>,
}

/// Timing of a single character within the synthesized audio.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterTimestamp {
    pub character: String,
    pub start_time_s: f32,
    pub end_time_s: f32,
}

/// Terminal failure of the decode stream.
///
/// Per-line parse and decode failures are recovered internally; only a
/// failure of the underlying transport surfaces here, once, after which the
/// sequence is over.
#[derive(Debug, Error)]
pub enum TtsStreamError {
    #[error("transport failure: {0}")]
    Transport(#[from] io::Error),
}

#[derive(Deserialize)]
struct WireChunk {
    audio: String,
    timestamps: Vec<WireTimestamp>,
}

#[derive(Deserialize)]
struct WireTimestamp {
    character: String,
    start_time_s: f32,
    end_time_s: f32,
}

#[derive(Debug, Error)]
enum ChunkDecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base64 audio: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Lazy decoder over a line-oriented TTS response stream.
///
/// Single-pass and non-restartable: once the source ends or the transport
/// fails, the iterator is fused.
pub struct TtsStreamDecoder<R: BufRead> {
    lines: Lines<R>,
    finished: bool,
}

impl<R: BufRead> TtsStreamDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            finished: false,
        }
    }

    /// Move decoding onto a dedicated thread, returning the receiving end.
    ///
    /// Playback of already-emitted chunks can then proceed while later
    /// chunks are still being decoded. The thread exits when the stream
    /// ends or the receiver is dropped.
    pub fn spawn_into_channel(self) -> mpsc::Receiver<Result<AudioChunk, TtsStreamError>>
    where
        R: Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("tts-stream-decoder".into())
            .spawn(move || {
                for item in self {
                    if tx.send(item).is_err() {
                        break;
                    }
                }
            })
            .expect("failed to spawn decoder thread");
        rx
    }
}

impl<R: BufRead> Iterator for TtsStreamDecoder<R> {
    type Item = Result<AudioChunk, TtsStreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let line = match self.lines.next() {
                None => {
                    self.finished = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(TtsStreamError::Transport(e)));
                }
                Some(Ok(line)) => line,
            };

            if line.trim().is_empty() {
                continue;
            }

            match decode_line(&line) {
                Ok(chunk) => return Some(Ok(chunk)),
                Err(e) => {
                    log::warn!("skipping malformed TTS chunk: {}", e);
                    continue;
                }
            }
        }
    }
}

fn decode_line(line: &str) -> Result<AudioChunk, ChunkDecodeError> {
    let wire: WireChunk = serde_json::from_str(line)?;
    let audio = BASE64.decode(wire.audio.as_bytes())?;
    let timestamps = wire
        .timestamps
        .into_iter()
        .map(|t| CharacterTimestamp {
            character: t.character,
            start_time_s: t.start_time_s,
            end_time_s: t.end_time_s,
        })
        .collect();
    Ok(AudioChunk { audio, timestamps })
}
