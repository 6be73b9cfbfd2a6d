//! Mono 8-bit WAV export.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::engine::Clip;
use crate::io::{write_with_retry, WRITE_ATTEMPTS};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing {} failed after {attempts} attempts: {source}", path.display())]
    Write {
        path: PathBuf,
        attempts: u32,
        source: std::io::Error,
    },
}

/// Encode a clip as a complete WAV image: standard 44-byte RIFF/WAVE header,
/// then the data chunk. WAV stores 8-bit audio unsigned, so the signed
/// samples are rebiased by +128 on the way out.
pub fn encode_clip(clip: &Clip) -> Vec<u8> {
    let channels: u16 = 1;
    let bits_per_sample: u16 = 8;
    let sample_rate = clip.sample_rate();
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = channels * (bits_per_sample / 8);
    let data_size = clip.len() as u32;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + clip.len());

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &sample in clip.samples() {
        buf.push((sample as u8).wrapping_add(128));
    }

    buf
}

/// Write a clip to disk, retrying transient failures a bounded number of
/// times.
pub fn write_clip(path: impl AsRef<Path>, clip: &Clip) -> Result<(), ExportError> {
    let path = path.as_ref();
    let bytes = encode_clip(clip);
    write_with_retry(path, &bytes, WRITE_ATTEMPTS).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        attempts: WRITE_ATTEMPTS,
        source,
    })
}
