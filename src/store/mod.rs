//! Wholesale bank persistence.
//!
//! All 256 patches are written and read as one flat binary image; there is
//! no per-bank file or partial update. Loading sanitizes every patch so a
//! corrupted or hand-edited image can only produce in-range parameters, never
//! a panic downstream.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::io::{read_with_retry, write_with_retry, WRITE_ATTEMPTS};
use crate::patch::PatchBank;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bank file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("bank image codec failure: {0}")]
    Codec(#[from] bincode::Error),
}

/// Write the whole bank image, retrying transient failures a bounded number
/// of times.
pub fn save(path: impl AsRef<Path>, banks: &PatchBank) -> Result<(), StoreError> {
    let path = path.as_ref();
    let bytes = bincode::serialize(banks)?;
    debug!(path = %path.display(), len = bytes.len(), "saving bank image");
    write_with_retry(path, &bytes, WRITE_ATTEMPTS).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the whole bank image back, sanitizing every patch.
pub fn load(path: impl AsRef<Path>) -> Result<PatchBank, StoreError> {
    let path = path.as_ref();
    let bytes = read_with_retry(path, WRITE_ATTEMPTS).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut banks: PatchBank = bincode::deserialize(&bytes)?;
    banks.sanitize();
    debug!(path = %path.display(), "loaded bank image");
    Ok(banks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{DialId, OscId, OscParam};

    #[test]
    fn bank_image_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bank.save");

        let mut banks = PatchBank::new();
        let patch = banks.patch_mut(42);
        patch.set_dial(DialId::Osc(OscId::Osc1, OscParam::Frequency), 0.25);
        patch.set_section_len(17);
        patch.set_envelope_point(100, 0.9);

        save(&path, &banks).expect("save");
        let restored = load(&path).expect("load");

        assert_eq!(restored, banks);
    }

    #[test]
    fn missing_file_surfaces_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load(dir.path().join("absent.save")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn garbage_image_surfaces_a_codec_error_not_a_panic() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bank.save");
        std::fs::write(&path, b"not a bank image").expect("write garbage");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Codec(_)));
    }

    #[test]
    fn loaded_patches_are_sanitized() {
        // A byte-compatible mirror of the bank layout lets this test forge an
        // image carrying values the setters would never allow.
        #[derive(serde::Serialize)]
        struct RawPatch {
            dials: Vec<f32>,
            am_slots: [u32; 10],
            mul_slots: [u32; 10],
            fm_slots: [u32; 10],
            envelope: Vec<f32>,
            section_len: u8,
        }

        let mut dials = vec![0.0f32; 50];
        dials[3] = 7.0; // unipolar dial far out of range
        dials[0] = f32::NAN;
        let raw = RawPatch {
            dials,
            am_slots: [0; 10],
            mul_slots: [0; 10],
            fm_slots: [0; 10],
            envelope: vec![5.0; 10], // wrong length and out of range
            section_len: 0,
        };
        let patches: Vec<&RawPatch> = (0..256).map(|_| &raw).collect();
        let bytes = bincode::serialize(&patches).expect("forge image");

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bank.save");
        std::fs::write(&path, bytes).expect("write image");

        let restored = load(&path).expect("load");
        let patch = restored.patch(0);
        assert_eq!(patch.section_len(), 1);
        assert_eq!(patch.envelope().len(), crate::patch::ENVELOPE_POINTS);
        assert!(patch.envelope().iter().all(|&v| (0.0..=1.0).contains(&v)));
        let shape = DialId::from_index(3).unwrap();
        assert_eq!(patch.dial(shape), 1.0);
        let freq = DialId::from_index(0).unwrap();
        assert_eq!(patch.dial(freq), 0.0);
    }
}
