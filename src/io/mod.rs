// Purpose - external interfaces: audio export and playback

#[cfg(feature = "playback")]
pub mod playback;
pub mod wav;

use std::fs;
use std::io;
use std::path::Path;

use tracing::warn;

/// File writes at the export/persistence boundary are retried a bounded
/// number of times before the failure surfaces.
pub(crate) const WRITE_ATTEMPTS: u32 = 3;

pub(crate) fn write_with_retry(path: &Path, bytes: &[u8], attempts: u32) -> io::Result<()> {
    let mut attempt = 1;
    loop {
        match fs::write(path, bytes) {
            Ok(()) => return Ok(()),
            Err(err) if attempt >= attempts => return Err(err),
            Err(err) => {
                warn!(attempt, path = %path.display(), "write failed, retrying: {err}");
                attempt += 1;
            }
        }
    }
}

pub(crate) fn read_with_retry(path: &Path, attempts: u32) -> io::Result<Vec<u8>> {
    let mut attempt = 1;
    loop {
        match fs::read(path) {
            Ok(bytes) => return Ok(bytes),
            Err(err) if attempt >= attempts => return Err(err),
            Err(err) => {
                warn!(attempt, path = %path.display(), "read failed, retrying: {err}");
                attempt += 1;
            }
        }
    }
}
