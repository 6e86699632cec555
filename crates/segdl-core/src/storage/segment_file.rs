//! Opening and measuring per-segment files.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{DownloadError, Result};

/// Open a segment (or whole-file) target for sequential writing.
///
/// With `append` the existing bytes are kept and new data lands after them;
/// otherwise the file is created or truncated.
pub fn open_segment_file(path: &Path, append: bool) -> Result<File> {
    let mut opts = File::options();
    opts.create(true);
    if append {
        opts.append(true);
    } else {
        opts.write(true).truncate(true);
    }
    opts.open(path).map_err(|e| DownloadError::io(path, e))
}

/// Bytes already persisted at `path`; 0 when the file does not exist.
pub fn on_disk_len(path: &Path) -> Result<u64> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.len()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
        Err(e) => Err(DownloadError::io(path, e)),
    }
}
