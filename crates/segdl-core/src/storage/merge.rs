//! Ordered concatenation of segment files into the final output.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{DownloadError, Result};

/// Writes `parts` into `output` strictly in the given order, deleting each
/// part once its bytes are copied.
///
/// Callers must only merge after every segment has been fully fetched; an
/// incomplete part yields a corrupt output and is not detected here.
pub fn merge_segments(output: &Path, parts: &[PathBuf]) -> Result<u64> {
    let mut destination = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(output)
        .map_err(|e| DownloadError::io(output, e))?;

    let mut total = 0u64;
    for part in parts {
        let mut source = File::open(part).map_err(|e| DownloadError::io(part, e))?;
        let copied = io::copy(&mut source, &mut destination)
            .map_err(|e| DownloadError::io(output, e))?;
        drop(source);
        std::fs::remove_file(part).map_err(|e| DownloadError::io(part, e))?;
        tracing::debug!(part = %part.display(), bytes = copied, "merged segment");
        total += copied;
    }

    destination
        .sync_all()
        .map_err(|e| DownloadError::io(output, e))?;
    Ok(total)
}
