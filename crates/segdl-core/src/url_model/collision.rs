//! Picking an output path that does not overwrite an existing file.

use std::path::{Path, PathBuf};

/// Returns `desired` if nothing exists there, else the first free
/// `stem(n).ext` sibling for n = 1, 2, ...
///
/// In resume mode `desired` is returned untouched: the download must land on
/// the exact files a paused attempt left behind. The check is best effort and
/// is not repeated before the output is written.
pub fn resolve_output_path(desired: &Path, resume: bool) -> PathBuf {
    if resume || !desired.exists() {
        return desired.to_path_buf();
    }

    let stem = desired
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = desired
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let dir = desired.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 1u32;
    loop {
        tracing::debug!(path = %desired.display(), "output exists, trying suffix ({counter})");
        let candidate = dir.join(format!("{stem}({counter}){ext}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
