//! Single-stream HTTP GET (servers without byte-range support).
//!
//! Writes the response body straight to the output path; there are no
//! segment files and no merge.

use std::path::Path;

use super::stream::stream_body;
use super::{FetchContext, FetchOutcome};
use crate::error::{DownloadError, Result};
use crate::storage::open_segment_file;

/// Downloads the whole resource into `output` with one plain GET.
/// `expected_len` (from HEAD) is enforced when known.
pub(super) fn fetch_whole(
    ctx: &FetchContext<'_>,
    output: &Path,
    expected_len: Option<u64>,
) -> Result<FetchOutcome> {
    let mut file = open_segment_file(output, false)?;
    let streamed = stream_body(ctx, None, output, &mut file, None)?;
    if streamed.cancelled {
        tracing::info!(received = streamed.received, "whole-file download interrupted");
        return Ok(FetchOutcome::Cancelled);
    }
    if let Some(expected) = expected_len {
        if streamed.received != expected {
            return Err(DownloadError::PartialTransfer {
                path: output.to_path_buf(),
                expected,
                received: streamed.received,
            });
        }
    }
    Ok(FetchOutcome::Completed)
}
