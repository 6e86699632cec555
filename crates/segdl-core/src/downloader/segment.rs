//! Single-segment HTTP Range GET into its own `.part<N>` file.

use std::path::Path;

use super::stream::stream_body;
use super::{FetchContext, FetchOutcome};
use crate::error::{DownloadError, Result};
use crate::segmenter::Segment;
use crate::storage::open_segment_file;

/// Downloads `segment` (already shortened by any bytes found on disk) into
/// `path`, appending when `append` is set.
///
/// The file is opened even for an empty segment so the merge always finds
/// every part. Stops without error on cancellation; whatever was written is
/// valid resumable state.
pub(super) fn fetch_segment(
    ctx: &FetchContext<'_>,
    segment: &Segment,
    path: &Path,
    append: bool,
) -> Result<FetchOutcome> {
    let mut file = open_segment_file(path, append)?;
    let Some(range) = segment.curl_range() else {
        tracing::debug!(ordinal = segment.ordinal, "segment already complete");
        return Ok(FetchOutcome::Completed);
    };
    if ctx.token.is_cancelled() {
        return Ok(FetchOutcome::Cancelled);
    }

    let expected = segment.len();
    tracing::debug!(ordinal = segment.ordinal, range = %range, "segment GET");
    let streamed = stream_body(ctx, Some(range.as_str()), path, &mut file, Some(expected))?;

    if streamed.cancelled {
        tracing::debug!(
            ordinal = segment.ordinal,
            received = streamed.received,
            "segment paused"
        );
        return Ok(FetchOutcome::Cancelled);
    }
    if streamed.received != expected {
        return Err(DownloadError::PartialTransfer {
            path: path.to_path_buf(),
            expected,
            received: streamed.received,
        });
    }
    Ok(FetchOutcome::Completed)
}
