//! Core segmented downloader engine.
//!
//! Splits the resource into N ranges, reconciles them with segment files left
//! by a paused run, fetches every range on its own thread and merges the parts
//! in order once all of them are complete. Servers without byte-range support
//! get one plain GET instead.

mod segment;
mod single;
mod stream;

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::control::CancelToken;
use crate::error::{DownloadError, Result};
use crate::progress::ProgressSink;
use crate::segmenter::{part_path, plan_segments, Segment};
use crate::storage::{merge_segments, on_disk_len};

/// libcurl knobs shared by the probe and every GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurlOptions {
    /// Receive buffer and copy chunk size in bytes.
    pub buffer_size: usize,
    /// Connection establishment limit. There is no limit on reads.
    pub connect_timeout: Duration,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            buffer_size: 32 * 1024,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// Everything a worker needs, borrowed from the orchestrating thread.
pub(crate) struct FetchContext<'a> {
    pub url: &'a str,
    pub curl: CurlOptions,
    pub token: &'a CancelToken,
    pub progress: &'a dyn ProgressSink,
}

/// How a fetch (or a whole download) ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Completed,
    /// Stopped by the cancellation token; on-disk state is resumable.
    Cancelled,
}

/// A segment paired with the portion still to fetch and its file.
#[derive(Debug, Clone)]
struct SegmentJob {
    remaining: Segment,
    path: PathBuf,
}

/// Stats every expected segment file and folds its size into the segment's
/// start and into progress. Without `resume` nothing is read from disk.
fn reconcile(
    output: &Path,
    segments: &[Segment],
    resume: bool,
    progress: &dyn ProgressSink,
) -> Result<Vec<SegmentJob>> {
    segments
        .iter()
        .map(|segment| {
            let path = part_path(output, segment.ordinal);
            let on_disk = if resume { on_disk_len(&path)? } else { 0 };
            if on_disk > segment.len() {
                return Err(DownloadError::SegmentOversized {
                    path,
                    on_disk,
                    expected: segment.len(),
                });
            }
            if on_disk > 0 {
                tracing::debug!(ordinal = segment.ordinal, on_disk, "resuming segment");
                progress.add(on_disk);
            }
            Ok(SegmentJob {
                remaining: segment.remaining(on_disk),
                path,
            })
        })
        .collect()
}

/// Downloads `total` bytes as `concurrency` ranges into `<output>.part<N>`
/// files and merges them into `output` unless the token was cancelled.
///
/// All segments run at once, one thread each, and are joined before anything
/// else happens. The first failing segment cancels the token so its siblings
/// stop early; its error is returned. Errors take precedence over a pause.
pub(crate) fn download_segments(
    ctx: &FetchContext<'_>,
    output: &Path,
    total: u64,
    concurrency: usize,
    resume: bool,
) -> Result<FetchOutcome> {
    let segments = plan_segments(total, concurrency);
    tracing::info!(
        total,
        segments = segments.len(),
        resume,
        "starting segmented download"
    );
    ctx.progress.begin(Some(total));
    let jobs = reconcile(output, &segments, resume, ctx.progress)?;

    let results: Vec<(usize, Result<FetchOutcome>)> = thread::scope(|scope| {
        let handles: Vec<_> = jobs
            .iter()
            .map(|job| {
                let handle = scope.spawn(move || {
                    let res = segment::fetch_segment(ctx, &job.remaining, &job.path, resume);
                    if res.is_err() {
                        ctx.token.cancel();
                    }
                    res
                });
                (job.remaining.ordinal, handle)
            })
            .collect();
        handles
            .into_iter()
            .map(|(ordinal, handle)| {
                let res = handle
                    .join()
                    .unwrap_or(Err(DownloadError::WorkerPanicked { ordinal }));
                (ordinal, res)
            })
            .collect()
    });

    let mut cancelled = ctx.token.is_cancelled();
    for (ordinal, res) in results {
        match res {
            Ok(FetchOutcome::Completed) => {}
            Ok(FetchOutcome::Cancelled) => cancelled = true,
            Err(e) => {
                tracing::warn!(ordinal, error = %e, "segment failed");
                return Err(e);
            }
        }
    }
    if cancelled {
        tracing::info!("download paused, segment files kept for resume");
        return Ok(FetchOutcome::Cancelled);
    }

    let parts: Vec<PathBuf> = jobs.into_iter().map(|job| job.path).collect();
    let merged = merge_segments(output, &parts)?;
    tracing::info!(bytes = merged, output = %output.display(), "merge complete");
    Ok(FetchOutcome::Completed)
}

/// Downloads the resource with one plain GET straight into `output`.
/// Resuming is impossible without byte ranges and is rejected up front.
pub(crate) fn download_whole(
    ctx: &FetchContext<'_>,
    output: &Path,
    length_hint: Option<u64>,
    resume: bool,
) -> Result<FetchOutcome> {
    if resume {
        return Err(DownloadError::ResumeUnsupported);
    }
    tracing::info!(length = ?length_hint, "server does not accept ranges, single GET");
    ctx.progress.begin(length_hint);
    single::fetch_whole(ctx, output, length_hint)
}
