//! Segment type and range planning.

use std::path::{Path, PathBuf};

/// One segment of the remote resource: byte range [start, end) (half-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// 1-based position; also the suffix of the segment file (`.part<ordinal>`).
    pub ordinal: usize,
    /// Start offset (inclusive).
    pub start: u64,
    /// End offset (exclusive).
    pub end: u64,
}

impl Segment {
    /// Length of this segment in bytes.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// HTTP Range header value (inclusive end): `bytes=start-(end-1)`.
    /// `None` for an empty segment, which has no valid byte range.
    pub fn range_header_value(&self) -> Option<String> {
        self.curl_range().map(|range| format!("bytes={}", range))
    }

    /// Range in the form curl's `CURLOPT_RANGE` expects: `start-(end-1)`.
    /// `None` for an empty segment.
    pub fn curl_range(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(format!("{}-{}", self.start, self.end - 1))
    }

    /// The part of this segment still missing when `on_disk` bytes are already
    /// persisted. Empty once the segment is complete.
    pub fn remaining(&self, on_disk: u64) -> Segment {
        Segment {
            ordinal: self.ordinal,
            start: self.start.saturating_add(on_disk).min(self.end),
            end: self.end,
        }
    }
}

/// Builds the segment plan for `total_size` bytes split `segment_count` ways.
///
/// Every segment gets `total_size / segment_count` bytes and the last one
/// absorbs the remainder, so the plan covers [0, total_size) exactly. When
/// the size is smaller than the count, leading segments are empty.
/// A count of 0 is treated as 1.
pub fn plan_segments(total_size: u64, segment_count: usize) -> Vec<Segment> {
    let count = segment_count.max(1);
    let part_size = total_size / count as u64;

    (1..=count)
        .map(|ordinal| {
            let start = (ordinal as u64 - 1) * part_size;
            let end = if ordinal == count {
                total_size
            } else {
                ordinal as u64 * part_size
            };
            Segment {
                ordinal,
                start,
                end,
            }
        })
        .collect()
}

/// Path of a segment file: `<output>.part<ordinal>` (e.g. `file.iso.part3`).
pub fn part_path(output: &Path, ordinal: usize) -> PathBuf {
    let mut o = output.as_os_str().to_owned();
    o.push(format!(".part{}", ordinal));
    PathBuf::from(o)
}
