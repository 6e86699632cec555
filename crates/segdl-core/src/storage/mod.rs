//! Disk I/O and file lifecycle.
//!
//! Segment files are written sequentially by their own worker (truncated for a
//! fresh download, appended to when resuming), measured on resume, and finally
//! concatenated in order into the output by [`merge_segments`].

mod merge;
mod segment_file;

pub use merge::merge_segments;
pub use segment_file::{on_disk_len, open_segment_file};
