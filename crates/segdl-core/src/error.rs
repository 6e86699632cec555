//! Error type shared by the probe, the segment workers, the merger and the session.

use std::path::PathBuf;

use thiserror::Error;

/// Every failure that ends a download invocation. None of them are retried;
/// a deliberate pause is reported as an outcome, never as an error.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Session was constructed without a source URL.
    #[error("url is empty")]
    EmptyUrl,

    /// HEAD request could not be performed (DNS, connect, protocol).
    #[error("HEAD {url} failed: {source}")]
    Probe {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Server advertised byte ranges but no numeric `Content-Length`.
    #[error("HEAD {url}: missing or non-numeric Content-Length")]
    InvalidContentLength { url: String },

    /// GET returned an HTTP error status.
    #[error("GET {url} returned HTTP {status}")]
    Http { url: String, status: u32 },

    /// Transport failure while a body was being received.
    #[error("transfer of {url} failed: {source}")]
    Transfer {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Body ended before the requested range was filled.
    #[error("partial transfer into {path}: expected {expected} bytes, got {received}")]
    PartialTransfer {
        path: PathBuf,
        expected: u64,
        received: u64,
    },

    /// A ranged GET was answered with something other than `206 Partial
    /// Content`, so the body does not start at the requested offset.
    #[error("GET {url} ignored the Range header (HTTP {status}), nothing written to {path}")]
    RangeIgnored {
        url: String,
        status: u32,
        path: PathBuf,
    },

    /// Body carried more bytes than the requested range.
    #[error("server sent more than the {expected} bytes requested for {path}")]
    RangeOverflow { path: PathBuf, expected: u64 },

    /// Local filesystem failure (segment file, output file, resume stat).
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Resume requested but the server cannot serve partial content.
    #[error("cannot resume: server does not accept byte ranges, download must start over")]
    ResumeUnsupported,

    /// A segment file left on disk is longer than the range it belongs to.
    #[error("segment file {path} holds {on_disk} bytes but its range is only {expected}")]
    SegmentOversized {
        path: PathBuf,
        on_disk: u64,
        expected: u64,
    },

    /// A segment worker thread panicked.
    #[error("segment {ordinal} worker panicked")]
    WorkerPanicked { ordinal: usize },
}

impl DownloadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DownloadError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DownloadError>;
