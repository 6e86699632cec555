//! HTTP HEAD capability probing.
//!
//! Uses the curl crate (libcurl) to fetch response headers and decide whether
//! the resource can be fetched in byte ranges (`200`, `Accept-Ranges: bytes`)
//! and how large it is (`Content-Length`).

mod parse;

pub(crate) use parse::status_code;

use std::str;

use crate::downloader::CurlOptions;
use crate::error::{DownloadError, Result};

/// Key headers of a HEAD response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadResult {
    /// Status code of the final response (after redirects).
    pub status: u32,
    /// Total size in bytes, if `Content-Length` is present and numeric.
    pub content_length: Option<u64>,
    /// True if the server sent `Accept-Ranges: bytes`.
    pub accept_ranges: bool,
}

/// How the orchestrator may fetch the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Byte ranges are served; `total` drives the partition math.
    Ranged { total: u64 },
    /// Only a whole-file GET is possible; the length is a progress hint.
    Whole { length_hint: Option<u64> },
}

impl HeadResult {
    /// Classifies the response. A range-capable server without a numeric
    /// length is an error, never a silent fallback.
    pub fn capability(&self, url: &str) -> Result<Capability> {
        if self.status == 200 && self.accept_ranges {
            let total = self
                .content_length
                .ok_or_else(|| DownloadError::InvalidContentLength {
                    url: url.to_string(),
                })?;
            return Ok(Capability::Ranged { total });
        }
        let length_hint = if self.status == 200 {
            self.content_length
        } else {
            None
        };
        Ok(Capability::Whole { length_hint })
    }
}

/// Performs a HEAD request and returns parsed metadata.
///
/// Follows redirects; only the headers of the final response are kept. Any
/// status is returned as data, only transport failures are errors.
/// Blocks the current thread.
pub fn probe(url: &str, opts: &CurlOptions) -> Result<HeadResult> {
    let probe_err = |source| DownloadError::Probe {
        url: url.to_string(),
        source,
    };
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(probe_err)?;
    easy.nobody(true).map_err(probe_err)?; // HEAD request
    easy.follow_location(true).map_err(probe_err)?;
    easy.connect_timeout(opts.connect_timeout).map_err(probe_err)?;

    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(probe_err)?;
        transfer.perform().map_err(probe_err)?;
    }

    let status = easy.response_code().map_err(probe_err)?;
    let result = parse::parse_headers(status, &headers);
    tracing::debug!(
        url,
        status = result.status,
        content_length = ?result.content_length,
        accept_ranges = result.accept_ranges,
        "HEAD probe"
    );
    Ok(result)
}
