//! One curl GET streamed into an open file, chunk by chunk, with cancellation.

use std::cell::Cell;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::str;

use super::FetchContext;
use crate::error::{DownloadError, Result};
use crate::fetch_head::status_code;

/// What a finished (or interrupted) stream left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Streamed {
    /// Bytes appended to the file by this call.
    pub received: u64,
    /// True when the shared token stopped the transfer early.
    pub cancelled: bool,
}

/// GETs `ctx.url` (restricted to `range` when given, in curl's `start-end`
/// form) and writes the body to `file` in `buffer_size` chunks.
///
/// The token is checked before every chunk and from curl's progress callback,
/// so an idle connection also notices a pause. Progress is credited after each
/// chunk lands on disk. With a `range`, the final response must be `206`
/// before a single byte is written; anything else is [`DownloadError::RangeIgnored`].
/// `limit` caps the body so it never runs past the segment.
pub(super) fn stream_body(
    ctx: &FetchContext<'_>,
    range: Option<&str>,
    path: &Path,
    file: &mut File,
    limit: Option<u64>,
) -> Result<Streamed> {
    let transfer_err = |source| DownloadError::Transfer {
        url: ctx.url.to_string(),
        source,
    };

    let mut easy = curl::easy::Easy::new();
    easy.url(ctx.url).map_err(transfer_err)?;
    easy.follow_location(true).map_err(transfer_err)?;
    easy.fail_on_error(true).map_err(transfer_err)?;
    easy.connect_timeout(ctx.curl.connect_timeout)
        .map_err(transfer_err)?;
    easy.buffer_size(ctx.curl.buffer_size)
        .map_err(transfer_err)?;
    if let Some(range) = range {
        easy.range(range).map_err(transfer_err)?;
    }
    easy.progress(true).map_err(transfer_err)?;

    let chunk_size = ctx.curl.buffer_size.max(1);
    let mut received = 0u64;
    let status = Cell::new(0u32);
    let mut ignored_status: Option<u32> = None;
    let mut overflow = false;
    let mut write_error: Option<io::Error> = None;

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|line| {
                // Each redirect hop starts with its own status line.
                if let Some(code) = str::from_utf8(line).ok().and_then(status_code) {
                    status.set(code);
                }
                true
            })
            .map_err(transfer_err)?;
        transfer
            .write_function(|data| {
                if range.is_some() && status.get() != 206 {
                    ignored_status = Some(status.get());
                    return Ok(0);
                }
                for chunk in data.chunks(chunk_size) {
                    if ctx.token.is_cancelled() {
                        return Ok(0);
                    }
                    let len = chunk.len() as u64;
                    if limit.is_some_and(|max| received + len > max) {
                        overflow = true;
                        return Ok(0);
                    }
                    if let Err(e) = file.write_all(chunk) {
                        write_error = Some(e);
                        return Ok(0);
                    }
                    received += len;
                    ctx.progress.add(len);
                }
                Ok(data.len())
            })
            .map_err(transfer_err)?;
        transfer
            .progress_function(|_, _, _, _| !ctx.token.is_cancelled())
            .map_err(transfer_err)?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if let Some(source) = write_error {
            return Err(DownloadError::io(path, source));
        }
        if let Some(status) = ignored_status {
            return Err(DownloadError::RangeIgnored {
                url: ctx.url.to_string(),
                status,
                path: path.to_path_buf(),
            });
        }
        if overflow {
            return Err(DownloadError::RangeOverflow {
                path: path.to_path_buf(),
                expected: limit.unwrap_or_default(),
            });
        }
        if ctx.token.is_cancelled() {
            return Ok(Streamed {
                received,
                cancelled: true,
            });
        }
        if e.is_http_returned_error() {
            let status = easy.response_code().unwrap_or_default();
            return Err(DownloadError::Http {
                url: ctx.url.to_string(),
                status,
            });
        }
        return Err(transfer_err(e));
    }

    Ok(Streamed {
        received,
        cancelled: false,
    })
}
