//! Per-download configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::SegdlConfig;
use crate::downloader::CurlOptions;

/// Settings for one download session. Fixed once the session exists, except
/// the resume flag which [`super::Session::resume`] turns on.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Resource to download.
    pub url: String,
    /// Separate URL for the HEAD probe (None = `url`).
    pub head_url: Option<String>,
    /// Number of segments; values below 1 are treated as 1.
    pub concurrency: usize,
    /// Directory the output lands in.
    pub output_dir: PathBuf,
    /// Output filename (None = derived from the URL).
    pub filename: Option<String>,
    /// Copy chunk size in bytes; 0 selects the default.
    pub copy_buffer_size: usize,
    pub connect_timeout: Duration,
    /// Treat existing segment files as progress instead of overwriting them.
    pub resume: bool,
}

impl SessionConfig {
    /// Config for `url` with built-in defaults, writing to the current directory.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_defaults(url, &SegdlConfig::default())
    }

    /// Config for `url` seeded from the user's config file.
    pub fn with_defaults(url: impl Into<String>, defaults: &SegdlConfig) -> Self {
        Self {
            url: url.into(),
            head_url: None,
            concurrency: defaults.concurrency,
            output_dir: defaults.output_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            filename: None,
            copy_buffer_size: defaults.copy_buffer_size,
            connect_timeout: Duration::from_secs(defaults.connect_timeout_secs),
            resume: false,
        }
    }

    pub fn head_url(mut self, head_url: impl Into<String>) -> Self {
        self.head_url = Some(head_url.into());
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn filename(mut self, name: impl Into<String>) -> Self {
        self.filename = Some(name.into());
        self
    }

    pub fn copy_buffer_size(mut self, bytes: usize) -> Self {
        self.copy_buffer_size = bytes;
        self
    }

    pub fn resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Clamps concurrency and fills in defaulted fields.
    pub(super) fn normalized(mut self) -> Self {
        if self.concurrency < 1 {
            tracing::info!("concurrency level: 1");
            self.concurrency = 1;
        }
        if self.copy_buffer_size == 0 {
            self.copy_buffer_size = CurlOptions::default().buffer_size;
        }
        if self.head_url.as_deref().map_or(true, str::is_empty) {
            self.head_url = Some(self.url.clone());
        }
        self
    }

    pub(super) fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            buffer_size: self.copy_buffer_size,
            connect_timeout: self.connect_timeout,
        }
    }
}
