//! Download session: configuration, pause/resume lifecycle and progress.
//!
//! A [`Session`] is shared between the thread that runs [`Session::download`]
//! and whoever may call [`Session::pause`] (a signal handler, a UI, a test).
//! Each download invocation probes the server, picks segmented or whole-file
//! mode and runs to completion, pause or failure.

mod options;

pub use options::SessionConfig;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::control::CancelToken;
use crate::downloader::{self, CurlOptions, FetchContext, FetchOutcome};
use crate::error::{DownloadError, Result};
use crate::fetch_head::{self, Capability};
use crate::progress::{ProgressSink, TransferProgress};
use crate::url_model;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, download not started yet.
    Idle,
    Running,
    /// Stopped by [`Session::pause`]; segment files are kept for resume.
    Paused,
    Completed,
    Failed,
}

/// One download, possibly spread over several pause/resume cycles.
///
/// Running two downloads on the same session at once is not supported.
pub struct Session {
    config: SessionConfig,
    output: PathBuf,
    curl: CurlOptions,
    resume: AtomicBool,
    paused: AtomicBool,
    ranged: AtomicBool,
    state: Mutex<SessionState>,
    token: Mutex<CancelToken>,
    progress: Arc<dyn ProgressSink>,
}

impl Session {
    /// Validates `config` and fixes the output path, with a private progress counter.
    pub fn new(config: SessionConfig) -> Result<Self> {
        Self::with_progress(config, Arc::new(TransferProgress::new()))
    }

    /// Like [`Session::new`] but reports bytes to `progress`.
    ///
    /// Outside resume mode an existing file at the output path is never
    /// overwritten: the name gets a `(n)` suffix instead.
    pub fn with_progress(config: SessionConfig, progress: Arc<dyn ProgressSink>) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(DownloadError::EmptyUrl);
        }
        let config = config.normalized();
        let filename = config
            .filename
            .clone()
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| url_model::derive_filename(&config.url));
        let output =
            url_model::resolve_output_path(&config.output_dir.join(filename), config.resume);
        tracing::info!(
            url = %config.url,
            output = %output.display(),
            concurrency = config.concurrency,
            resume = config.resume,
            "session created"
        );

        Ok(Self {
            curl: config.curl_options(),
            resume: AtomicBool::new(config.resume),
            config,
            output,
            paused: AtomicBool::new(false),
            ranged: AtomicBool::new(false),
            state: Mutex::new(SessionState::Idle),
            token: Mutex::new(CancelToken::new()),
            progress,
        })
    }

    /// Runs one download invocation and blocks until it completes, is paused
    /// or fails.
    ///
    /// A fresh cancellation token is created first, so a pause issued before
    /// this call does not carry over. When the result is
    /// [`FetchOutcome::Cancelled`] the session is paused and can be resumed.
    pub fn download(&self) -> Result<FetchOutcome> {
        let token = {
            let mut current = self.lock_token();
            *current = CancelToken::new();
            self.paused.store(false, Ordering::SeqCst);
            self.set_state(SessionState::Running);
            current.clone()
        };

        let result = self.run(&token);

        let _guard = self.lock_token();
        let state = match &result {
            Ok(FetchOutcome::Completed) => {
                // A pause that lost the race with the merge has nothing left to stop.
                self.paused.store(false, Ordering::SeqCst);
                SessionState::Completed
            }
            Ok(FetchOutcome::Cancelled) => {
                self.paused.store(true, Ordering::SeqCst);
                SessionState::Paused
            }
            Err(e) => {
                tracing::error!(error = %e, "download failed");
                SessionState::Failed
            }
        };
        self.set_state(state);
        result
    }

    /// Stops every segment at its next chunk boundary. Only has an effect on a
    /// running download; otherwise it just sets the paused flag.
    pub fn pause(&self) {
        let token = self.lock_token();
        self.paused.store(true, Ordering::SeqCst);
        token.cancel();
        tracing::info!(state = ?self.state(), "pause requested");
    }

    /// Continues a paused download from the segment files on disk.
    pub fn resume(&self) -> Result<FetchOutcome> {
        self.resume.store(true, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
        tracing::info!(output = %self.output.display(), "resuming");
        self.download()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Whether the last probe found a server that accepts byte ranges, i.e.
    /// whether a pause can be continued with [`Session::resume`]. False until
    /// a download has probed the server.
    pub fn can_resume(&self) -> bool {
        self.ranged.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolved output path (after collision handling).
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Completion of the current invocation in [0.0, 1.0].
    pub fn progress_fraction(&self) -> f64 {
        self.progress.fraction()
    }

    fn run(&self, token: &CancelToken) -> Result<FetchOutcome> {
        let head_url = self.config.head_url.as_deref().unwrap_or(&self.config.url);
        let capability = fetch_head::probe(head_url, &self.curl)?.capability(head_url)?;
        self.ranged.store(
            matches!(capability, Capability::Ranged { .. }),
            Ordering::SeqCst,
        );
        let resume = self.resume.load(Ordering::SeqCst);
        let ctx = FetchContext {
            url: &self.config.url,
            curl: self.curl,
            token,
            progress: self.progress.as_ref(),
        };

        match capability {
            Capability::Ranged { total } => downloader::download_segments(
                &ctx,
                &self.output,
                total,
                self.config.concurrency,
                resume,
            ),
            Capability::Whole { length_hint } => {
                downloader::download_whole(&ctx, &self.output, length_hint, resume)
            }
        }
    }

    fn set_state(&self, next: SessionState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != next {
            tracing::debug!(from = ?*state, to = ?next, "session state");
            *state = next;
        }
    }

    fn lock_token(&self) -> MutexGuard<'_, CancelToken> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
