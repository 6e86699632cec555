//! CLI for the segdl downloader.

mod report;

use anyhow::Result;
use clap::Parser;
use segdl_core::config::{self, SegdlConfig};
use segdl_core::{FetchOutcome, Session, SessionConfig, TransferProgress};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Download one file over HTTP, split into concurrent byte ranges.
#[derive(Debug, Parser)]
#[command(name = "segdl")]
#[command(about = "segdl: segmented HTTP downloader with pause and resume", long_about = None)]
pub struct Cli {
    /// Direct HTTP/HTTPS URL to download.
    #[arg(short = 'u', long)]
    pub url: String,

    /// Probe this URL with HEAD instead of the download URL.
    #[arg(long, value_name = "URL")]
    pub head_url: Option<String>,

    /// Number of segments downloaded in parallel (config default when omitted).
    #[arg(short = 'n', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Output directory.
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output file name (derived from the URL when omitted).
    #[arg(short = 'f', long)]
    pub filename: Option<String>,

    /// Bytes copied from the response body per chunk.
    #[arg(long, value_name = "BYTES")]
    pub buffer_size: Option<usize>,

    /// Continue a paused download from the segment files on disk.
    #[arg(long)]
    pub resume: bool,
}

impl Cli {
    /// Session settings: config file defaults overridden by flags.
    pub fn session_config(&self, defaults: &SegdlConfig) -> SessionConfig {
        let mut cfg = SessionConfig::with_defaults(self.url.clone(), defaults).resume(self.resume);
        if let Some(head_url) = &self.head_url {
            cfg = cfg.head_url(head_url.clone());
        }
        if let Some(n) = self.concurrency {
            cfg = cfg.concurrency(n);
        }
        if let Some(dir) = &self.output_dir {
            cfg = cfg.output_dir(dir.clone());
        }
        if let Some(name) = &self.filename {
            cfg = cfg.filename(name.clone());
        }
        if let Some(bytes) = self.buffer_size {
            cfg = cfg.copy_buffer_size(bytes);
        }
        cfg
    }
}

pub async fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    let progress = Arc::new(TransferProgress::new());
    let session = Arc::new(Session::with_progress(
        cli.session_config(&cfg),
        progress.clone(),
    )?);
    println!("Output file: {}", session.output_path().display());

    // First Ctrl-C pauses; a second one gives up on a transfer stuck in a read.
    let pauser = Arc::clone(&session);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nExiting ...");
            pauser.pause();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    let reporter = tokio::spawn(report::run_reporter(progress.clone()));
    let worker = Arc::clone(&session);
    let result = tokio::task::spawn_blocking(move || worker.download()).await?;
    reporter.abort();
    println!("\r{}", report::format_line(&progress.snapshot()));

    let outcome = result?;
    println!(
        "{}",
        outcome_message(outcome, session.can_resume(), session.output_path())
    );
    Ok(())
}

/// Final line for a download that did not fail.
fn outcome_message(outcome: FetchOutcome, resumable: bool, output: &Path) -> String {
    match outcome {
        FetchOutcome::Completed => format!("Download completed: {}", output.display()),
        FetchOutcome::Cancelled if resumable => {
            "Download has paused. Resume it again with the --resume flag.".to_string()
        }
        FetchOutcome::Cancelled => format!(
            "Download stopped. The server does not accept byte ranges, so {} cannot be resumed.",
            output.display()
        ),
    }
}
