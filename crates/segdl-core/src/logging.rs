//! Logging init: append to a file under the XDG state dir, or stderr when that
//! is not writable.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: engine internals at debug, the rest at info.
const DEFAULT_FILTER: &str = "info,segdl_core=debug,segdl=debug";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// `~/.local/state/segdl/segdl.log`, creating the directory if needed.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("segdl")?;
    let path = xdg_dirs
        .place_state_file("segdl.log")
        .context("cannot create state directory")?;
    Ok(path)
}

/// Install the global subscriber writing to [`log_file_path`].
/// Returns the log path; on error the caller should fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_FILTER))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("logging already initialized: {e}"))?;

    tracing::info!("segdl logging initialized at {}", path.display());
    Ok(path)
}

/// Stderr-only logging, warnings and errors unless `RUST_LOG` says otherwise,
/// so it does not interleave with progress output.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
