//! Periodic progress line on stdout.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use segdl_core::{ProgressStats, TransferProgress};

const PROGRESS_INTERVAL_MS: u64 = 500;

/// Prints a progress line every interval until the task is aborted.
pub async fn run_reporter(progress: Arc<TransferProgress>) {
    let mut ticker = tokio::time::interval(Duration::from_millis(PROGRESS_INTERVAL_MS));
    loop {
        ticker.tick().await;
        print!("\r{}", format_line(&progress.snapshot()));
        let _ = std::io::stdout().flush();
    }
}

pub fn format_line(stats: &ProgressStats) -> String {
    let done_mib = stats.bytes_done as f64 / 1_048_576.0;
    let rate_mib = stats.bytes_per_sec() / 1_048_576.0;
    match stats.total_bytes {
        Some(total) => {
            let eta = stats
                .eta_secs()
                .map(|s| format!("{:.0}s", s))
                .unwrap_or_else(|| "?".to_string());
            format!(
                "  {:.1} / {:.1} MiB ({:.1}%)  {:.2} MiB/s  ETA {}  ",
                done_mib,
                total as f64 / 1_048_576.0,
                stats.fraction() * 100.0,
                rate_mib,
                eta
            )
        }
        None => format!("  {:.1} MiB  {:.2} MiB/s  ", done_mib, rate_mib),
    }
}
