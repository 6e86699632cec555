//! Progress reporting for downloads (bytes done, ETA, rate).
//!
//! Segment workers credit bytes to a [`ProgressSink`] concurrently; readers
//! (the CLI reporter, a pause watcher) take [`ProgressStats`] snapshots at any
//! time without locking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// Receiver of byte counts from the download engine.
///
/// Implementations must tolerate `add` from many threads at once and
/// `fraction` concurrently with those calls.
pub trait ProgressSink: Send + Sync {
    /// Start a new invocation. `total` is `None` when the size is unknown.
    fn begin(&self, total: Option<u64>);

    /// Credit `bytes` newly written (or found on disk when resuming).
    fn add(&self, bytes: u64);

    /// Completion in [0.0, 1.0]; 0.0 while the total is unknown.
    fn fraction(&self) -> f64;
}

/// Lock-free default sink.
#[derive(Debug)]
pub struct TransferProgress {
    written: AtomicU64,
    // u64::MAX stands for "unknown".
    total: AtomicU64,
    started: Mutex<Option<Instant>>,
}

const UNKNOWN_TOTAL: u64 = u64::MAX;

impl Default for TransferProgress {
    fn default() -> Self {
        Self {
            written: AtomicU64::new(0),
            total: AtomicU64::new(UNKNOWN_TOTAL),
            started: Mutex::new(None),
        }
    }
}

impl TransferProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes_done(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    pub fn total_bytes(&self) -> Option<u64> {
        match self.total.load(Ordering::Relaxed) {
            UNKNOWN_TOTAL => None,
            n => Some(n),
        }
    }

    /// Point-in-time view for display.
    pub fn snapshot(&self) -> ProgressStats {
        let elapsed_secs = self
            .started
            .lock()
            .ok()
            .and_then(|s| *s)
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        ProgressStats {
            bytes_done: self.bytes_done(),
            total_bytes: self.total_bytes(),
            elapsed_secs,
        }
    }
}

impl ProgressSink for TransferProgress {
    fn begin(&self, total: Option<u64>) {
        self.written.store(0, Ordering::Relaxed);
        self.total
            .store(total.unwrap_or(UNKNOWN_TOTAL), Ordering::Relaxed);
        if let Ok(mut started) = self.started.lock() {
            *started = Some(Instant::now());
        }
    }

    fn add(&self, bytes: u64) {
        self.written.fetch_add(bytes, Ordering::Relaxed);
    }

    fn fraction(&self) -> f64 {
        self.snapshot().fraction()
    }
}

/// Snapshot of download progress (CLI-friendly).
#[derive(Debug, Clone)]
pub struct ProgressStats {
    /// Bytes on disk so far, including bytes found when resuming.
    pub bytes_done: u64,
    /// Total file size in bytes, if the server reported one.
    pub total_bytes: Option<u64>,
    /// Elapsed time since this invocation started (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// Average rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if the total or the rate is unknown).
    pub fn eta_secs(&self) -> Option<f64> {
        let total = self.total_bytes?;
        let remaining = total.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        match self.total_bytes {
            None => 0.0,
            Some(0) => 1.0,
            Some(total) => (self.bytes_done as f64 / total as f64).min(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn fraction_tracks_added_bytes() {
        let p = TransferProgress::new();
        p.begin(Some(1000));
        p.add(250);
        p.add(250);
        assert_eq!(p.bytes_done(), 500);
        assert!((p.fraction() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn unknown_total_reports_zero() {
        let p = TransferProgress::new();
        p.begin(None);
        p.add(10);
        assert_eq!(p.total_bytes(), None);
        assert_eq!(p.fraction(), 0.0);
        assert!(p.snapshot().eta_secs().is_none());
    }

    #[test]
    fn begin_resets_counter() {
        let p = TransferProgress::new();
        p.begin(Some(10));
        p.add(7);
        p.begin(Some(20));
        assert_eq!(p.bytes_done(), 0);
        assert_eq!(p.total_bytes(), Some(20));
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let p = Arc::new(TransferProgress::new());
        p.begin(Some(8 * 1000));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let p = Arc::clone(&p);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        p.add(1);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(p.bytes_done(), 8000);
        assert!((p.fraction() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn stats_rate_and_eta() {
        let stats = ProgressStats {
            bytes_done: 500,
            total_bytes: Some(1000),
            elapsed_secs: 5.0,
        };
        assert!((stats.bytes_per_sec() - 100.0).abs() < 1e-9);
        assert!((stats.eta_secs().unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn empty_resource_is_complete() {
        let stats = ProgressStats {
            bytes_done: 0,
            total_bytes: Some(0),
            elapsed_secs: 0.0,
        };
        assert_eq!(stats.fraction(), 1.0);
        assert_eq!(stats.eta_secs(), Some(0.0));
    }
}
