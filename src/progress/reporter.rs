//! Progress reporter implementation
//!
//! Uses indicatif for progress bars on stderr with:
//! - File count progress
//! - Byte throughput and ETA display
//! - Current file status line

use crate::core::SessionStats;
use crate::error::DigestError;
use crate::hash::FileDigest;
use crate::progress::SessionObserver;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Progress reporter for hashing sessions
pub struct ProgressReporter {
    /// Multi-progress container
    multi: MultiProgress,
    /// Bytes hashed
    bytes_bar: ProgressBar,
    /// Files finished
    files_bar: ProgressBar,
    /// Current status message
    status: ProgressBar,
    start_time: Instant,
    total_bytes: AtomicU64,
    total_files: AtomicU64,
    bytes_hashed: AtomicU64,
    files_done: AtomicU64,
    files_failed: AtomicU64,
    enabled: AtomicBool,
}

impl ProgressReporter {
    /// Create a new progress reporter drawing to stderr
    pub fn new() -> Self {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::stderr());

        let status = multi.add(ProgressBar::new_spinner());
        status.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        let files_bar = multi.add(ProgressBar::new(0));
        files_bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%)")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        files_bar.set_prefix("Files");

        let bytes_bar = multi.add(ProgressBar::new(0));
        bytes_bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.dim} [{bar:40.green/white}] {bytes}/{total_bytes} ({bytes_per_sec}, ETA {eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bytes_bar.set_prefix("Data ");

        Self {
            multi,
            bytes_bar,
            files_bar,
            status,
            start_time: Instant::now(),
            total_bytes: AtomicU64::new(0),
            total_files: AtomicU64::new(0),
            bytes_hashed: AtomicU64::new(0),
            files_done: AtomicU64::new(0),
            files_failed: AtomicU64::new(0),
            enabled: AtomicBool::new(true),
        }
    }

    /// Create a disabled progress reporter (for quiet mode)
    pub fn disabled() -> Self {
        let reporter = Self::new();
        reporter.enabled.store(false, Ordering::SeqCst);
        reporter.multi.set_draw_target(ProgressDrawTarget::hidden());
        reporter
    }

    /// Set total bytes expected across all files
    pub fn set_total_bytes(&self, total: u64) {
        self.total_bytes.store(total, Ordering::Relaxed);
        self.bytes_bar.set_length(total);
    }

    /// Set total number of distinct files
    pub fn set_total_files(&self, total: u64) {
        self.total_files.store(total, Ordering::Relaxed);
        self.files_bar.set_length(total);
    }

    /// Check if progress is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get progress summary
    pub fn summary(&self) -> ProgressSummary {
        let bytes_hashed = self.bytes_hashed.load(Ordering::Relaxed);
        let elapsed = self.elapsed();
        let secs = elapsed.as_secs_f64();

        ProgressSummary {
            total_bytes: self.total_bytes.load(Ordering::Relaxed),
            bytes_hashed,
            total_files: self.total_files.load(Ordering::Relaxed),
            files_done: self.files_done.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            elapsed,
            throughput: if secs > 0.0 { bytes_hashed as f64 / secs } else { 0.0 },
        }
    }

    fn file_done(&self) {
        self.files_done.fetch_add(1, Ordering::Relaxed);
        self.files_bar.inc(1);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver for ProgressReporter {
    fn session_started(&self, files: usize, _workers: usize) {
        if self.total_files.load(Ordering::Relaxed) == 0 {
            self.set_total_files(files as u64);
        }
    }

    fn task_started(&self, path: &Path) {
        // Truncate long paths
        let path = path.display().to_string();
        let len = path.chars().count();
        let display = if len > 60 {
            format!("...{}", path.chars().skip(len - 57).collect::<String>())
        } else {
            path
        };
        self.status.set_message(display);
    }

    fn block_ingested(&self, _path: &Path, bytes: usize) {
        self.bytes_hashed.fetch_add(bytes as u64, Ordering::Relaxed);
        self.bytes_bar.inc(bytes as u64);
    }

    fn task_completed(&self, _path: &Path, _digest: &FileDigest) {
        self.file_done();
    }

    fn task_failed(&self, path: &Path, error: &DigestError) {
        self.files_failed.fetch_add(1, Ordering::Relaxed);
        self.file_done();
        let _ = self.multi.println(format!("{}: {}", path.display(), error));
    }

    fn session_finished(&self, stats: &SessionStats) {
        let message = format!(
            "{} files, {} in {:.1?}",
            stats.completed,
            humansize::format_size(stats.bytes_hashed, humansize::BINARY),
            stats.duration
        );
        if stats.failed == 0 {
            self.status.finish_with_message(format!("✓ {}", message));
            self.files_bar.finish();
            self.bytes_bar.finish();
        } else {
            self.status
                .finish_with_message(format!("✗ {} ({} failed)", message, stats.failed));
            self.files_bar.abandon();
            self.bytes_bar.abandon();
        }
    }
}

/// Progress summary
#[derive(Debug, Clone)]
pub struct ProgressSummary {
    /// Total bytes expected
    pub total_bytes: u64,
    /// Bytes hashed so far
    pub bytes_hashed: u64,
    /// Total distinct files
    pub total_files: u64,
    /// Files finished, failed ones included
    pub files_done: u64,
    /// Files that failed
    pub files_failed: u64,
    /// Elapsed time
    pub elapsed: Duration,
    /// Throughput in bytes/second
    pub throughput: f64,
}

impl ProgressSummary {
    /// Get completion percentage by bytes
    pub fn percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            (self.bytes_hashed as f64 / self.total_bytes as f64) * 100.0
        }
    }
}
