//! Session observability hooks
//!
//! A [`SessionObserver`] is handed to a session instead of relying on global
//! logger state. Every hook has a no-op default so implementors only override
//! what they care about.

use crate::core::SessionStats;
use crate::error::DigestError;
use crate::hash::FileDigest;
use std::path::Path;

/// Receives events from a hashing session.
///
/// Hooks are called from worker threads, so implementations must be
/// thread-safe.
pub trait SessionObserver: Send + Sync {
    /// Workers are about to start
    fn session_started(&self, _files: usize, _workers: usize) {}

    /// A worker claimed the task for `path`
    fn task_started(&self, _path: &Path) {}

    /// A block of `bytes` was read from `path` and ingested
    fn block_ingested(&self, _path: &Path, _bytes: usize) {}

    /// The task for `path` finalized successfully
    fn task_completed(&self, _path: &Path, _digest: &FileDigest) {}

    /// The task for `path` failed
    fn task_failed(&self, _path: &Path, _error: &DigestError) {}

    /// All workers have joined
    fn session_finished(&self, _stats: &SessionStats) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}

/// Observer that forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn session_started(&self, files: usize, workers: usize) {
        tracing::info!("Hashing {} files with {} workers", files, workers);
    }

    fn task_started(&self, path: &Path) {
        tracing::debug!("Hashing {}", path.display());
    }

    fn task_completed(&self, path: &Path, digest: &FileDigest) {
        tracing::debug!(
            "Finished {} ({}, entropy {:.6})",
            path.display(),
            humansize::format_size(digest.size, humansize::BINARY),
            digest.entropy
        );
    }

    fn task_failed(&self, path: &Path, error: &DigestError) {
        if error.is_per_task() {
            tracing::warn!("Failed to hash {}: {}", path.display(), error);
        } else {
            tracing::error!("Failed to hash {}: {}", path.display(), error);
        }
    }

    fn session_finished(&self, stats: &SessionStats) {
        tracing::info!(
            "Hashed {} files ({} failed), {} in {:.2?}",
            stats.completed,
            stats.failed,
            humansize::format_size(stats.bytes_hashed, humansize::BINARY),
            stats.duration
        );
    }
}
