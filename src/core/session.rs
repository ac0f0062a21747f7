//! Multi-file hashing session
//!
//! Tasks are seeded into a shared unbounded channel before any worker starts.
//! Each worker pops tasks until the channel is drained, so every task is
//! claimed by exactly one worker. Finished tasks travel back over a result
//! channel and are stored in their input slot, which keeps report order
//! independent of completion order.

use crate::config::{DigestAlgorithm, SessionConfig};
use crate::core::{FileTask, Report};
use crate::error::{DigestError, Result};
use crate::progress::{SessionObserver, TracingObserver};
use crossbeam::channel::{unbounded, Receiver, Sender};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Outcome counters of a session run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Input paths, duplicates included
    pub files: usize,
    /// Distinct paths, one task each
    pub distinct_files: usize,
    /// Tasks that completed
    pub completed: usize,
    /// Tasks that failed
    pub failed: usize,
    /// Bytes hashed by completed tasks
    pub bytes_hashed: u64,
    /// Worker threads used
    pub workers: usize,
    /// Wall time of the run
    pub duration: Duration,
}

impl SessionStats {
    /// Whether every task completed
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.completed == self.distinct_files
    }
}

/// Hashes a list of files with a bounded pool of worker threads
pub struct HashSession {
    config: SessionConfig,
    /// One task per distinct path, first occurrence order
    tasks: Vec<FileTask>,
    /// Input position -> task index
    order: Vec<usize>,
    workers: usize,
    observer: Arc<dyn SessionObserver>,
}

impl HashSession {
    /// Create a session, validating the configuration up front
    pub fn new(config: SessionConfig) -> Result<Self> {
        let config = config.validate()?;

        let mut index: HashMap<PathBuf, usize> = HashMap::new();
        let mut tasks = Vec::new();
        let mut order = Vec::with_capacity(config.filenames.len());

        for path in &config.filenames {
            let slot = *index.entry(path.clone()).or_insert_with(|| {
                tasks.push(FileTask::new(
                    path.clone(),
                    config.block_size,
                    &config.algorithms,
                    config.separator.clone(),
                ));
                tasks.len() - 1
            });
            order.push(slot);
        }

        let workers = config.threads.min(tasks.len()).max(1);

        Ok(Self {
            config,
            tasks,
            order,
            workers,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Replace the default tracing observer
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Effective worker count: `min(threads, distinct files)`, at least 1
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Tasks in first-occurrence order
    pub fn tasks(&self) -> &[FileTask] {
        &self.tasks
    }

    /// Algorithms in column order
    pub fn algorithms(&self) -> &[DigestAlgorithm] {
        &self.config.algorithms
    }

    /// Hash every pending file and block until all workers have finished.
    ///
    /// Per-file failures are recorded on their tasks; this only returns an
    /// error when worker threads cannot be started, in which case unclaimed
    /// tasks stay pending for a later run. Tasks that already finished are
    /// not run again.
    pub fn run(&mut self) -> Result<SessionStats> {
        let start_time = Instant::now();
        let (task_tx, task_rx) = unbounded::<(usize, FileTask)>();
        let (result_tx, result_rx) = unbounded::<(usize, FileTask)>();

        let paths: Vec<PathBuf> = self.tasks.iter().map(|t| t.path().to_path_buf()).collect();
        let mut slots: Vec<Option<FileTask>> = Vec::with_capacity(self.tasks.len());
        for (idx, task) in std::mem::take(&mut self.tasks).into_iter().enumerate() {
            if task.is_finished() {
                slots.push(Some(task));
            } else {
                slots.push(None);
                let _ = task_tx.send((idx, task));
            }
        }
        drop(task_tx);

        let workers = self.workers.min(task_rx.len());
        self.observer.session_started(slots.len(), workers);

        // A worker that dies takes only its claimed task with it; whatever
        // is still queued goes to a fresh round of workers.
        let mut spawned = Ok(workers);
        while !task_rx.is_empty() {
            let round = self.workers.min(task_rx.len());
            if let Err(e) = self.run_workers(round, &task_rx, &result_tx) {
                spawned = Err(e);
                break;
            }
        }
        drop(result_tx);

        for (idx, task) in result_rx.try_iter() {
            slots[idx] = Some(task);
        }
        for (idx, task) in task_rx.try_iter() {
            slots[idx] = Some(task);
        }

        // Claimed by a worker that died before returning it
        self.tasks = slots
            .into_iter()
            .zip(paths)
            .map(|(slot, path)| {
                slot.unwrap_or_else(|| {
                    let mut task = FileTask::new(
                        path,
                        self.config.block_size,
                        &self.config.algorithms,
                        self.config.separator.clone(),
                    );
                    task.mark_lost();
                    if let Some(error) = task.error() {
                        self.observer.task_failed(task.path(), error);
                    }
                    task
                })
            })
            .collect();

        let stats = self.stats(spawned?, start_time.elapsed());
        self.observer.session_finished(&stats);
        Ok(stats)
    }

    /// Run one round of `count` named workers until the queue is drained or
    /// every worker has died.
    fn run_workers(
        &self,
        count: usize,
        task_rx: &Receiver<(usize, FileTask)>,
        result_tx: &Sender<(usize, FileTask)>,
    ) -> Result<()> {
        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(count);

            for worker_id in 0..count {
                let task_rx = task_rx.clone();
                let result_tx = result_tx.clone();
                let observer = Arc::clone(&self.observer);

                let handle = thread::Builder::new()
                    .name(format!("digest-worker-{}", worker_id))
                    .spawn_scoped(scope, move || {
                        for (idx, mut task) in task_rx.try_iter() {
                            task.run(observer.as_ref());
                            if result_tx.send((idx, task)).is_err() {
                                break;
                            }
                        }
                        tracing::debug!("Worker {} shutting down", worker_id);
                    });

                match handle {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        tracing::error!("Failed to spawn worker {}: {}", worker_id, e);
                        if handles.is_empty() {
                            return Err(DigestError::ThreadPool(e.to_string()));
                        }
                        break;
                    }
                }
            }

            for handle in handles {
                if handle.join().is_err() {
                    tracing::error!("A digest worker panicked");
                }
            }
            Ok(())
        })
    }

    fn stats(&self, workers: usize, duration: Duration) -> SessionStats {
        let mut stats = SessionStats {
            files: self.order.len(),
            distinct_files: self.tasks.len(),
            workers,
            duration,
            ..Default::default()
        };

        for task in &self.tasks {
            if let Some(digest) = task.digest() {
                stats.completed += 1;
                stats.bytes_hashed += digest.size;
            } else if task.error().is_some() {
                stats.failed += 1;
            }
        }

        stats
    }

    /// Build the report: header, then one line per input path in input order
    pub fn report(&self) -> Result<Report> {
        let header = FileTask::header(&self.config.algorithms, &self.config.separator);
        let mut report = Report::new(header);

        for &idx in &self.order {
            report.push(&self.tasks[idx])?;
        }

        Ok(report)
    }
}

/// Hash the given files with default settings and return the report
pub fn hash_files<I, P>(filenames: I) -> Result<Report>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut session = HashSession::new(SessionConfig::for_files(filenames))?;
    session.run()?;
    session.report()
}
