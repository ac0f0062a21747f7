//! Per-file hashing task
//!
//! A [`FileTask`] streams one file through a [`DigestAccumulator`] in
//! fixed-size blocks and renders its report line once finished.

use crate::config::DigestAlgorithm;
use crate::error::{DigestError, IoResultExt, Result};
use crate::hash::{DigestAccumulator, FileDigest};
use crate::progress::{NullObserver, SessionObserver};
use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};

/// Marker placed after the path in the report line of a failed task
pub const FAILURE_MARKER: &str = "FAILED";

/// Smallest read buffer, used when the file size is unknown or tiny
pub const MIN_READ_BUFFER: usize = 8 * 1024;

/// Lifecycle state of a task
#[derive(Debug)]
pub enum TaskState {
    /// Not yet claimed by a worker
    Pending,
    /// Being read by a worker
    Running,
    /// Every block consumed and finalized
    Completed(FileDigest),
    /// Open or read failed
    Failed(DigestError),
}

impl TaskState {
    /// Whether the task reached `Completed` or `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed(_))
    }
}

/// One file to hash with a fixed algorithm list
#[derive(Debug)]
pub struct FileTask {
    path: PathBuf,
    block_size: usize,
    algorithms: Vec<DigestAlgorithm>,
    separator: String,
    state: TaskState,
}

impl FileTask {
    /// Create a pending task
    pub fn new(
        path: impl Into<PathBuf>,
        block_size: usize,
        algorithms: &[DigestAlgorithm],
        separator: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            block_size: block_size.max(1),
            algorithms: algorithms.to_vec(),
            separator: separator.into(),
            state: TaskState::Pending,
        }
    }

    /// Path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current lifecycle state
    pub fn state(&self) -> &TaskState {
        &self.state
    }

    /// Whether the task completed or failed
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Finalized digest, if the task completed
    pub fn digest(&self) -> Option<&FileDigest> {
        match &self.state {
            TaskState::Completed(digest) => Some(digest),
            _ => None,
        }
    }

    /// Failure, if the task failed
    pub fn error(&self) -> Option<&DigestError> {
        match &self.state {
            TaskState::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Read the file block by block and finalize its digests.
    ///
    /// Does nothing if the task already completed or failed.
    pub fn run(&mut self, observer: &dyn SessionObserver) {
        if self.is_finished() {
            return;
        }

        self.state = TaskState::Running;
        observer.task_started(&self.path);

        self.state = match self.read_all(observer) {
            Ok(digest) => {
                observer.task_completed(&self.path, &digest);
                TaskState::Completed(digest)
            }
            Err(error) => {
                observer.task_failed(&self.path, &error);
                TaskState::Failed(error)
            }
        };
    }

    /// Mark a task lost by its worker as failed
    pub(crate) fn mark_lost(&mut self) {
        if !self.is_finished() {
            self.state = TaskState::Failed(DigestError::WorkerLost(self.path.clone()));
        }
    }

    fn read_all(&self, observer: &dyn SessionObserver) -> Result<FileDigest> {
        let mut file = File::open(&self.path).with_path(&self.path)?;
        let mut acc = DigestAccumulator::new(&self.algorithms);
        let mut buffer = self.read_buffer(&file)?;

        loop {
            let bytes_read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(DigestError::io(&self.path, e)),
            };

            acc.ingest(&buffer[..bytes_read]);
            observer.block_ingested(&self.path, bytes_read);
        }

        Ok(acc.finalize())
    }

    /// Allocate the block buffer, never larger than the file needs.
    ///
    /// Files reporting a zero length (pipes, procfs) still get
    /// [`MIN_READ_BUFFER`] bytes.
    fn read_buffer(&self, file: &File) -> Result<Vec<u8>> {
        let len = file.metadata().with_path(&self.path)?.len();
        let capacity = len
            .max(MIN_READ_BUFFER as u64)
            .min(self.block_size as u64) as usize;

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|e| DigestError::io(&self.path, io::Error::new(ErrorKind::OutOfMemory, e)))?;
        buffer.resize(capacity, 0);
        Ok(buffer)
    }

    /// Report header for the given algorithms
    pub fn header(algorithms: &[DigestAlgorithm], separator: &str) -> String {
        let mut columns = vec!["Filename".to_string(), "Size".to_string()];
        columns.extend(algorithms.iter().map(|a| a.column_name()));
        columns.push("Entropy".to_string());
        columns.join(separator)
    }

    /// Render this task's report line.
    ///
    /// Completed: path, size, one digest per algorithm, entropy.
    /// Failed: path, the failure marker and a short reason.
    pub fn render_line(&self) -> Result<String> {
        let mut fields = vec![self.path.display().to_string()];

        match &self.state {
            TaskState::Completed(digest) => {
                fields.push(digest.size.to_string());
                for algorithm in &self.algorithms {
                    fields.push(digest.digest(*algorithm).unwrap_or_default().to_string());
                }
                fields.push(digest.entropy_string());
            }
            TaskState::Failed(error) => {
                fields.push(FAILURE_MARKER.to_string());
                fields.push(error.failure_reason());
            }
            TaskState::Pending | TaskState::Running => {
                return Err(DigestError::TaskNotFinished(self.path.clone()));
            }
        }

        Ok(fields.join(&self.separator))
    }
}

/// Hash a single file with several algorithms in one pass
pub fn hash_file(
    path: &Path,
    algorithms: &[DigestAlgorithm],
    block_size: usize,
) -> Result<FileDigest> {
    let mut task = FileTask::new(path, block_size, algorithms, ",");
    task.run(&NullObserver);

    match task.state {
        TaskState::Completed(digest) => Ok(digest),
        TaskState::Failed(error) => Err(error),
        TaskState::Pending | TaskState::Running => Err(DigestError::TaskNotFinished(task.path)),
    }
}
