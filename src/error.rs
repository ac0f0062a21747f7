//! Error types for multidigest
//!
//! Per-file errors (`NotFound`, `PermissionDenied`, `Io`) are isolated to the
//! task that produced them. Only configuration errors abort a session.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for multidigest operations
#[derive(Error, Debug)]
pub enum DigestError {
    /// I/O error while opening or reading a file
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File does not exist
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// File exists but cannot be read
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Invalid session configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Unparseable human-readable size
    #[error("Invalid size: {0}")]
    InvalidSize(String),

    /// A report line was requested before the task ran
    #[error("Task for '{0}' has not finished")]
    TaskNotFinished(PathBuf),

    /// Worker threads could not be started
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// A worker terminated while it held this file's task
    #[error("Worker terminated while hashing '{0}'")]
    WorkerLost(PathBuf),

    /// Report serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DigestError {
    /// Create an I/O error with path context.
    ///
    /// `NotFound` and `PermissionDenied` kinds are mapped to their dedicated
    /// variants so callers can match on them without inspecting the source.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Whether this error only affects a single file's task
    pub fn is_per_task(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::NotFound(_) | Self::PermissionDenied(_) | Self::WorkerLost(_)
        )
    }

    /// Short reason placed after the failure marker in a report line
    pub fn failure_reason(&self) -> String {
        match self {
            Self::NotFound(_) => "not found".to_string(),
            Self::PermissionDenied(_) => "permission denied".to_string(),
            Self::Io { source, .. } => format!("io error: {}", source),
            Self::WorkerLost(_) => "worker lost".to_string(),
            other => other.to_string(),
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. }
            | Self::NotFound(path)
            | Self::PermissionDenied(path)
            | Self::TaskNotFinished(path)
            | Self::WorkerLost(path) => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for multidigest operations
pub type Result<T> = std::result::Result<T, DigestError>;

impl From<serde_json::Error> for DigestError {
    fn from(err: serde_json::Error) -> Self {
        DigestError::Serialization(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| DigestError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_io_error_kind_mapping() {
        let err = DigestError::io("/missing", std::io::Error::new(ErrorKind::NotFound, "gone"));
        assert!(matches!(err, DigestError::NotFound(_)));
        assert_eq!(err.failure_reason(), "not found");

        let err = DigestError::io("/locked", std::io::Error::new(ErrorKind::PermissionDenied, "no"));
        assert!(matches!(err, DigestError::PermissionDenied(_)));

        let err = DigestError::io("/disk", std::io::Error::new(ErrorKind::Other, "bad sector"));
        assert!(matches!(err, DigestError::Io { .. }));
        assert_eq!(err.failure_reason(), "io error: bad sector");
        assert_eq!(err.path().unwrap(), &PathBuf::from("/disk"));
    }

    #[test]
    fn test_per_task_classification() {
        assert!(DigestError::NotFound(PathBuf::from("a")).is_per_task());
        assert!(DigestError::WorkerLost(PathBuf::from("a")).is_per_task());
        assert!(!DigestError::config("block size must be positive").is_per_task());
        assert!(DigestError::config("x").path().is_none());
    }

    #[test]
    fn test_with_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(ErrorKind::NotFound, "gone"));
        let err = result.with_path("/some/file").unwrap_err();
        assert_eq!(err.to_string(), "Path not found: /some/file");
    }
}
