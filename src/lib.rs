//! # multidigest - single-pass multi-algorithm file hashing
//!
//! multidigest computes several digests of a file (MD5, SHA-1, SHA-2,
//! BLAKE3, XXHash) together with a byte histogram and its Shannon entropy,
//! reading the file exactly once regardless of how many algorithms are
//! requested. Many files are processed at once by a bounded pool of worker
//! threads, and the report always follows input order.
//!
//! ## Features
//!
//! - **Single pass**: every block is fanned out to all algorithm states
//! - **Bounded memory**: files are read one fixed-size block at a time
//! - **Bounded concurrency**: `min(threads, distinct files)` workers
//! - **Deterministic reports**: lines follow input order, not completion order
//! - **Failure isolation**: an unreadable file fails only its own line
//!
//! ## Quick Start
//!
//! ```no_run
//! use multidigest::core::hash_files;
//!
//! let report = hash_files(["a.iso", "b.iso"]).unwrap();
//! print!("{}", report);
//! ```
//!
//! ## Custom Sessions
//!
//! ```no_run
//! use multidigest::config::{DigestAlgorithm, SessionConfig};
//! use multidigest::core::HashSession;
//! use multidigest::progress::ProgressReporter;
//! use std::sync::Arc;
//!
//! let config = SessionConfig {
//!     algorithms: vec![DigestAlgorithm::Sha256, DigestAlgorithm::Blake3],
//!     block_size: 64 * 1024,
//!     separator: "\t".to_string(),
//!     threads: 4,
//!     ..SessionConfig::for_files(["disk.img", "backup.tar"])
//! };
//!
//! let mut session = HashSession::new(config)
//!     .unwrap()
//!     .with_observer(Arc::new(ProgressReporter::new()));
//! let stats = session.run().unwrap();
//!
//! println!("{}", session.report().unwrap());
//! println!("{} of {} files hashed", stats.completed, stats.distinct_files);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod hash;
pub mod progress;

// Re-export commonly used types
pub use crate::config::{DigestAlgorithm, SessionConfig};
pub use crate::core::{FileTask, HashSession, Report, SessionStats};
pub use crate::error::{DigestError, Result};
pub use crate::hash::{DigestAccumulator, FileDigest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use multidigest::prelude::*;
    //! ```

    pub use crate::config::{DigestAlgorithm, SessionConfig};
    pub use crate::core::{hash_file, hash_files, FileTask, HashSession, Report, SessionStats};
    pub use crate::error::{DigestError, Result};
    pub use crate::hash::{hash_bytes, DigestAccumulator, FileDigest};
    pub use crate::progress::{NullObserver, ProgressReporter, SessionObserver, TracingObserver};
}
