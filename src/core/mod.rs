//! Core hashing engine module
//!
//! Provides the per-file task, the multi-file session with its
//! bounded worker pool, and report assembly.

mod report;
mod session;
mod task;

pub use report::*;
pub use session::*;
pub use task::*;
