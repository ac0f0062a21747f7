//! Progress and observability module
//!
//! Sessions report what they do through the [`SessionObserver`] trait.
//! [`TracingObserver`] logs events, [`ProgressReporter`] draws progress bars.

mod observer;
mod reporter;

pub use observer::*;
pub use reporter::*;
