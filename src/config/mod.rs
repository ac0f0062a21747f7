//! Configuration module for multidigest
//!
//! Provides the CLI arguments, the digest algorithm set and the
//! validated session configuration.

mod settings;

pub use settings::*;
