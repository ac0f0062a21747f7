//! Digest computation module
//!
//! Provides the per-algorithm streaming [`Hasher`] and the
//! [`DigestAccumulator`] that fans each block out to all requested
//! algorithms while building a byte histogram for entropy.

mod accumulator;
mod hasher;

pub use accumulator::*;
pub use hasher::*;
