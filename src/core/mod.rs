//! Core deterministic primitives.
//!
//! Everything in this module is platform-independent and replayable: given
//! the same seed, a bout's opponent picks come out identical everywhere.

pub mod rng;

// Re-export core types
pub use rng::{derive_bout_seed, DeterministicRng};
