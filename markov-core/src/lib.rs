//! Order-k Markov chains over sequences of arbitrary symbols.
//!
//! This crate provides:
//! - Training of a frequency-based transition table from sequences
//! - Log-probability scoring of a sequence, with a floor for unseen data
//! - Seeded, weighted-random generation of new sequences
//! - A standalone roulette selection utility
//! - Compact binary persistence (`postcard`)
//!
//! File helpers are kept internal.

/// Error type returned by every fallible operation.
pub mod error;

/// Markov chain model and its building blocks.
pub mod model;

/// Weighted random selection over a slice.
pub mod sampler;

/// I/O utilities (corpus loading, cache path).
///
/// Not exposed
pub(crate) mod io;

pub use error::{MarkovError, Result};
pub use model::chain::{DEFAULT_ORDER, FLOOR_PROBABILITY, MarkovChain};
pub use model::context::ContextWindow;
pub use model::generation_input::{DEFAULT_MAX_LENGTH, GenerationInput, StartSeed};
pub use model::symbol::Symbol;
