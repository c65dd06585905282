//! Markov chain model.
//!
//! - Composite context keys (`ContextWindow`)
//! - Per-context transition counts (`Transitions`)
//! - The frequency table (`TransitionTable`)
//! - The chain itself (`MarkovChain`): training, scoring, persistence
//! - Generation and its parameters (`GenerationInput`)

/// Order-k chain: training, evaluation, merging and persistence.
pub mod chain;

/// Fixed-length window of symbols used as a table key.
pub mod context;

/// Generation parameters and start strategy.
pub mod generation_input;

/// Cold and warm start generation on `MarkovChain`.
mod generator;

/// Capability bound required from symbols.
pub mod symbol;

/// Mapping from contexts to their transitions.
pub mod table;

/// Outgoing transitions of a single context.
///
/// Tracks occurrence counts and supports weighted random sampling.
pub mod transitions;
