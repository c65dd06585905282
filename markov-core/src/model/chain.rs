use std::collections::HashSet;
use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::context::ContextWindow;
use super::symbol::Symbol;
use super::table::TransitionTable;
use super::transitions::Transitions;
use crate::error::{MarkovError, Result};
use crate::io::{build_output_path, read_corpus};

/// Order used by [`MarkovChain::default`].
pub const DEFAULT_ORDER: usize = 2;

/// Probability given to a transition, or a context, never seen in training.
pub const FLOOR_PROBABILITY: f64 = 1e-6;

/// Order-k Markov chain over sequences of symbols.
///
/// The chain stores, for every context of `order` consecutive symbols,
/// how many times each symbol followed it.
///
/// # Responsibilities
/// - Train the transition table from sequences
/// - Score sequences with a log-probability
/// - Generate sequences (see the generator module)
/// - Merge with another chain of the same order
/// - Persist to and from a compact binary form (`postcard`)
///
/// # Invariants
/// - `order` is always >= 1 and never changes
/// - Every context in the table has exactly `order` symbols
/// - All transition counts are >= 1
///
/// The serialized form is `order` followed by the table. New fields are
/// only ever appended.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(bound(
	serialize = "T: Serialize + Symbol",
	deserialize = "T: Deserialize<'de> + Symbol"
))]
pub struct MarkovChain<T: Symbol> {
	/// Number of preceding symbols in a context (must be >= 1)
	order: usize,

	table: TransitionTable<T>,
}

impl<T: Symbol> Default for MarkovChain<T> {
	fn default() -> Self {
		Self { order: DEFAULT_ORDER, table: TransitionTable::new() }
	}
}

impl<T: Symbol> MarkovChain<T> {
	/// Creates an empty chain of the given order.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `order` is 0.
	pub fn new(order: usize) -> Result<Self> {
		if order == 0 {
			return Err(MarkovError::invalid("order must be >= 1"));
		}
		Ok(Self { order, table: TransitionTable::new() })
	}

	pub fn order(&self) -> usize {
		self.order
	}

	pub fn table(&self) -> &TransitionTable<T> {
		&self.table
	}

	/// Number of trained contexts.
	pub fn len(&self) -> usize {
		self.table.len()
	}

	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	pub fn contexts(&self) -> impl Iterator<Item = &ContextWindow<T>> {
		self.table.contexts()
	}

	/// Transitions observed after `context`.
	pub fn transitions(&self, context: &[T]) -> Option<&Transitions<T>> {
		self.table.get(context)
	}

	/// Adds a sequence to the model.
	///
	/// Slides a window of `order` symbols over the sequence and counts the
	/// symbol following each window. Sequences of `order` symbols or fewer
	/// hold no transition and are ignored.
	///
	/// # Errors
	/// Returns `Overflow` if a count would exceed `u32::MAX`. Transitions
	/// recorded before the failing one are kept.
	pub fn train(&mut self, sequence: &[T]) -> Result<()> {
		if sequence.len() <= self.order {
			return Ok(());
		}

		for window in sequence.windows(self.order + 1) {
			let (context, next) = window.split_at(self.order);
			self.table.record(context, next[0].clone())?;
		}

		debug!(
			"trained {} transitions, {} contexts known",
			sequence.len() - self.order,
			self.table.len()
		);
		Ok(())
	}

	/// Trains every sequence in turn.
	pub fn train_all<I, S>(&mut self, sequences: I) -> Result<()>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<[T]>,
	{
		for sequence in sequences {
			self.train(sequence.as_ref())?;
		}
		Ok(())
	}

	/// Observed probability of `next` after `context`.
	///
	/// Returns 0.0 if the context or the transition was never seen.
	pub fn probability(&self, context: &[T], next: &T) -> f64 {
		self.table.get(context).map_or(0.0, |transitions| transitions.probability(next))
	}

	/// Log-likelihood of `sequence` under the model.
	///
	/// Each symbol after the first `order` ones is scored against the window
	/// that precedes it. The window ending on the last symbol has no
	/// successor and is not scored. Unknown contexts and unknown transitions
	/// contribute `ln(FLOOR_PROBABILITY)`.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the sequence has `order` symbols or
	/// fewer, as there is nothing to score.
	pub fn evaluate_log_probability(&self, sequence: &[T]) -> Result<f64> {
		if sequence.len() <= self.order {
			return Err(MarkovError::invalid(format!(
				"sequence needs more than {} symbols to be scored",
				self.order
			)));
		}

		let log_floor = FLOOR_PROBABILITY.ln();
		let mut log_probability = 0.0;

		for window in sequence.windows(self.order + 1) {
			let (context, next) = window.split_at(self.order);
			log_probability += match self.table.get(context) {
				Some(transitions) => match transitions.count(&next[0]) {
					Some(count) => (f64::from(count) / transitions.total() as f64).ln(),
					None => log_floor,
				},
				None => log_floor,
			};
		}

		Ok(log_probability)
	}

	/// Every symbol observed as the successor of some context.
	pub fn possible_symbol_classes(&self) -> HashSet<T> {
		self.table.symbols()
	}

	/// Merges another chain into this one.
	///
	/// # Notes
	/// - Both chains must have the same order.
	/// - Counts for matching contexts and transitions are summed.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the orders differ, `Overflow` if a summed
	/// count exceeds `u32::MAX` (nothing is merged in that case).
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.order != other.order {
			return Err(MarkovError::invalid(format!(
				"order mismatch: self={}, other={}",
				self.order, other.order
			)));
		}
		self.table.merge(&other.table)?;
		debug!("merged {} contexts, {} contexts known", other.len(), self.len());
		Ok(())
	}

	/// Checks the invariants of a chain read from outside.
	fn validate(&self) -> Result<()> {
		if self.order == 0 {
			return Err(MarkovError::invalid("order must be >= 1"));
		}
		for (context, transitions) in self.table.iter() {
			if context.len() != self.order {
				return Err(MarkovError::invalid(format!(
					"context of {} symbols in a chain of order {}",
					context.len(),
					self.order
				)));
			}
			if transitions.is_empty() || transitions.iter().any(|(_, count)| count == 0) {
				return Err(MarkovError::invalid("transition counts must be >= 1"));
			}
		}
		Ok(())
	}
}

impl<T: Symbol + Serialize + DeserializeOwned> MarkovChain<T> {
	/// Serializes the chain with `postcard`.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		Ok(postcard::to_stdvec(self)?)
	}

	/// Reads a chain written by [`MarkovChain::to_bytes`].
	///
	/// # Errors
	/// Returns `Serialization` for malformed bytes and `InvalidArgument` if
	/// the decoded chain breaks the model invariants.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		let chain: Self = postcard::from_bytes(bytes)?;
		chain.validate()?;
		Ok(chain)
	}

	/// Writes the serialized chain to `path`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let bytes = self.to_bytes()?;
		std::fs::write(&path, bytes)?;
		debug!("chain saved to {}", path.as_ref().display());
		Ok(())
	}

	/// Loads a chain saved with [`MarkovChain::save`].
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = std::fs::read(&path)?;
		let chain = Self::from_bytes(&bytes)?;
		debug!(
			"chain of order {} loaded from {} ({} contexts)",
			chain.order,
			path.as_ref().display(),
			chain.len()
		);
		Ok(chain)
	}
}

impl MarkovChain<char> {
	/// Builds a character chain from a text corpus, one sequence per line.
	///
	/// - If `<stem>.bin` exists next to the corpus, it is loaded instead.
	/// - Otherwise every line is trained and the chain is written to
	///   `<stem>.bin` for the next call.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the cached chain has another order,
	/// or any I/O, serialization or training error.
	pub fn from_text_file<P: AsRef<Path>>(filepath: P, order: usize) -> Result<Self> {
		let binary_data_path = build_output_path(&filepath, "bin")?;
		if binary_data_path.exists() {
			let chain = Self::load(&binary_data_path)?;
			if chain.order != order {
				return Err(MarkovError::invalid(format!(
					"cached chain {} has order {}, expected {}",
					binary_data_path.display(),
					chain.order,
					order
				)));
			}
			return Ok(chain);
		}

		let mut chain = Self::new(order)?;
		chain.train_all(read_corpus(&filepath)?)?;
		chain.save(&binary_data_path)?;
		Ok(chain)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn seq(s: &str) -> Vec<char> {
		s.chars().collect()
	}

	#[test]
	fn order_zero_is_rejected() {
		assert!(matches!(MarkovChain::<char>::new(0), Err(MarkovError::InvalidArgument(_))));
		assert_eq!(MarkovChain::<char>::default().order(), DEFAULT_ORDER);
	}

	#[test]
	fn train_counts_each_window() {
		let mut chain = MarkovChain::new(1).unwrap();
		chain.train(&seq("ababab")).unwrap();

		assert_eq!(chain.len(), 2);
		assert_eq!(chain.transitions(&['a']).unwrap().count(&'b'), Some(3));
		assert_eq!(chain.transitions(&['b']).unwrap().count(&'a'), Some(2));
	}

	#[test]
	fn short_sequences_are_ignored() {
		let mut chain = MarkovChain::new(3).unwrap();
		chain.train(&seq("abc")).unwrap();
		chain.train(&seq("")).unwrap();
		assert!(chain.is_empty());
	}

	#[test]
	fn train_stops_on_overflow() {
		let mut chain = MarkovChain::new(1).unwrap();
		chain.table.insert(
			ContextWindow::new(1, ['a']).unwrap(),
			Transitions::with_count('b', u32::MAX),
		);
		assert!(matches!(chain.train(&seq("ab")), Err(MarkovError::Overflow)));
		assert_eq!(chain.transitions(&['a']).unwrap().count(&'b'), Some(u32::MAX));
	}

	#[test]
	fn certainty_scores_zero() {
		let mut chain = MarkovChain::new(1).unwrap();
		chain.train(&seq("ababab")).unwrap();
		let score = chain.evaluate_log_probability(&seq("aba")).unwrap();
		assert_eq!(score, 0.0);
	}

	#[test]
	fn observed_frequencies_are_used() {
		let mut chain = MarkovChain::new(1).unwrap();
		chain.train(&seq("abac")).unwrap();
		// a -> b once, a -> c once
		let score = chain.evaluate_log_probability(&seq("ab")).unwrap();
		assert!((score - 0.5f64.ln()).abs() < 1e-12);
		assert!((chain.probability(&['a'], &'c') - 0.5).abs() < 1e-12);
		assert_eq!(chain.probability(&['z'], &'c'), 0.0);
	}

	#[test]
	fn unseen_context_and_transition_use_the_floor() {
		let mut chain = MarkovChain::new(1).unwrap();
		chain.train(&seq("ab")).unwrap();

		let unseen_context = chain.evaluate_log_probability(&seq("xy")).unwrap();
		assert_eq!(unseen_context, FLOOR_PROBABILITY.ln());

		let unseen_transition = chain.evaluate_log_probability(&seq("ax")).unwrap();
		assert_eq!(unseen_transition, FLOOR_PROBABILITY.ln());

		let both = chain.evaluate_log_probability(&seq("abz")).unwrap();
		assert_eq!(both, FLOOR_PROBABILITY.ln());
	}

	#[test]
	fn too_short_sequences_cannot_be_scored() {
		let mut chain = MarkovChain::new(2).unwrap();
		chain.train(&seq("abcabc")).unwrap();
		assert!(matches!(
			chain.evaluate_log_probability(&seq("ab")),
			Err(MarkovError::InvalidArgument(_))
		));
		assert!(chain.evaluate_log_probability(&seq("abc")).is_ok());
	}

	#[test]
	fn merge_requires_same_order() {
		let mut left = MarkovChain::<char>::new(1).unwrap();
		let right = MarkovChain::<char>::new(2).unwrap();
		assert!(matches!(left.merge(&right), Err(MarkovError::InvalidArgument(_))));
	}

	#[test]
	fn decoded_chain_is_validated() {
		let mut chain = MarkovChain::new(2).unwrap();
		chain.table.insert(
			ContextWindow::new(1, ['a']).unwrap(),
			Transitions::with_count('b', 1),
		);
		let bytes = chain.to_bytes().unwrap();
		assert!(matches!(
			MarkovChain::<char>::from_bytes(&bytes),
			Err(MarkovError::InvalidArgument(_))
		));
		assert!(matches!(
			MarkovChain::<char>::from_bytes(&[0xff, 0xff]),
			Err(MarkovError::Serialization(_))
		));
	}
}
