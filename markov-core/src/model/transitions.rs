use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::symbol::Symbol;
use crate::error::{MarkovError, Result};
use crate::sampler;

/// Outgoing transitions of one context.
///
/// Conceptually, this is a node of the Markov chain whose edges are
/// weighted by the number of times they were observed.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during training
/// - Give the conditional probability of a next symbol
/// - Pick the next symbol using weighted random sampling
/// - Merge with the transitions of the same context from another model
///
/// ## Invariants
/// - Each occurrence count is strictly positive
/// - Symbols keep their first-observed order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(bound(
	serialize = "T: Serialize + Symbol",
	deserialize = "T: Deserialize<'de> + Symbol"
))]
pub struct Transitions<T: Symbol> {
	/// Example: { 'e' => 42, 'a' => 3 }
	counts: IndexMap<T, u32>,
}

impl<T: Symbol> Default for Transitions<T> {
	fn default() -> Self {
		Self { counts: IndexMap::new() }
	}
}

impl<T: Symbol> Transitions<T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records an occurrence of a transition toward `next`.
	///
	/// - If the transition already exists, its count is increased.
	/// - Otherwise, a new transition is created with a count of 1.
	///
	/// # Errors
	/// Returns `Overflow` if the count is already `u32::MAX`. The count
	/// is left unchanged.
	pub fn add_transition(&mut self, next: T) -> Result<()> {
		let count = self.counts.entry(next).or_insert(0);
		*count = count.checked_add(1).ok_or(MarkovError::Overflow)?;
		Ok(())
	}

	/// Number of times `next` followed this context.
	pub fn count(&self, next: &T) -> Option<u32> {
		self.counts.get(next).copied()
	}

	/// Sum of every occurrence count.
	pub fn total(&self) -> u64 {
		self.counts.values().map(|&c| u64::from(c)).sum()
	}

	/// Observed probability of `next`, 0.0 if it never followed the context.
	pub fn probability(&self, next: &T) -> f64 {
		match self.count(next) {
			Some(count) => f64::from(count) / self.total() as f64,
			None => 0.0,
		}
	}

	/// Number of distinct next symbols.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// `(symbol, count)` pairs in first-observed order.
	pub fn iter(&self) -> impl Iterator<Item = (&T, u32)> {
		self.counts.iter().map(|(symbol, &count)| (symbol, count))
	}

	pub fn symbols(&self) -> impl Iterator<Item = &T> {
		self.counts.keys()
	}

	/// Picks a next symbol with probability proportional to its count.
	///
	/// Returns `None` if there is no transition.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<&T>> {
		self.sample_with(&mut Vec::new(), rng)
	}

	/// Same as [`Transitions::sample`], filling `weights` instead of
	/// allocating. The buffer is cleared first.
	pub fn sample_with<R: Rng + ?Sized>(
		&self,
		weights: &mut Vec<f64>,
		rng: &mut R,
	) -> Result<Option<&T>> {
		if self.counts.is_empty() {
			return Ok(None);
		}
		weights.clear();
		weights.extend(self.counts.values().map(|&c| f64::from(c)));
		let index = sampler::select_index(weights, rng)?;
		Ok(self.counts.get_index(index).map(|(symbol, _)| symbol))
	}

	/// Checks that merging `other` cannot overflow any count.
	pub(crate) fn can_absorb(&self, other: &Self) -> bool {
		other.counts.iter().all(|(symbol, &count)| {
			self.count(symbol).unwrap_or(0).checked_add(count).is_some()
		})
	}

	/// Merges the transitions of the same context from another model.
	///
	/// Occurrence counts are summed. Nothing is modified if a sum would
	/// overflow.
	///
	/// # Errors
	/// Returns `Overflow` if a summed count exceeds `u32::MAX`.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if !self.can_absorb(other) {
			return Err(MarkovError::Overflow);
		}
		for (symbol, &count) in &other.counts {
			*self.counts.entry(symbol.clone()).or_insert(0) += count;
		}
		Ok(())
	}

	#[cfg(test)]
	pub(crate) fn with_count(next: T, count: u32) -> Self {
		let mut counts = IndexMap::new();
		counts.insert(next, count);
		Self { counts }
	}
}
