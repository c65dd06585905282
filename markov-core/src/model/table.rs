use std::collections::HashSet;

use indexmap::IndexMap;
use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};

use super::context::ContextWindow;
use super::symbol::Symbol;
use super::transitions::Transitions;
use crate::error::{MarkovError, Result};

/// Frequency table of a Markov chain.
///
/// Maps every observed context to the counts of the symbols that followed
/// it. Only training and merging write to it.
///
/// # Invariants
/// - Every stored count is >= 1
/// - A context is only present once a transition has been recorded for it
/// - Contexts keep their first-observed order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(bound(
	serialize = "T: Serialize + Symbol",
	deserialize = "T: Deserialize<'de> + Symbol"
))]
pub struct TransitionTable<T: Symbol> {
	states: IndexMap<ContextWindow<T>, Transitions<T>>,
}

impl<T: Symbol> Default for TransitionTable<T> {
	fn default() -> Self {
		Self { states: IndexMap::new() }
	}
}

impl<T: Symbol> TransitionTable<T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one `context -> next` observation.
	///
	/// The context is only copied into the table the first time it is seen.
	pub fn record(&mut self, context: &[T], next: T) -> Result<()> {
		match self.states.get_mut(context) {
			Some(transitions) => transitions.add_transition(next),
			None => {
				let mut transitions = Transitions::new();
				transitions.add_transition(next)?;
				self.states.insert(ContextWindow::from_slice(context), transitions);
				Ok(())
			}
		}
	}

	/// Transitions observed after `context`, if it was ever trained.
	pub fn get(&self, context: &[T]) -> Option<&Transitions<T>> {
		self.states.get(context)
	}

	pub fn contains(&self, context: &[T]) -> bool {
		self.states.contains_key(context)
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	pub fn contexts(&self) -> impl Iterator<Item = &ContextWindow<T>> {
		self.states.keys()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&ContextWindow<T>, &Transitions<T>)> {
		self.states.iter()
	}

	/// Returns a context chosen uniformly among the trained ones.
	///
	/// Returns `None` if the table is empty.
	pub fn random_context<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&ContextWindow<T>> {
		self.states.keys().choose(rng)
	}

	/// Every symbol observed as the successor of some context.
	pub fn symbols(&self) -> HashSet<T> {
		self.states
			.values()
			.flat_map(|transitions| transitions.symbols().cloned())
			.collect()
	}

	/// Merges another table into this one.
	///
	/// Counts of matching contexts are summed, missing contexts are cloned.
	/// The table is left untouched if any sum would overflow.
	///
	/// # Errors
	/// Returns `Overflow` if a summed count exceeds `u32::MAX`.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		let fits = other.states.iter().all(|(context, transitions)| {
			self.states
				.get(context)
				.is_none_or(|existing| existing.can_absorb(transitions))
		});
		if !fits {
			return Err(MarkovError::Overflow);
		}

		for (context, transitions) in &other.states {
			if let Some(existing) = self.states.get_mut(context) {
				existing.merge(transitions)?;
			} else {
				self.states.insert(context.clone(), transitions.clone());
			}
		}
		Ok(())
	}

	#[cfg(test)]
	pub(crate) fn insert(&mut self, context: ContextWindow<T>, transitions: Transitions<T>) {
		self.states.insert(context, transitions);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn record_creates_then_increments() {
		let mut table = TransitionTable::new();
		table.record(&['a', 'b'], 'c').unwrap();
		table.record(&['a', 'b'], 'c').unwrap();
		table.record(&['b', 'c'], 'a').unwrap();

		assert_eq!(table.len(), 2);
		assert_eq!(table.get(&['a', 'b']).unwrap().count(&'c'), Some(2));
		assert_eq!(table.get(&['b', 'c']).unwrap().count(&'a'), Some(1));
		assert!(table.get(&['c', 'a']).is_none());
	}

	#[test]
	fn random_context_is_none_on_empty_table() {
		let table = TransitionTable::<u8>::new();
		let mut rng = StdRng::seed_from_u64(0);
		assert!(table.random_context(&mut rng).is_none());
	}

	#[test]
	fn random_context_is_a_trained_context() {
		let mut table = TransitionTable::new();
		table.record(&[1], 2).unwrap();
		table.record(&[2], 3).unwrap();
		let mut rng = StdRng::seed_from_u64(9);
		for _ in 0..50 {
			let context = table.random_context(&mut rng).unwrap();
			assert!(table.contains(context.symbols()));
		}
	}

	#[test]
	fn symbols_are_successors_only() {
		let mut table = TransitionTable::new();
		table.record(&["the"], "cat").unwrap();
		table.record(&["cat"], "sat").unwrap();
		let symbols = table.symbols();
		assert_eq!(symbols, HashSet::from(["cat", "sat"]));
	}

	#[test]
	fn merge_is_all_or_nothing() {
		let mut left = TransitionTable::new();
		left.insert(
			ContextWindow::new(1, ['a']).unwrap(),
			Transitions::with_count('b', u32::MAX),
		);
		let mut right = TransitionTable::new();
		right.record(&['z'], 'z').unwrap();
		right.record(&['a'], 'b').unwrap();

		assert!(matches!(left.merge(&right), Err(MarkovError::Overflow)));
		assert!(!left.contains(&['z']));
	}
}
