use std::borrow::Borrow;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{MarkovError, Result};

/// Fixed-length window of the `order` symbols preceding a transition.
///
/// The window is the key of the transition table. Symbols are stored
/// oldest first and never change after construction.
///
/// # Invariants
/// - Equality and hashing only depend on the ordered symbols, so a window
///   built from an array, a `Vec` or a `VecDeque` is the same key.
/// - Hashing is identical to hashing the plain slice `[T]`, which lets a
///   table be probed with `&[T]` through `Borrow`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct ContextWindow<T> {
	symbols: Box<[T]>,
}

impl<T> ContextWindow<T> {
	/// Builds a window from any ordered source of exactly `order` symbols.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `order` is 0 or if the source does not
	/// yield exactly `order` symbols.
	pub fn new<I>(order: usize, source: I) -> Result<Self>
	where
		I: IntoIterator<Item = T>,
	{
		if order == 0 {
			return Err(MarkovError::invalid("order must be >= 1"));
		}
		let symbols: Box<[T]> = source.into_iter().take(order + 1).collect();
		if symbols.len() != order {
			return Err(MarkovError::invalid(format!(
				"context needs exactly {} symbols",
				order
			)));
		}
		Ok(Self { symbols })
	}

	/// Ordered symbols of the window, oldest first.
	pub fn symbols(&self) -> &[T] {
		&self.symbols
	}

	pub fn len(&self) -> usize {
		self.symbols.len()
	}

	pub fn is_empty(&self) -> bool {
		self.symbols.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.symbols.iter()
	}
}

impl<T: Clone> ContextWindow<T> {
	/// Window over a slice whose length is already the model order.
	pub(crate) fn from_slice(symbols: &[T]) -> Self {
		Self { symbols: symbols.into() }
	}
}

impl<T: Hash> Hash for ContextWindow<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.symbols[..].hash(state);
	}
}

impl<T> Borrow<[T]> for ContextWindow<T> {
	fn borrow(&self) -> &[T] {
		&self.symbols
	}
}

impl<'a, T> IntoIterator for &'a ContextWindow<T> {
	type Item = &'a T;
	type IntoIter = std::slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.symbols.iter()
	}
}
