//! Roulette (weighted) selection.
//!
//! Picks one item among `N` with a probability proportional to its weight,
//! using a cumulative distribution and a lower-bound search.

use rand::Rng;

use crate::error::{MarkovError, Result};

/// Returns an item with probability proportional to its weight.
///
/// # Parameters
/// - `items`: candidates, returned by reference.
/// - `weights`: one non-negative, finite weight per item.
/// - `rng`: random source used for the single uniform draw.
///
/// # Errors
/// Returns `InvalidArgument` if:
/// - `items` and `weights` have different lengths
/// - there is no item
/// - a weight is negative or not finite
/// - every weight is zero
///
/// # Notes
/// - Inputs are never modified.
/// - The draw is scaled by the last cumulative value (nominally 1.0) so
///   floating rounding cannot push it past the distribution.
pub fn select<'a, X, R>(items: &'a [X], weights: &[f64], rng: &mut R) -> Result<&'a X>
where
	R: Rng + ?Sized,
{
	if items.len() != weights.len() {
		return Err(MarkovError::invalid("length mismatch"));
	}
	let index = select_index(weights, rng)?;
	Ok(&items[index])
}

/// Index of a weight picked with probability proportional to its value.
///
/// Same rules and errors as [`select`], without the item slice.
pub fn select_index<R>(weights: &[f64], rng: &mut R) -> Result<usize>
where
	R: Rng + ?Sized,
{
	if weights.is_empty() {
		return Err(MarkovError::invalid("no item to select"));
	}
	if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
		return Err(MarkovError::invalid("weights must be finite and non-negative"));
	}

	// Weights are divided by the largest one so their sum stays finite
	let largest = weights.iter().copied().fold(0.0, f64::max);
	if largest == 0.0 {
		return Err(MarkovError::invalid("every weight is zero"));
	}
	let total: f64 = weights.iter().map(|w| w / largest).sum();

	// Cumulative probabilities
	let cumulative: Vec<f64> = weights
		.iter()
		.scan(0.0, |acc, w| {
			*acc += w / largest / total;
			Some(*acc)
		})
		.collect();

	let last = cumulative[cumulative.len() - 1];
	let target = rng.random::<f64>() * last;

	// Smallest index whose cumulative value is >= target
	Ok(cumulative.partition_point(|&c| c < target).min(weights.len() - 1))
}

/// Same as [`select`], drawing from the calling thread's generator.
pub fn select_default<'a, X>(items: &'a [X], weights: &[f64]) -> Result<&'a X> {
	select(items, weights, &mut rand::rng())
}
