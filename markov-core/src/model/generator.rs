use std::collections::VecDeque;

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::chain::MarkovChain;
use super::generation_input::{GenerationInput, StartSeed};
use super::symbol::Symbol;
use crate::error::{MarkovError, Result};

impl<T: Symbol> MarkovChain<T> {
	/// Generates a sequence from a context picked at random (cold start).
	///
	/// The random source is a `StdRng` seeded with `seed`, so the same model
	/// and seed always produce the same sequence.
	///
	/// # Errors
	/// Returns `EmptyModel` if nothing was trained.
	pub fn generate(&self, max_length: usize, seed: u64) -> Result<Vec<T>> {
		let mut rng = StdRng::seed_from_u64(seed);
		self.generate_with_rng(None, max_length, &mut rng)
	}

	/// Generates a sequence that continues `start` (warm start).
	///
	/// # Errors
	/// Returns `InvalidArgument` if `start` has fewer than `order` symbols.
	pub fn generate_from(&self, start: &[T], max_length: usize, seed: u64) -> Result<Vec<T>> {
		let mut rng = StdRng::seed_from_u64(seed);
		self.generate_with_rng(Some(start), max_length, &mut rng)
	}

	/// Generates a sequence as described by `input`.
	pub fn generate_with(&self, input: &GenerationInput<T>) -> Result<Vec<T>> {
		let mut rng = StdRng::seed_from_u64(input.seed);
		let start = match &input.start_seed {
			StartSeed::Random => None,
			StartSeed::Custom(symbols) => Some(symbols.as_slice()),
		};
		self.generate_with_rng(start, input.max_length, &mut rng)
	}

	/// Generation loop shared by every entry point.
	///
	/// # Parameters
	/// - `start`: symbols to continue, or `None` to pick a trained context.
	/// - `max_length`: maximum number of symbols appended after the start.
	/// - `rng`: random source for the start context and every sampling step.
	///
	/// # Returns
	/// The start symbols followed by the generated ones. Generation stops
	/// early, without error, when the current context was never trained.
	///
	/// # Errors
	/// - `EmptyModel` on a cold start with nothing trained.
	/// - `InvalidArgument` if `start` is shorter than the order.
	pub fn generate_with_rng<R: Rng + ?Sized>(
		&self,
		start: Option<&[T]>,
		max_length: usize,
		rng: &mut R,
	) -> Result<Vec<T>> {
		let order = self.order();
		let start: &[T] = match start {
			Some(symbols) => {
				if symbols.len() < order {
					return Err(MarkovError::invalid(format!(
						"start needs at least {} symbols, got {}",
						order,
						symbols.len()
					)));
				}
				symbols
			}
			None => self
				.table()
				.random_context(rng)
				.ok_or(MarkovError::EmptyModel)?
				.symbols(),
		};

		let mut sequence = Vec::with_capacity(start.len() + max_length);
		sequence.extend_from_slice(start);

		let mut window: VecDeque<T> = start[start.len() - order..].iter().cloned().collect();
		let mut weights = Vec::new();

		for _ in 0..max_length {
			let Some(transitions) = self.table().get(window.make_contiguous()) else {
				trace!("unknown context after {} symbols, generation stops", sequence.len());
				break;
			};
			let Some(next) = transitions.sample_with(&mut weights, rng)? else {
				break;
			};

			sequence.push(next.clone());
			window.pop_front();
			window.push_back(next.clone());
		}

		Ok(sequence)
	}
}
