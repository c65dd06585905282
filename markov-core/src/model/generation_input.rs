/// Maximum number of generated symbols used by default.
pub const DEFAULT_MAX_LENGTH: usize = 100;

/// Strategy used to select the starting context when generating.
///
/// # Variants
/// - `Random`: start from a context picked uniformly among the trained ones.
/// - `Custom(Vec<T>)`: start from the given symbols (at least `order` of them).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartSeed<T> {
	Random,
	Custom(Vec<T>),
}

/// Input parameters for a generation.
///
/// # Responsibilities
/// - Bound the amount of generated symbols (`max_length`)
/// - Fix the random seed so a generation can be replayed
/// - Choose how the first context is obtained (`start_seed`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationInput<T> {
	/// Maximum number of symbols appended after the start.
	pub max_length: usize,

	/// Seed of the random source.
	pub seed: u64,

	/// Starting context strategy.
	pub start_seed: StartSeed<T>,
}

impl<T> Default for GenerationInput<T> {
	fn default() -> Self {
		Self {
			max_length: DEFAULT_MAX_LENGTH,
			seed: 0,
			start_seed: StartSeed::Random,
		}
	}
}

impl<T> GenerationInput<T> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = max_length;
		self
	}

	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = seed;
		self
	}

	/// Starts the generation from `start` instead of a random context.
	pub fn with_start(mut self, start: impl Into<Vec<T>>) -> Self {
		self.start_seed = StartSeed::Custom(start.into());
		self
	}
}
