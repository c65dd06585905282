//! Error types shared by every model operation.

use thiserror::Error;

/// Failures reported by the Markov chain model.
///
/// Unknown contexts are not listed here: generation stops on them and
/// evaluation scores them with the floor probability.
#[derive(Debug, Error)]
pub enum MarkovError {
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	#[error("The model has no trained context")]
	EmptyModel,

	#[error("Transition count overflow")]
	Overflow,

	#[error("Serialization failed: {0}")]
	Serialization(#[from] postcard::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl MarkovError {
	pub fn invalid(message: impl Into<String>) -> Self {
		MarkovError::InvalidArgument(message.into())
	}
}

pub type Result<T> = std::result::Result<T, MarkovError>;
