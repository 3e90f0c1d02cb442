use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised by the language model and its frequency lists.
///
/// Configuration errors (`InvalidWindowLength`, `InvalidSeedMode`) are raised
/// at construction. `IndexOutOfBounds`, `EmptyList` and `NotFinalized` mean
/// an internal ordering invariant was broken (sampling before finalization).
#[derive(Error, Debug)]
pub enum ModelError {
	/// Window length must be at least 1.
	#[error("window length must be >= 1, got {0}")]
	InvalidWindowLength(usize),

	/// Unrecognized seed mode string.
	#[error("invalid seed mode '{0}', expected 'random', 'fixed', 'fixed:<n>' or an integer")]
	InvalidSeedMode(String),

	/// Indexed access past the end of a frequency list.
	#[error("index {index} out of bounds for frequency list of length {len}")]
	IndexOutOfBounds { index: usize, len: usize },

	/// Sampling from a list without records.
	#[error("cannot sample from an empty frequency list")]
	EmptyList,

	/// Sampling from a list whose probabilities are stale or never computed.
	#[error("frequency list sampled before its probabilities were finalized")]
	NotFinalized,

	/// Corpus could not be read.
	#[error("corpus I/O error: {0}")]
	Io(#[from] std::io::Error),
}
