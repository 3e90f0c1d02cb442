use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::frequency_list::FrequencyList;
use super::seed::SeedMode;
use crate::error::{ModelError, Result};
use crate::io::read_corpus;

/// Character-level sliding-window language model.
///
/// For every window of `window_length` consecutive characters seen in the
/// training corpus, the model keeps a [`FrequencyList`] of the characters that
/// followed it. Generation extends a seed text one character at a time by
/// sampling from the list of its trailing window.
///
/// # Responsibilities
/// - Build the window → frequency list mapping from a corpus (`train`)
/// - Normalize every list once the whole corpus has been scanned
/// - Generate text from a seed with the model's own random generator
///
/// # Invariants
/// - `window_length` is always >= 1
/// - Every key in `lists` is exactly `window_length` characters long
/// - After `train`, every list is finalized
///
/// # Concurrency
/// `train` and `generate` mutate the model (the generator state advances on
/// every draw). Share a model behind a lock, or use one model per thread.
#[derive(Serialize, Clone, Debug)]
pub struct LanguageModel {
	/// Number of characters in a lookup window.
	window_length: usize,

	/// Concrete seed of `rng`, kept so a random run can be replayed.
	seed: u64,

	/// Mapping from a window to the distribution of its next character.
	lists: HashMap<String, FrequencyList>,

	#[serde(skip)]
	rng: StdRng,
}

impl LanguageModel {
	/// Creates an untrained model.
	///
	/// # Errors
	/// Returns `InvalidWindowLength` if `window_length` is 0.
	pub fn new(window_length: usize, seed_mode: SeedMode) -> Result<Self> {
		if window_length == 0 {
			return Err(ModelError::InvalidWindowLength(window_length));
		}

		let seed = seed_mode.resolve();
		debug!("new language model: window length {}, seed {} ({})", window_length, seed, seed_mode);

		Ok(Self {
			window_length,
			seed,
			lists: HashMap::new(),
			rng: StdRng::seed_from_u64(seed),
		})
	}

	pub fn window_length(&self) -> usize {
		self.window_length
	}

	/// The concrete seed of the generator. `LanguageModel::new(n, SeedMode::Fixed(seed))`
	/// replays a model built with `SeedMode::Random`.
	pub fn seed(&self) -> u64 {
		self.seed
	}

	/// Number of distinct windows learned.
	pub fn len(&self) -> usize {
		self.lists.len()
	}

	/// `true` while the model is untrained (or trained on a too short corpus).
	pub fn is_empty(&self) -> bool {
		self.lists.is_empty()
	}

	/// Returns the frequency list learned for `window`, if any.
	pub fn get(&self, window: &str) -> Option<&FrequencyList> {
		self.lists.get(window)
	}

	/// Iterates over every learned `(window, list)` pair, in no particular order.
	pub fn windows(&self) -> impl Iterator<Item = (&str, &FrequencyList)> {
		self.lists.iter().map(|(window, list)| (window.as_str(), list))
	}

	/// Learns window statistics from `corpus`.
	///
	/// Slides a window of `window_length` characters one character at a time
	/// and records the character right after it. The trailing window has no
	/// follower and is not recorded. Once the whole corpus is scanned, every
	/// list is finalized.
	///
	/// # Notes
	/// - A corpus with no more than `window_length` characters leaves the
	///   model untouched.
	/// - UTF-8 safe: windows are counted in characters, not bytes.
	pub fn train(&mut self, corpus: &str) {
		let chars: Vec<char> = corpus.chars().collect();
		if chars.len() < self.window_length + 1 {
			debug!(
				"corpus of {} characters is too short for window length {}, nothing learned",
				chars.len(),
				self.window_length
			);
			return;
		}

		for ngram in chars.windows(self.window_length + 1) {
			let (window, next) = ngram.split_at(self.window_length);
			let key: String = window.iter().collect();
			self.lists.entry(key).or_default().record_occurrence(next[0]);
		}

		for list in self.lists.values_mut() {
			list.finalize_probabilities();
		}

		debug!(
			"trained on {} characters: {} windows of length {}",
			chars.len(),
			self.lists.len(),
			self.window_length
		);
	}

	/// Loads a corpus with [`read_corpus`] and trains on it.
	///
	/// # Errors
	/// Returns `Io` if the corpus cannot be read.
	pub fn train_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
		let corpus = read_corpus(&path)?;
		debug!("loaded corpus {}", path.as_ref().display());
		self.train(&corpus);
		Ok(())
	}

	/// Generates text starting from `seed_text`.
	///
	/// `requested_length` is the TOTAL length of the returned text in
	/// characters, seed included: a seed of 3 characters and a requested
	/// length of 10 yields at most 7 new characters.
	///
	/// Generation stops early, returning what was produced so far, when the
	/// trailing window was never seen during training.
	///
	/// # Notes
	/// - A seed shorter than `window_length` is returned unchanged.
	/// - A seed already `requested_length` characters or longer is returned unchanged.
	/// - Fully reproducible for a given seed, corpus and arguments.
	///
	/// # Errors
	/// Only fails if a list is sampled before being finalized, which `train`
	/// never leaves behind.
	pub fn generate(&mut self, seed_text: &str, requested_length: usize) -> Result<String> {
		let mut generated: Vec<char> = seed_text.chars().collect();
		if generated.len() < self.window_length {
			trace!("seed text shorter than window length {}, returned as is", self.window_length);
			return Ok(seed_text.to_owned());
		}

		while generated.len() < requested_length {
			let window: String = generated[generated.len() - self.window_length..].iter().collect();
			let Some(list) = self.lists.get(&window) else {
				trace!("window {:?} never seen, generation stops at {} characters", window, generated.len());
				break;
			};

			let r: f64 = self.rng.random();
			generated.push(list.sample_by_cumulative(r)?.character());
		}

		Ok(generated.into_iter().collect())
	}

	/// Human readable dump of every window and its list, sorted by window.
	///
	/// Diagnostics only, the format is not stable.
	pub fn to_debug_string(&self) -> String {
		self.to_string()
	}
}

impl fmt::Display for LanguageModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut windows: Vec<_> = self.lists.iter().collect();
		windows.sort_by(|a, b| a.0.cmp(b.0));
		for (window, list) in windows {
			writeln!(f, "{} : {}", window, list)?;
		}
		Ok(())
	}
}
