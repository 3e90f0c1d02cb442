use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::error::{ModelError, Result};

/// Statistics for one character observed after a given window.
///
/// `probability` and `cumulative_probability` are only meaningful once the
/// owning [`FrequencyList`] has been finalized.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CharRecord {
	character: char,
	count: usize,
	probability: f64,
	cumulative_probability: f64,
}

impl CharRecord {
	fn new(character: char) -> Self {
		Self { character, count: 1, probability: 0.0, cumulative_probability: 0.0 }
	}

	pub fn character(&self) -> char {
		self.character
	}

	/// Number of times the character followed the window.
	pub fn count(&self) -> usize {
		self.count
	}

	pub fn probability(&self) -> f64 {
		self.probability
	}

	pub fn cumulative_probability(&self) -> f64 {
		self.cumulative_probability
	}
}

impl fmt::Display for CharRecord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({} {} {} {})", self.character, self.count, self.probability, self.cumulative_probability)
	}
}

/// Ordered distribution of the characters that follow one window.
///
/// Records are unique by character. A character seen for the first time is
/// inserted at the front, so iteration runs from the most recently first-seen
/// character to the oldest one. That order is the one used to accumulate
/// cumulative probabilities, and therefore decides which character a draw
/// lands on at a boundary.
///
/// ## Invariants
/// - Every count is >= 1
/// - Once finalized, the last record's cumulative probability is exactly 1.0
/// - Any mutation after finalization marks the list as not finalized
#[derive(Serialize, Clone, Debug, Default)]
pub struct FrequencyList {
	records: VecDeque<CharRecord>,
	#[serde(skip)]
	finalized: bool,
}

impl FrequencyList {
	/// Creates an empty list.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Whether probabilities reflect the current counts.
	pub fn is_finalized(&self) -> bool {
		self.finalized
	}

	/// Sum of all counts in the list.
	pub fn total_count(&self) -> usize {
		self.records.iter().map(CharRecord::count).sum()
	}

	/// Forward iteration, front first.
	pub fn iter(&self) -> impl Iterator<Item = &CharRecord> {
		self.records.iter()
	}

	pub fn first(&self) -> Option<&CharRecord> {
		self.records.front()
	}

	/// Position of `ch` in iteration order.
	pub fn index_of(&self, ch: char) -> Option<usize> {
		self.records.iter().position(|record| record.character == ch)
	}

	/// Looks up the record for `ch`. Linear in the list length.
	pub fn find(&self, ch: char) -> Option<&CharRecord> {
		self.records.iter().find(|record| record.character == ch)
	}

	/// Returns the record at `index` in iteration order.
	///
	/// # Errors
	/// Returns `IndexOutOfBounds` if `index >= len()`.
	pub fn get(&self, index: usize) -> Result<&CharRecord> {
		self.records
			.get(index)
			.ok_or(ModelError::IndexOutOfBounds { index, len: self.records.len() })
	}

	/// Records one occurrence of `ch` after this list's window.
	///
	/// - If `ch` is already present, its count is increased.
	/// - Otherwise a record with a count of 1 is inserted at the front.
	pub fn record_occurrence(&mut self, ch: char) {
		match self.records.iter_mut().find(|record| record.character == ch) {
			Some(record) => record.count += 1,
			None => self.records.push_front(CharRecord::new(ch)),
		}
		self.finalized = false;
	}

	/// Removes the record for `ch`. Returns `false` if it was absent.
	pub fn remove(&mut self, ch: char) -> bool {
		match self.index_of(ch) {
			Some(index) => {
				self.records.remove(index);
				self.finalized = false;
				true
			}
			None => false,
		}
	}

	/// Computes probability and cumulative probability for every record.
	///
	/// Runs in two passes: the total count first, then the normalization in
	/// iteration order. The last cumulative probability is clamped to 1.0 to
	/// absorb rounding drift. An empty list is left untouched.
	pub fn finalize_probabilities(&mut self) {
		let total = self.total_count();
		if total == 0 {
			return;
		}

		let mut cumulative = 0.0;
		for record in self.records.iter_mut() {
			record.probability = record.count as f64 / total as f64;
			cumulative += record.probability;
			record.cumulative_probability = cumulative;
		}
		if let Some(last) = self.records.back_mut() {
			last.cumulative_probability = 1.0;
		}
		self.finalized = true;
	}

	/// Monte Carlo selection from a uniform draw `r` in `[0, 1)`.
	///
	/// Returns the first record whose cumulative probability is strictly
	/// greater than `r`, or the last record if none is (draws rounding to 1.0).
	///
	/// # Errors
	/// - `EmptyList` if the list has no records
	/// - `NotFinalized` if probabilities were not computed since the last change
	pub fn sample_by_cumulative(&self, r: f64) -> Result<&CharRecord> {
		if self.records.is_empty() {
			return Err(ModelError::EmptyList);
		}
		if !self.finalized {
			return Err(ModelError::NotFinalized);
		}

		self.records
			.iter()
			.find(|record| record.cumulative_probability > r)
			.or_else(|| self.records.back())
			.ok_or(ModelError::EmptyList)
	}
}

impl<'a> IntoIterator for &'a FrequencyList {
	type Item = &'a CharRecord;
	type IntoIter = std::collections::vec_deque::Iter<'a, CharRecord>;

	fn into_iter(self) -> Self::IntoIter {
		self.records.iter()
	}
}

impl fmt::Display for FrequencyList {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.records.is_empty() {
			return write!(f, "()");
		}
		for (index, record) in self.records.iter().enumerate() {
			if index > 0 {
				write!(f, " ")?;
			}
			write!(f, "{}", record)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn list_of(chars: &str) -> FrequencyList {
		let mut list = FrequencyList::new();
		for ch in chars.chars() {
			list.record_occurrence(ch);
		}
		list
	}

	#[test]
	fn new_characters_go_to_the_front() {
		let list = list_of("abc");
		let order: Vec<char> = list.iter().map(CharRecord::character).collect();
		assert_eq!(order, vec!['c', 'b', 'a']);
	}

	#[test]
	fn repeated_character_increments_in_place() {
		let mut list = list_of("ab");
		list.record_occurrence('a');
		list.record_occurrence('a');

		assert_eq!(list.len(), 2);
		assert_eq!(list.find('a').unwrap().count(), 3);
		assert_eq!(list.index_of('a'), Some(1));
		assert_eq!(list.total_count(), 4);
	}

	#[test]
	fn counts_never_decrease() {
		let mut list = FrequencyList::new();
		let mut previous = 0;
		for _ in 0..10 {
			list.record_occurrence('z');
			let count = list.find('z').unwrap().count();
			assert!(count > previous);
			previous = count;
		}
	}

	#[test]
	fn finalize_sets_probabilities_in_iteration_order() {
		// iteration order: c(1) b(1) a(2)
		let mut list = list_of("abca");
		list.finalize_probabilities();

		let c = list.get(0).unwrap();
		assert_eq!(c.character(), 'c');
		assert_eq!(c.probability(), 0.25);
		assert_eq!(c.cumulative_probability(), 0.25);

		let b = list.get(1).unwrap();
		assert_eq!(b.cumulative_probability(), 0.5);

		let a = list.get(2).unwrap();
		assert_eq!(a.probability(), 0.5);
		assert_eq!(a.cumulative_probability(), 1.0);
	}

	#[test]
	fn last_cumulative_is_clamped_to_one() {
		// ten tenths do not sum to exactly 1.0
		let mut list = list_of("abcdefghij");
		list.finalize_probabilities();
		assert_eq!(list.iter().last().unwrap().cumulative_probability(), 1.0);

		let sum: f64 = list.iter().map(CharRecord::probability).sum();
		assert!((sum - 1.0).abs() < 1e-9);
	}

	#[test]
	fn finalize_on_empty_list_is_noop() {
		let mut list = FrequencyList::new();
		list.finalize_probabilities();
		assert!(list.is_empty());
		assert!(!list.is_finalized());
	}

	#[test]
	fn sample_picks_first_strictly_greater_cumulative() {
		// iteration order: y then x, 0.5 each
		let mut list = list_of("xy");
		list.finalize_probabilities();

		assert_eq!(list.sample_by_cumulative(0.0).unwrap().character(), 'y');
		assert_eq!(list.sample_by_cumulative(0.25).unwrap().character(), 'y');
		// boundary: 0.5 is not strictly below y's cumulative
		assert_eq!(list.sample_by_cumulative(0.5).unwrap().character(), 'x');
		assert_eq!(list.sample_by_cumulative(0.999_999).unwrap().character(), 'x');
	}

	#[test]
	fn sample_falls_back_to_last_record() {
		let mut list = list_of("xy");
		list.finalize_probabilities();
		assert_eq!(list.sample_by_cumulative(1.0).unwrap().character(), 'x');
	}

	#[test]
	fn sample_on_empty_list_fails() {
		let list = FrequencyList::new();
		assert!(matches!(list.sample_by_cumulative(0.1), Err(ModelError::EmptyList)));
	}

	#[test]
	fn sample_before_finalization_fails() {
		let mut list = list_of("ab");
		assert!(matches!(list.sample_by_cumulative(0.1), Err(ModelError::NotFinalized)));

		list.finalize_probabilities();
		assert!(list.sample_by_cumulative(0.1).is_ok());

		list.record_occurrence('c');
		assert!(matches!(list.sample_by_cumulative(0.1), Err(ModelError::NotFinalized)));
	}

	#[test]
	fn get_out_of_bounds_fails() {
		let list = list_of("ab");
		assert!(matches!(list.get(2), Err(ModelError::IndexOutOfBounds { index: 2, len: 2 })));
	}

	#[test]
	fn remove_front_middle_and_missing() {
		let mut list = list_of("abc");
		assert!(list.remove('b'));
		assert!(list.remove('c'));
		assert!(!list.remove('q'));
		assert_eq!(list.len(), 1);
		assert_eq!(list.first().unwrap().character(), 'a');
	}

	#[test]
	fn display_lists_records_front_first() {
		assert_eq!(FrequencyList::new().to_string(), "()");

		let mut list = list_of("aab");
		list.finalize_probabilities();
		assert_eq!(list.to_string(), "(b 1 0.3333333333333333 0.3333333333333333) (a 2 0.6666666666666666 1)");
	}

	#[test]
	fn display_does_not_wrap_single_record() {
		let mut list = list_of("aa");
		list.finalize_probabilities();
		assert_eq!(list.to_string(), "(a 2 1 1)");
		assert!(!list.to_string().starts_with("(("));
	}
}
