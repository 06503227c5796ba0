use std::collections::HashMap;
use std::fmt;

use super::distribution::Distribution;

/// Statistics for one context string.
///
/// A `Sequence` corresponds to a context (the last 1..=max_depth typed
/// characters) and stores every character observed right after it.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Invariants
/// - `total` is always the sum of `counts`
/// - `probabilities` is recomputed on every change of `counts`
/// - An empty or all-zero `counts` yields empty `probabilities`
#[derive(Clone, Debug, PartialEq)]
pub struct Sequence {
	/// The context this record conditions on.
	key: String,
	/// Next character → number of times it followed `key`.
	/// Example: { 'e' => 42, 'a' => 3 }
	counts: HashMap<char, u64>,
	total: u64,
	probabilities: Distribution,
}

impl Sequence {
	/// Creates a sequence from raw counts (e.g. read from a model file).
	pub fn new(key: &str, counts: HashMap<char, u64>) -> Self {
		let total = counts.values().sum();
		let probabilities = Distribution::from_counts(&counts);
		Self {
			key: key.to_owned(),
			counts,
			total,
			probabilities,
		}
	}

	/// Creates a sequence from its first observation.
	pub fn first_observation(key: &str, next_char: char) -> Self {
		Self::new(key, HashMap::from([(next_char, 1)]))
	}

	/// Records an occurrence of `next_char` after this context.
	///
	/// - If the character was already seen, its count is increased.
	/// - Otherwise, it is added with a count of 1.
	pub fn record_occurrence(&mut self, next_char: char) {
		*self.counts.entry(next_char).or_insert(0) += 1;
		self.total += 1;
		self.probabilities = Distribution::from_counts(&self.counts);
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	/// Raw occurrence counts, as persisted.
	pub fn counts(&self) -> &HashMap<char, u64> {
		&self.counts
	}

	pub fn count(&self, next_char: char) -> u64 {
		self.counts.get(&next_char).copied().unwrap_or(0)
	}

	/// Number of observations (datapoints) backing this context.
	pub fn total(&self) -> u64 {
		self.total
	}

	pub fn probabilities(&self) -> &Distribution {
		&self.probabilities
	}
}

impl fmt::Display for Sequence {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Sequence for {:?} ({} datapoints):", self.key, self.total)?;
		for (c, p) in self.probabilities.top(self.probabilities.len()) {
			write!(f, " {c:?}={p:.3}")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn record_keeps_total_and_probabilities_in_sync() {
		let mut sequence = Sequence::first_observation("ab", 'c');
		sequence.record_occurrence('c');
		sequence.record_occurrence('d');

		assert_eq!(sequence.total(), 3);
		assert_eq!(sequence.count('c'), 2);
		assert_eq!(sequence.count('d'), 1);
		assert!((sequence.probabilities().get('c') - 2.0 / 3.0).abs() < 1e-12);
		assert!((sequence.probabilities().total() - 1.0).abs() < 1e-12);
	}

	#[test]
	fn empty_counts_have_no_probabilities() {
		let sequence = Sequence::new("a", HashMap::new());
		assert_eq!(sequence.total(), 0);
		assert!(sequence.probabilities().is_empty());
	}

	#[test]
	fn zero_count_becomes_usable_after_record() {
		let mut sequence = Sequence::new("a", HashMap::from([('b', 0)]));
		assert!(sequence.probabilities().is_empty());
		sequence.record_occurrence('b');
		assert_eq!(sequence.probabilities().get('b'), 1.0);
	}

	#[test]
	fn display_lists_most_probable_first() {
		let sequence = Sequence::new("t", HashMap::from([('h', 3), ('o', 1)]));
		assert_eq!(sequence.to_string(), "Sequence for \"t\" (4 datapoints): 'h'=0.750 'o'=0.250");
	}
}
