use std::collections::HashMap;

use tracing::trace;

use super::distribution::Distribution;
use super::sequence::Sequence;

/// Multi-depth context statistics with confidence-floored fallback.
///
/// The store keeps one `Sequence` per observed context string, at every
/// depth from 1 to `max_depth`. A single observation updates up to
/// `max_depth` sequences, one per context length.
///
/// # Invariants
/// - `max_depth` is always >= 1
/// - Every key has between 1 and `max_depth` characters
/// - `fallback` is never mutated
#[derive(Clone, Debug)]
pub struct SequenceStore {
	max_depth: usize,
	min_acceptable_datapoints: u64,
	sequences: HashMap<String, Sequence>,
	fallback: Distribution,
}

/// Returns the last `n` characters of `chars` (all of them if shorter).
fn suffix(chars: &[char], n: usize) -> &[char] {
	&chars[chars.len().saturating_sub(n)..]
}

impl SequenceStore {
	/// Creates an empty store using the letter-frequency prior as fallback.
	///
	/// `max_depth` is clamped to at least 1; callers validate beforehand.
	pub fn new(max_depth: usize, min_acceptable_datapoints: u64) -> Self {
		Self {
			max_depth: max_depth.max(1),
			min_acceptable_datapoints,
			sequences: HashMap::new(),
			fallback: Distribution::letter_frequencies(),
		}
	}

	/// Creates a store from already-built sequences (e.g. a loaded model).
	pub fn with_sequences(
		max_depth: usize,
		min_acceptable_datapoints: u64,
		sequences: impl IntoIterator<Item = Sequence>,
	) -> Self {
		let mut store = Self::new(max_depth, min_acceptable_datapoints);
		store.sequences = sequences
			.into_iter()
			.map(|sequence| (sequence.key().to_owned(), sequence))
			.collect();
		store
	}

	/// Records that `next_char` followed `context`.
	///
	/// For every depth `d` in `1..=max_depth`, the last `d` characters of
	/// `context` form a key whose sequence gets the occurrence. Depths longer
	/// than the context are skipped, never padded.
	pub fn record_transition(&mut self, next_char: char, context: &str) {
		let chars: Vec<char> = context.chars().collect();

		for depth in 1..=self.max_depth.min(chars.len()) {
			let key: String = suffix(&chars, depth).iter().collect();
			match self.sequences.get_mut(&key) {
				Some(sequence) => sequence.record_occurrence(next_char),
				None => {
					let sequence = Sequence::first_observation(&key, next_char);
					self.sequences.insert(key, sequence);
				}
			}
		}
	}

	/// Resolves the distribution of the character following `context`.
	///
	/// Searches from the longest usable suffix down to a single character and
	/// returns the first sequence backed by at least
	/// `min_acceptable_datapoints` observations (and at least one, so the
	/// result is never empty). Falls back to the global prior when none
	/// qualifies.
	pub fn resolve(&self, context: &str) -> &Distribution {
		match self.resolve_sequence(context) {
			Some(sequence) => sequence.probabilities(),
			None => {
				trace!(context, "no acceptable sequence, using fallback");
				&self.fallback
			}
		}
	}

	/// Like `resolve`, but returns the matched sequence itself, or `None`
	/// when the fallback would be used.
	pub fn resolve_sequence(&self, context: &str) -> Option<&Sequence> {
		let chars: Vec<char> = context.chars().collect();

		(1..=self.max_depth.min(chars.len())).rev().find_map(|depth| {
			let key: String = suffix(&chars, depth).iter().collect();
			self.sequences
				.get(&key)
				.filter(|sequence| sequence.total() > 0 && sequence.total() >= self.min_acceptable_datapoints)
		})
	}

	pub fn get(&self, key: &str) -> Option<&Sequence> {
		self.sequences.get(key)
	}

	/// Iterates over all sequences in unspecified order.
	pub fn iter(&self) -> impl Iterator<Item = &Sequence> {
		self.sequences.values()
	}

	pub fn len(&self) -> usize {
		self.sequences.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sequences.is_empty()
	}

	pub fn max_depth(&self) -> usize {
		self.max_depth
	}

	pub fn min_acceptable_datapoints(&self) -> u64 {
		self.min_acceptable_datapoints
	}

	pub fn fallback(&self) -> &Distribution {
		&self.fallback
	}
}
