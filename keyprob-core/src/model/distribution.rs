use std::cmp::Ordering;
use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Relative frequencies of English letters, used as the fallback prior.
const LETTER_FREQUENCIES: [(char, f64); 26] = [
	('e', 0.12702),
	('t', 0.09056),
	('a', 0.08167),
	('o', 0.07507),
	('i', 0.06966),
	('n', 0.06749),
	('s', 0.06327),
	('h', 0.06094),
	('r', 0.05987),
	('d', 0.04253),
	('l', 0.04025),
	('c', 0.02782),
	('u', 0.02758),
	('m', 0.02406),
	('w', 0.0236),
	('f', 0.02228),
	('g', 0.02015),
	('y', 0.01974),
	('p', 0.01929),
	('b', 0.01492),
	('v', 0.00978),
	('k', 0.00772),
	('j', 0.00153),
	('x', 0.0015),
	('q', 0.00095),
	('z', 0.00074),
];

/// Probability distribution over the next character.
///
/// This is what subscribers receive on every qualifying key event.
///
/// # Invariants
/// - Every probability is in `(0, 1]`
/// - Probabilities sum to 1.0 (within floating tolerance), unless the
///   distribution is empty
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Distribution {
	probabilities: HashMap<char, f64>,
}

impl Distribution {
	/// Builds a distribution from occurrence counts.
	///
	/// Equivalent to `from_weights` with integer weights; a zero total
	/// yields an empty distribution.
	pub fn from_counts(counts: &HashMap<char, u64>) -> Self {
		Self::from_weights(counts.iter().map(|(c, count)| (*c, *count as f64)))
	}

	/// Normalizes non-negative weights into probabilities.
	///
	/// - Zero weights are dropped.
	/// - If the total weight is zero, the distribution is empty.
	pub fn from_weights(weights: impl IntoIterator<Item = (char, f64)>) -> Self {
		let weights: Vec<(char, f64)> = weights.into_iter().filter(|(_, w)| *w > 0.0).collect();
		let total: f64 = weights.iter().map(|(_, w)| w).sum();

		if total <= 0.0 {
			return Self::default();
		}

		Self {
			probabilities: weights.into_iter().map(|(c, w)| (c, w / total)).collect(),
		}
	}

	/// The fixed global prior used when no learned context qualifies.
	pub fn letter_frequencies() -> Self {
		Self::from_weights(LETTER_FREQUENCIES)
	}

	/// Probability of `c`, 0.0 when never observed.
	pub fn get(&self, c: char) -> f64 {
		self.probabilities.get(&c).copied().unwrap_or(0.0)
	}

	pub fn iter(&self) -> impl Iterator<Item = (char, f64)> + '_ {
		self.probabilities.iter().map(|(c, p)| (*c, *p))
	}

	pub fn len(&self) -> usize {
		self.probabilities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.probabilities.is_empty()
	}

	/// Sum of all probabilities (≈1.0, or 0.0 when empty).
	pub fn total(&self) -> f64 {
		self.probabilities.values().sum()
	}

	/// The `n` most probable characters, most probable first.
	///
	/// Ties are ordered by character so the result is deterministic.
	pub fn top(&self, n: usize) -> Vec<(char, f64)> {
		let mut entries: Vec<(char, f64)> = self.iter().collect();
		entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
		entries.truncate(n);
		entries
	}

	/// The most probable character, if any.
	pub fn most_likely(&self) -> Option<char> {
		self.iter()
			.max_by(|a, b| match a.1.total_cmp(&b.1) {
				Ordering::Equal => b.0.cmp(&a.0),
				ordering => ordering,
			})
			.map(|(c, _)| c)
	}

	/// Draws a character using weighted random sampling.
	///
	/// Performs an O(n) cumulative scan. Returns `None` if the distribution
	/// is empty.
	pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<char> {
		if self.is_empty() {
			return None;
		}

		let mut r = rng.random_range(0.0..self.total());

		let mut fallback: Option<char> = None;
		for (c, p) in self.iter() {
			if r < p {
				return Some(c);
			}
			r -= p;
			fallback = Some(c);
		}

		// Floating point leftovers land on the last bucket
		fallback
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zero_total_is_empty() {
		let counts = HashMap::from([('a', 0), ('b', 0)]);
		let distribution = Distribution::from_counts(&counts);
		assert!(distribution.is_empty());
		assert_eq!(distribution.total(), 0.0);
		assert_eq!(distribution.most_likely(), None);
	}

	#[test]
	fn counts_are_normalized() {
		let counts = HashMap::from([('a', 3), ('b', 1)]);
		let distribution = Distribution::from_counts(&counts);
		assert!((distribution.get('a') - 0.75).abs() < 1e-12);
		assert!((distribution.get('b') - 0.25).abs() < 1e-12);
		assert_eq!(distribution.get('z'), 0.0);
	}

	#[test]
	fn letter_frequencies_sum_to_one() {
		let distribution = Distribution::letter_frequencies();
		assert_eq!(distribution.len(), 26);
		assert!((distribution.total() - 1.0).abs() < 1e-9);
		assert_eq!(distribution.most_likely(), Some('e'));
		assert_eq!(distribution.top(3).iter().map(|(c, _)| *c).collect::<String>(), "eta");
	}

	#[test]
	fn top_breaks_ties_by_char() {
		let distribution = Distribution::from_weights([('b', 1.0), ('a', 1.0), ('c', 2.0)]);
		let top: String = distribution.top(3).iter().map(|(c, _)| *c).collect();
		assert_eq!(top, "cab");
		assert_eq!(distribution.most_likely(), Some('c'));
	}

	#[test]
	fn sample_only_returns_known_chars() {
		let distribution = Distribution::from_weights([('x', 1.0), ('y', 3.0)]);
		let mut rng = rand::rng();
		for _ in 0..100 {
			let c = distribution.sample(&mut rng).unwrap();
			assert!(c == 'x' || c == 'y');
		}
		assert_eq!(Distribution::default().sample(&mut rng), None);
	}

	#[test]
	fn serializes_as_flat_map() {
		let distribution = Distribution::from_weights([('a', 1.0)]);
		let json = serde_json::to_string(&distribution).unwrap();
		assert_eq!(json, r#"{"a":1.0}"#);
	}
}
