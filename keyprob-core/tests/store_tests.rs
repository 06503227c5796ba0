use keyprob_core::model::store::SequenceStore;
use rstest::rstest;

fn trained(text: &str, max_depth: usize, min: u64) -> SequenceStore {
	let chars: Vec<char> = text.chars().collect();
	let mut store = SequenceStore::new(max_depth, min);
	for i in max_depth..chars.len() {
		let context: String = chars[i - max_depth..i].iter().collect();
		store.record_transition(chars[i], &context);
	}
	store
}

// Positions 2..=5 give four transitions; "ab" -> 'c' appears at 2 and 5.
#[rstest]
#[case("ab", 'c', 2)]
#[case("bc", 'a', 1)]
#[case("ca", 'b', 1)]
#[case("b", 'c', 2)]
#[case("c", 'a', 1)]
#[case("a", 'b', 1)]
fn abcabc_records_each_transition(#[case] key: &str, #[case] next: char, #[case] count: u64) {
	let store = trained("abcabc", 2, 1);
	let sequence = store.get(key).unwrap();
	assert_eq!(sequence.count(next), count, "{key} -> {next}");
	assert_eq!(sequence.total(), count);
}

#[test]
fn abcabc_creates_no_other_sequences() {
	let store = trained("abcabc", 2, 1);
	assert_eq!(store.len(), 6);
}

#[test]
fn under_sampled_context_falls_through_to_shorter() {
	// "ab" seen once, "b" seen twice
	let mut store = SequenceStore::new(2, 2);
	store.record_transition('c', "ab");
	store.record_transition('x', "zb");

	let distribution = store.resolve("ab");
	assert_eq!(store.get("ab").unwrap().total(), 1);
	assert!((distribution.get('c') - 0.5).abs() < 1e-12);
	assert!((distribution.get('x') - 0.5).abs() < 1e-12);
	assert_eq!(store.resolve_sequence("ab").unwrap().key(), "b");
}

#[test]
fn under_sampled_everywhere_uses_fallback() {
	let mut store = SequenceStore::new(2, 2);
	store.record_transition('c', "ab");

	assert!(store.resolve_sequence("ab").is_none());
	assert_eq!(store.resolve("ab"), store.fallback());
}

#[test]
fn longest_qualifying_context_wins() {
	let mut store = SequenceStore::new(2, 2);
	for _ in 0..2 {
		store.record_transition('e', "th");
	}
	store.record_transition('a', "sh");
	store.record_transition('a', "sh");

	assert_eq!(store.resolve("th").get('e'), 1.0);
	assert_eq!(store.resolve("sh").get('a'), 1.0);
	// Shorter context mixes both
	assert_eq!(store.resolve("h").get('e'), 0.5);
}

#[rstest]
#[case("")]
#[case("q")]
#[case("zz")]
fn unseen_context_uses_fallback(#[case] context: &str) {
	let store = trained("hello world", 2, 1);
	assert_eq!(store.resolve(context), store.fallback());
}

#[test]
fn zero_threshold_accepts_single_observation() {
	let mut store = SequenceStore::new(1, 0);
	store.record_transition('b', "a");
	assert_eq!(store.resolve("a").get('b'), 1.0);
}
