use keyprob_core::model::store::SequenceStore;
use keyprob_core::{KeyEvent, KeypressModel, ModelConfig};
use proptest::prelude::*;

// --- STRATEGIES ---

fn arb_text() -> impl Strategy<Value = String> {
	"[a-e ]{0,60}"
}

fn arb_key_name() -> impl Strategy<Value = String> {
	prop_oneof![
		"[a-z]",
		Just("space".to_owned()),
		Just("f6".to_owned()),
		Just("shift".to_owned()),
	]
}

fn train(store: &mut SequenceStore, text: &str) {
	let chars: Vec<char> = text.chars().collect();
	let depth = store.max_depth();
	for i in depth..chars.len() {
		let context: String = chars[i - depth..i].iter().collect();
		store.record_transition(chars[i], &context);
	}
}

proptest! {
	#[test]
	fn probabilities_sum_to_one(text in arb_text(), depth in 1usize..4) {
		let mut store = SequenceStore::new(depth, 1);
		train(&mut store, &text);

		for sequence in store.iter() {
			prop_assert!(sequence.total() > 0);
			prop_assert_eq!(sequence.total(), sequence.counts().values().sum::<u64>());
			prop_assert!((sequence.probabilities().total() - 1.0).abs() < 1e-9);
		}
	}

	#[test]
	fn resolve_picks_longest_qualifying_suffix(
		text in arb_text(),
		context in "[a-e ]{0,4}",
		depth in 1usize..4,
		min in 0u64..4,
	) {
		let mut store = SequenceStore::new(depth, min);
		train(&mut store, &text);

		let chars: Vec<char> = context.chars().collect();
		let expected = (1..=depth.min(chars.len()))
			.rev()
			.map(|d| chars[chars.len() - d..].iter().collect::<String>())
			.find_map(|key| store.get(&key).filter(|s| s.total() >= min));

		match expected {
			Some(sequence) => prop_assert_eq!(store.resolve(&context), sequence.probabilities()),
			None => prop_assert_eq!(store.resolve(&context), store.fallback()),
		}
	}

	#[test]
	fn rolling_context_never_exceeds_max_depth(
		names in proptest::collection::vec(arb_key_name(), 0..50),
		depth in 1usize..5,
	) {
		let mut model = KeypressModel::in_memory(ModelConfig::new("prop").with_max_depth(depth)).unwrap();
		model.enable_keystroke_training();
		model.subscribe_to_predictions(|distribution| {
			assert!((distribution.total() - 1.0).abs() < 1e-9);
		});

		for name in names {
			model.on_key_event(&KeyEvent::new(name));
			prop_assert!(model.rolling_context().chars().count() <= depth);
		}
	}
}
