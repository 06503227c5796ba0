use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::config::ModelConfig;
use super::distribution::Distribution;
use super::snapshot::ModelSnapshot;
use super::store::SequenceStore;
use crate::error::ModelResult;
use crate::events::KeyEventSource;
use crate::io::{ensure_dir, model_path, read_file};
use crate::keys::{KeyEvent, key_to_char};

/// Callback receiving the next-character distribution after a key press.
pub type PredictionCallback = Box<dyn FnMut(&Distribution) + Send>;

/// Adaptive next-character model driven by key events.
///
/// This struct manages:
/// - `store`: the multi-depth statistics
/// - `config`: name, description and limits, persisted with the statistics
/// - `rolling_context`: the last `max_depth` accepted characters
/// - `subscribers`: prediction callbacks, called in registration order
///
/// Events are processed one at a time and completely; the model holds no
/// internal lock. Hosts sharing it between threads must serialize access to
/// `on_key_event` and `persist`.
pub struct KeypressModel {
	config: ModelConfig,
	store: SequenceStore,
	rolling_context: VecDeque<char>,
	training_with_keys: bool,
	broadcasting: bool,
	subscribers: Vec<PredictionCallback>,
}

impl KeypressModel {
	/// Loads the model named `defaults.name` from `defaults.model_dir`, or
	/// creates a fresh one from `defaults` if no such file exists.
	///
	/// - Creates the model directory if needed.
	/// - When a file exists, all of `defaults` except `name` and `model_dir`
	///   is overridden by its content.
	///
	/// # Errors
	/// - `Config` if `defaults` are invalid and no file exists
	/// - `CorruptSnapshot` if the file exists but is incomplete or invalid
	/// - `Io` on file system failures
	pub fn load_or_create(defaults: ModelConfig) -> ModelResult<Self> {
		ensure_dir(&defaults.model_dir)?;
		let path = model_path(&defaults.model_dir, &defaults.name);

		let (config, store) = if path.is_file() {
			let (config, store) = ModelSnapshot::read(&path)?.into_model(&defaults, &path)?;
			info!(
				"Loaded model '{}' from {} ({} sequences, max depth {})",
				config.name,
				path.display(),
				store.len(),
				config.max_depth
			);
			(config, store)
		} else {
			defaults.validate()?;
			info!("Creating new model '{}' (max depth {})", defaults.name, defaults.max_depth);
			let store = SequenceStore::new(defaults.max_depth, defaults.min_acceptable_datapoints);
			(defaults, store)
		};

		Ok(Self::from_parts(config, store))
	}

	/// Builds an in-memory model without touching the file system.
	///
	/// # Errors
	/// Returns an error if the configuration is invalid.
	pub fn in_memory(config: ModelConfig) -> ModelResult<Self> {
		config.validate()?;
		let store = SequenceStore::new(config.max_depth, config.min_acceptable_datapoints);
		Ok(Self::from_parts(config, store))
	}

	fn from_parts(config: ModelConfig, store: SequenceStore) -> Self {
		Self {
			rolling_context: VecDeque::with_capacity(config.max_depth + 1),
			config,
			store,
			training_with_keys: false,
			broadcasting: false,
			subscribers: Vec::new(),
		}
	}

	pub fn name(&self) -> &str {
		&self.config.name
	}

	pub fn description(&self) -> &str {
		&self.config.description
	}

	pub fn max_depth(&self) -> usize {
		self.config.max_depth
	}

	pub fn config(&self) -> &ModelConfig {
		&self.config
	}

	pub fn store(&self) -> &SequenceStore {
		&self.store
	}

	/// Path of this model's file.
	pub fn path(&self) -> PathBuf {
		model_path(&self.config.model_dir, &self.config.name)
	}

	/// Trains the model on a block of text.
	///
	/// The text is lower-cased, then every character with at least
	/// `max_depth` characters before it is recorded as following those
	/// characters. Returns the number of transitions recorded.
	pub fn train_on_text(&mut self, text: &str) -> usize {
		let chars: Vec<char> = text.to_lowercase().chars().collect();
		let max_depth = self.config.max_depth;

		let mut transitions = 0;
		for i in max_depth..chars.len() {
			let context: String = chars[i - max_depth..i].iter().collect();
			self.store.record_transition(chars[i], &context);
			transitions += 1;
		}

		debug!("Trained '{}' on {} transitions", self.config.name, transitions);
		transitions
	}

	/// Trains the model on a text file, line by line.
	///
	/// Contexts never span a line break. Returns the number of transitions
	/// recorded.
	pub fn train_on_file<P: AsRef<Path>>(&mut self, path: P) -> ModelResult<usize> {
		let path = path.as_ref();
		let lines = read_file(path)?;
		let transitions: usize = lines.iter().map(|line| self.train_on_text(line)).sum();
		info!(
			"Trained '{}' on {} ({} lines, {} transitions, {} sequences)",
			self.config.name,
			path.display(),
			lines.len(),
			transitions,
			self.store.len()
		);
		Ok(transitions)
	}

	/// Writes a snapshot of the model to its file.
	///
	/// The in-memory model stays valid and usable whatever the outcome.
	pub fn persist(&self) -> ModelResult<()> {
		let path = self.path();
		ModelSnapshot::capture(&self.config, &self.store).write(&path)?;
		info!("Saved model '{}' to {}", self.config.name, path.display());
		Ok(())
	}

	/// Handles one key press.
	///
	/// - Unknown keys are dropped without any state change.
	/// - With keystroke training on and a full rolling context, the
	///   transition `context → char` is recorded before the window slides.
	/// - The window then slides to include the new character.
	/// - With broadcasting on, every subscriber receives the distribution
	///   for the updated window.
	pub fn on_key_event(&mut self, event: &KeyEvent) {
		let key_name = event.name.to_lowercase();

		if !self.config.accepted_key_names.iter().any(|accepted| *accepted == key_name) {
			debug!(key = %key_name, "ignoring unrecognized key");
			return;
		}
		let Some(c) = key_to_char(&key_name) else {
			return;
		};

		if self.training_with_keys && self.rolling_context.len() == self.config.max_depth {
			let context = self.rolling_context();
			self.store.record_transition(c, &context);
		}

		self.rolling_context.push_back(c);
		while self.rolling_context.len() > self.config.max_depth {
			self.rolling_context.pop_front();
		}

		if self.broadcasting {
			let context = self.rolling_context();
			let distribution = self.store.resolve(&context);
			debug!(context = %context, subscribers = self.subscribers.len(), "dispatching prediction");
			for callback in self.subscribers.iter_mut() {
				callback(distribution);
			}
		}
	}

	/// Feeds every event of `source` to `on_key_event` until it ends.
	///
	/// Returns the number of events pulled from the source.
	pub fn listen<S: KeyEventSource + ?Sized>(&mut self, source: &mut S) -> ModelResult<usize> {
		let mut count = 0;
		while let Some(event) = source.next_event()? {
			self.on_key_event(&event);
			count += 1;
		}
		debug!("Event source for '{}' ended after {} events", self.config.name, count);
		Ok(count)
	}

	/// Registers a prediction callback and turns broadcasting on.
	pub fn subscribe_to_predictions<F>(&mut self, callback: F)
	where
		F: FnMut(&Distribution) + Send + 'static,
	{
		self.subscribers.push(Box::new(callback));
		self.broadcasting = true;
	}

	/// Starts learning from the key events themselves.
	pub fn enable_keystroke_training(&mut self) {
		self.training_with_keys = true;
	}

	pub fn is_training_with_keys(&self) -> bool {
		self.training_with_keys
	}

	pub fn is_broadcasting(&self) -> bool {
		self.broadcasting
	}

	/// `true` once key events have a purpose (training or broadcasting).
	pub fn is_listening(&self) -> bool {
		self.training_with_keys || self.broadcasting
	}

	/// The last accepted characters, at most `max_depth` of them.
	pub fn rolling_context(&self) -> String {
		self.rolling_context.iter().collect()
	}

	/// Clears the rolling context, e.g. when the typing target changes.
	pub fn reset_context(&mut self) {
		self.rolling_context.clear();
	}

	/// Resolves the distribution following an arbitrary context.
	pub fn probabilities_for(&self, context: &str) -> &Distribution {
		self.store.resolve(&context.to_lowercase())
	}

	/// Resolves the distribution following the rolling context.
	pub fn current_prediction(&self) -> &Distribution {
		self.store.resolve(&self.rolling_context())
	}
}
