use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::config::ModelConfig;
use super::sequence::Sequence;
use super::store::SequenceStore;
use crate::error::{ModelError, ModelResult};

/// On-disk form of a model.
///
/// ```json
/// {
///   "name": "english",
///   "description": "",
///   "maxDepth": 2,
///   "minAcceptableDatapoints": 2,
///   "acceptedKeyNames": ["space", "a"],
///   "sequences": { "a": { "b": 2, "c": 4 }, "aa": { "a": 4 } }
/// }
/// ```
///
/// Every field is required. Probabilities are not stored; they are derived
/// from the counts on load.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelSnapshot {
	pub name: String,
	pub description: String,
	pub max_depth: usize,
	pub min_acceptable_datapoints: u64,
	pub accepted_key_names: Vec<String>,
	pub sequences: BTreeMap<String, BTreeMap<String, u64>>,
}

impl ModelSnapshot {
	/// Copies the persistent part of a model. The model is left untouched.
	pub fn capture(config: &ModelConfig, store: &SequenceStore) -> Self {
		let sequences = store
			.iter()
			.map(|sequence| {
				let counts = sequence
					.counts()
					.iter()
					.map(|(c, count)| (c.to_string(), *count))
					.collect();
				(sequence.key().to_owned(), counts)
			})
			.collect();

		Self {
			name: config.name.clone(),
			description: config.description.clone(),
			max_depth: config.max_depth,
			min_acceptable_datapoints: config.min_acceptable_datapoints,
			accepted_key_names: config.accepted_key_names.clone(),
			sequences,
		}
	}

	/// Reads and parses a model file.
	///
	/// # Errors
	/// - `Io` if the file cannot be read
	/// - `CorruptSnapshot` if it is not a complete, well-typed model
	pub fn read<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
		let path = path.as_ref();
		let content = fs::read_to_string(path)?;
		serde_json::from_str(&content).map_err(|e| ModelError::CorruptSnapshot {
			path: path.to_owned(),
			reason: e.to_string(),
		})
	}

	/// Atomically writes the snapshot to `path`.
	///
	/// The JSON is written to a temporary file next to `path`, then renamed
	/// over it, so a failed write never leaves a truncated model behind.
	pub fn write<P: AsRef<Path>>(&self, path: P) -> ModelResult<()> {
		let path = path.as_ref();
		let parent_dir = match path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};
		fs::create_dir_all(parent_dir)?;

		let temp_file = NamedTempFile::new_in(parent_dir)?;
		{
			let mut writer = BufWriter::new(&temp_file);
			serde_json::to_writer_pretty(&mut writer, self)?;
			writer.write_all(b"\n")?;
			writer.flush()?;
		}

		temp_file.persist(path).map_err(|e| ModelError::Io(e.error))?;
		Ok(())
	}

	/// Validates the snapshot and splits it into configuration and statistics.
	///
	/// `name` and `model_dir` are taken from `defaults`; everything else comes
	/// from the snapshot. `path` is only used in error messages.
	pub fn into_model(self, defaults: &ModelConfig, path: &Path) -> ModelResult<(ModelConfig, SequenceStore)> {
		let corrupt = |reason: String| ModelError::CorruptSnapshot {
			path: path.to_owned(),
			reason,
		};

		let config = ModelConfig {
			name: defaults.name.clone(),
			description: self.description,
			max_depth: self.max_depth,
			model_dir: defaults.model_dir.clone(),
			accepted_key_names: self.accepted_key_names,
			min_acceptable_datapoints: self.min_acceptable_datapoints,
		};
		config.validate().map_err(|e| corrupt(e.to_string()))?;

		let mut sequences = Vec::with_capacity(self.sequences.len());
		for (key, raw_counts) in self.sequences {
			let depth = key.chars().count();
			if depth < 1 || depth > config.max_depth {
				return Err(corrupt(format!(
					"sequence key {key:?} must have 1 to {} characters",
					config.max_depth
				)));
			}

			let mut counts = HashMap::with_capacity(raw_counts.len());
			for (next, count) in raw_counts {
				let mut chars = next.chars();
				match (chars.next(), chars.next()) {
					(Some(c), None) => {
						counts.insert(c, count);
					}
					_ => {
						return Err(corrupt(format!(
							"next character {next:?} of sequence {key:?} must be a single character"
						)));
					}
				}
			}
			sequences.push(Sequence::new(&key, counts));
		}

		let store = SequenceStore::with_sequences(config.max_depth, config.min_acceptable_datapoints, sequences);
		Ok((config, store))
	}
}
