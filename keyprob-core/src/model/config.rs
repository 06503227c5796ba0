use std::path::PathBuf;

use crate::error::{ModelError, ModelResult};
use crate::keys::{SPACE_KEY, default_key_names, key_to_char};

/// Construction-time settings of a `KeypressModel`.
///
/// When a model file named `name` exists in `model_dir`, every other field
/// is replaced by the file's values. Otherwise these values are used as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
	/// Persistence key: the model lives in `<model_dir>/<name>.json`.
	pub name: String,
	pub description: String,
	/// Longest context length tracked (>= 1).
	pub max_depth: usize,
	pub model_dir: PathBuf,
	/// Recognized key identifiers, `"space"` or single characters.
	pub accepted_key_names: Vec<String>,
	/// Sample-size floor below which a context is not trusted.
	pub min_acceptable_datapoints: u64,
}

impl ModelConfig {
	pub const DEFAULT_MAX_DEPTH: usize = 2;
	pub const DEFAULT_MODEL_DIR: &'static str = "./models";
	pub const DEFAULT_MIN_ACCEPTABLE_DATAPOINTS: u64 = 2;

	/// Creates a configuration with default values for everything but the name.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: String::new(),
			max_depth: Self::DEFAULT_MAX_DEPTH,
			model_dir: PathBuf::from(Self::DEFAULT_MODEL_DIR),
			accepted_key_names: default_key_names(),
			min_acceptable_datapoints: Self::DEFAULT_MIN_ACCEPTABLE_DATAPOINTS,
		}
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn with_model_dir(mut self, model_dir: impl Into<PathBuf>) -> Self {
		self.model_dir = model_dir.into();
		self
	}

	pub fn with_accepted_key_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
		self.accepted_key_names = names.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_min_acceptable_datapoints(mut self, min: u64) -> Self {
		self.min_acceptable_datapoints = min;
		self
	}

	/// Checks the configuration once, before a model is built from it.
	///
	/// # Errors
	/// - empty name
	/// - `max_depth < 1`
	/// - an accepted key name that types no single character
	pub fn validate(&self) -> ModelResult<()> {
		if self.name.trim().is_empty() {
			return Err(ModelError::Config("Model name cannot be empty".to_owned()));
		}
		if self.max_depth < 1 {
			return Err(ModelError::Config("maxDepth must be >= 1".to_owned()));
		}
		if let Some(bad) = self
			.accepted_key_names
			.iter()
			.find(|name| name.as_str() != SPACE_KEY && key_to_char(name).is_none())
		{
			return Err(ModelError::Config(format!(
				"Accepted key name {bad:?} must be \"{SPACE_KEY}\" or a single character"
			)));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = ModelConfig::new("english");
		assert_eq!(config.max_depth, 2);
		assert_eq!(config.model_dir, PathBuf::from("./models"));
		assert_eq!(config.min_acceptable_datapoints, 2);
		assert!(config.accepted_key_names.iter().any(|name| name == "space"));
		assert!(config.validate().is_ok());
	}

	#[test]
	fn rejects_zero_depth() {
		let config = ModelConfig::new("m").with_max_depth(0);
		assert!(matches!(config.validate(), Err(ModelError::Config(_))));
	}

	#[test]
	fn rejects_multi_char_key_names() {
		let config = ModelConfig::new("m").with_accepted_key_names(["a", "enter"]);
		assert!(matches!(config.validate(), Err(ModelError::Config(_))));
	}

	#[test]
	fn rejects_empty_name() {
		assert!(ModelConfig::new("  ").validate().is_err());
	}
}
