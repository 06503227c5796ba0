use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by model loading, saving and configuration.
///
/// Unknown key events and empty statistics are not errors: the first are
/// dropped, the second resolve to the fallback distribution.
#[derive(Error, Debug)]
pub enum ModelError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// A model file exists on disk but cannot be trusted.
	#[error("Corrupt model file {}: {reason}", .path.display())]
	CorruptSnapshot { path: PathBuf, reason: String },

	#[error("Configuration error: {0}")]
	Config(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
