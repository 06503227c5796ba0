use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io};

use tracing::info;

/// Extension used by persisted model files.
pub const MODEL_EXTENSION: &str = "json";

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Builds the path of a model file from its directory and name.
///
/// The extension is appended, never substituted, so dotted names stay
/// distinct: `english.v1` → `./models/english.v1.json`.
///
/// Example:
/// `./models` + `"english"` → `./models/english.json`
pub fn model_path<P: AsRef<Path>>(model_dir: P, name: &str) -> PathBuf {
	model_dir.as_ref().join(format!("{name}.{MODEL_EXTENSION}"))
}

/// Creates the model directory (and its parents) when it does not exist yet.
///
/// Returns `true` if the directory had to be created.
pub(crate) fn ensure_dir<P: AsRef<Path>>(dir: P) -> io::Result<bool> {
	let dir = dir.as_ref();
	if dir.is_dir() {
		return Ok(false);
	}
	info!("Models folder {} not found, creating it", dir.display());
	fs::create_dir_all(dir)?;
	Ok(true)
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

/// Lists the names of all persisted models in `model_dir`.
///
/// Names are file stems, e.g. `english.json` → `english`. A missing
/// directory simply holds no models.
pub fn list_models<P: AsRef<Path>>(model_dir: P) -> io::Result<Vec<String>> {
	let model_dir = model_dir.as_ref();
	if !model_dir.is_dir() {
		return Ok(Vec::new());
	}

	let suffix = format!(".{MODEL_EXTENSION}");
	Ok(list_files(model_dir, MODEL_EXTENSION)?
		.into_iter()
		.filter_map(|file| file.strip_suffix(&suffix).map(str::to_owned))
		.collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn model_path_appends_extension() {
		let path = model_path("./models", "english");
		assert_eq!(path, PathBuf::from("./models/english.json"));
	}

	#[test]
	fn model_path_keeps_dotted_names() {
		assert_eq!(model_path("./models", "english.v1"), PathBuf::from("./models/english.v1.json"));
		assert_ne!(model_path("./models", "english.v1"), model_path("./models", "english.v2"));
	}

	#[test]
	fn list_models_reports_dotted_names() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(model_path(dir.path(), "english.v1"), "{}").unwrap();
		fs::write(model_path(dir.path(), "english"), "{}").unwrap();

		assert_eq!(list_models(dir.path()).unwrap(), vec!["english", "english.v1"]);
	}

	#[test]
	fn list_models_skips_other_files() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("b.json"), "{}").unwrap();
		fs::write(dir.path().join("a.json"), "{}").unwrap();
		fs::write(dir.path().join("notes.txt"), "x").unwrap();

		assert_eq!(list_models(dir.path()).unwrap(), vec!["a", "b"]);
	}

	#[test]
	fn list_models_on_missing_dir_is_empty() {
		let dir = tempfile::tempdir().unwrap();
		assert!(list_models(dir.path().join("nope")).unwrap().is_empty());
	}

	#[test]
	fn ensure_dir_creates_nested() {
		let dir = tempfile::tempdir().unwrap();
		let nested = dir.path().join("a/b");
		assert!(ensure_dir(&nested).unwrap());
		assert!(nested.is_dir());
		assert!(!ensure_dir(&nested).unwrap());
	}
}
