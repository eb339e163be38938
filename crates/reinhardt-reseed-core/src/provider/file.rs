//! Entities read from files and directories.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{Entity, EntityFormat, EntityParser, EntityProvider};
use crate::error::{ReseedError, ReseedResult};

/// Reads entities from entity files.
///
/// Each path may name a file or a directory; a directory contributes every
/// JSON or YAML file directly inside it, in file name order. Entities keep
/// the order of the paths and of the records within each file.
///
/// # Example
///
/// ```ignore
/// use reinhardt_reseed_core::provider::{EntityProvider, FileEntityProvider};
///
/// let provider = FileEntityProvider::new()
/// 	.with_path("seed/users.json")
/// 	.with_path("seed/orders");
/// let entities = provider.entities()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileEntityProvider {
	paths: Vec<PathBuf>,
	parser: EntityParser,
}

impl FileEntityProvider {
	/// Creates a provider without paths.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a file or directory.
	pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.paths.push(path.into());
		self
	}

	/// Adds several files or directories.
	pub fn with_paths<I, P>(mut self, paths: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PathBuf>,
	{
		self.paths.extend(paths.into_iter().map(Into::into));
		self
	}

	/// Returns the configured paths.
	pub fn paths(&self) -> &[PathBuf] {
		&self.paths
	}

	fn directory_files(&self, dir: &Path) -> ReseedResult<Vec<PathBuf>> {
		let mut files = Vec::new();
		for entry in std::fs::read_dir(dir)? {
			let path = entry?.path();
			if !path.is_file() {
				continue;
			}
			if EntityFormat::from_path(&path).is_some() {
				files.push(path);
			} else {
				warn!(path = %path.display(), "skipping file without an entity format extension");
			}
		}
		files.sort();
		Ok(files)
	}
}

impl EntityProvider for FileEntityProvider {
	fn entities(&self) -> ReseedResult<Vec<Entity>> {
		let mut entities = Vec::new();
		for path in &self.paths {
			if path.is_dir() {
				let files = self.directory_files(path)?;
				debug!(dir = %path.display(), files = files.len(), "reading entity directory");
				for file in files {
					entities.extend(self.parser.parse_file(&file)?);
				}
			} else if path.exists() {
				entities.extend(self.parser.parse_file(path)?);
			} else {
				return Err(ReseedError::FileNotFound(path.display().to_string()));
			}
		}
		Ok(entities)
	}
}
