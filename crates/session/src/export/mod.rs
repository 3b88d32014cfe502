//! Save-to-disk export of the current document.

use std::io::Write;
use std::path::{Path, PathBuf};

use proofview_primitives::base_name;
use tracing::debug;

use crate::error::{Result, SessionError};

/// A downloadable copy of the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
	/// Suggested file name: the base name of the document path.
	pub file_name: String,
	/// Document text at the time of the save.
	pub contents: String,
}

impl ExportedFile {
	/// Builds the export for `document_path` holding `contents`.
	pub fn new(document_path: &str, contents: impl Into<String>) -> Self {
		Self {
			file_name: base_name(document_path).to_string(),
			contents: contents.into(),
		}
	}

	/// Writes the file into `dir` under its suggested name and returns the path.
	///
	/// The text goes to a temporary file in `dir` first and is renamed into
	/// place, so an interrupted save never leaves a truncated file behind.
	pub fn write_into(&self, dir: &Path) -> Result<PathBuf> {
		let target = dir.join(&self.file_name);
		let io_err = |error| SessionError::Io {
			path: target.clone(),
			error,
		};

		let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
		staged.write_all(self.contents.as_bytes()).map_err(io_err)?;
		staged.persist(&target).map_err(|err| io_err(err.error))?;

		debug!(path = %target.display(), bytes = self.contents.len(), "document exported");
		Ok(target)
	}
}
