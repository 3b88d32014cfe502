//! Editor widget contract and a rope-backed implementation of it.

use ropey::Rope;

/// Document model of the editor widget.
///
/// The session reads and replaces the full text through this seam; cursor and
/// content events flow the other way, into
/// [`SessionController`](crate::SessionController) handlers.
pub trait DocumentSurface: Send {
	/// Returns the full document text.
	fn content(&self) -> String;

	/// Replaces the full document text.
	fn set_content(&mut self, text: &str);
}

/// Headless document model backed by a [`Rope`].
#[derive(Debug, Clone, Default)]
pub struct RopeBuffer {
	rope: Rope,
	version: u64,
}

impl RopeBuffer {
	/// Creates an empty buffer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a buffer holding `text`.
	pub fn from_text(text: &str) -> Self {
		Self {
			rope: Rope::from_str(text),
			version: 0,
		}
	}

	/// Returns the number of times the content was replaced.
	pub fn version(&self) -> u64 {
		self.version
	}

	/// Returns the number of lines, counting a trailing empty line.
	pub fn line_count(&self) -> usize {
		self.rope.len_lines()
	}

	/// Returns the underlying rope.
	pub fn rope(&self) -> &Rope {
		&self.rope
	}
}

impl DocumentSurface for RopeBuffer {
	fn content(&self) -> String {
		self.rope.to_string()
	}

	fn set_content(&mut self, text: &str) {
		self.rope = Rope::from_str(text);
		self.version += 1;
	}
}
