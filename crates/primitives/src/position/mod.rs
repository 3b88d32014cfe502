use std::fmt;

use serde::{Deserialize, Serialize};

/// Cursor position reported by the editor widget.
///
/// Lines are 1-based and columns are 0-based, matching the coordinates the
/// analysis service expects for point queries. Positions are plain values:
/// two positions are the same cursor exactly when they compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
	/// 1-based line number.
	pub line: u32,
	/// 0-based column offset within the line.
	pub column: u32,
}

impl Position {
	/// Creates a position. A zero line is clamped to the first line.
	pub const fn new(line: u32, column: u32) -> Self {
		Self {
			line: if line == 0 { 1 } else { line },
			column,
		}
	}

	/// Converts editor widget coordinates (1-based line, 1-based column).
	pub const fn from_editor(line_number: u32, column: u32) -> Self {
		Self::new(line_number, column.saturating_sub(1))
	}
}

impl Default for Position {
	fn default() -> Self {
		Self::new(1, 0)
	}
}

impl fmt::Display for Position {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}

#[cfg(test)]
mod tests;
