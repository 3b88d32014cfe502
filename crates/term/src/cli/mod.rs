//! CLI schema and parsing helpers for the proofview binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use proofview_primitives::Position;

/// A document path with an optional cursor.
///
/// Supports:
/// * `file.lean` - just a path
/// * `file.lean:42` - path with line number (1-indexed)
/// * `file.lean:42:10` - path with line and column (1-indexed, as the editor reports them)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentLocation {
	/// The file path.
	pub path: PathBuf,
	/// Line number (1-indexed). None means no cursor.
	pub line: Option<u32>,
	/// Column number (1-indexed). None means start of line.
	pub column: Option<u32>,
}

impl DocumentLocation {
	/// Parses a location from a string.
	pub fn parse(s: &str) -> Self {
		Self::parse_colon_format(s).unwrap_or_else(|| Self {
			path: PathBuf::from(s),
			line: None,
			column: None,
		})
	}

	/// Parses `path:line` or `path:line:col` format.
	///
	/// Skips the first 2 chars when searching for colons to handle Windows
	/// drive letters (e.g., `C:\foo\bar.lean:42`).
	fn parse_colon_format(s: &str) -> Option<Self> {
		let search_start = if s.len() > 2 && s.as_bytes().get(1) == Some(&b':') { 2 } else { 0 };

		let suffix = &s[search_start..];
		let last_colon = suffix.rfind(':')?;
		let last_colon_abs = search_start + last_colon;
		let after_last = &s[last_colon_abs + 1..];

		if after_last.is_empty() {
			return None;
		}

		if let Some(second_last_colon) = suffix[..last_colon].rfind(':') {
			let second_last_abs = search_start + second_last_colon;
			let line_str = &s[second_last_abs + 1..last_colon_abs];

			if let (Ok(line @ 1..), Ok(column)) = (line_str.parse::<u32>(), after_last.parse::<u32>()) {
				return Some(Self {
					path: PathBuf::from(&s[..second_last_abs]),
					line: Some(line),
					column: Some(column),
				});
			}
		}

		match after_last.parse::<u32>() {
			Ok(line @ 1..) => Some(Self {
				path: PathBuf::from(&s[..last_colon_abs]),
				line: Some(line),
				column: None,
			}),
			_ => None,
		}
	}

	/// Returns the cursor in document coordinates, if a line was given.
	pub fn cursor(&self) -> Option<Position> {
		self.line
			.map(|line| Position::from_editor(line, self.column.unwrap_or(1)))
	}
}

#[derive(Parser, Debug)]
#[command(name = "proofview")]
#[command(about = "Headless proof editing sessions")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (defaults to the user config directory)
	#[arg(short, long, global = true, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the query string that reopens a file's contents
	Share {
		/// File whose text is encoded
		file: PathBuf,
		/// Also record the URL the text came from
		#[arg(long, value_name = "URL")]
		url: Option<String>,
	},
	/// Open a document and print its text, status and info panel
	Open {
		/// Load the document from a URL
		#[arg(long, value_name = "URL", conflicts_with_all = ["query", "file"])]
		url: Option<String>,
		/// Start from a persisted query string
		#[arg(long, value_name = "QUERY", conflicts_with = "file")]
		query: Option<String>,
		/// Diagnostics batch to publish before rendering (JSON array)
		#[arg(long, value_name = "PATH")]
		diagnostics: Option<PathBuf>,
		/// Local file to load. Supports path:line and path:line:col formats.
		file: Option<String>,
	},
	/// Save a document into a directory under its base name
	Export {
		/// File to export
		file: PathBuf,
		/// Destination directory
		#[arg(long, value_name = "DIR")]
		to: PathBuf,
	},
}
