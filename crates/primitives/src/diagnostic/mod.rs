use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Position;

/// Severity of a backend-reported diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	/// Informational output, such as `#eval` or `#check` results.
	Information,
	/// A warning that does not block elaboration.
	Warning,
	/// An error.
	Error,
}

impl Severity {
	/// Returns the lowercase name used in panel headers and on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Information => "information",
			Self::Warning => "warning",
			Self::Error => "error",
		}
	}
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when parsing an unrecognized severity name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown diagnostic severity: {0}")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
	type Err = UnknownSeverity;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"information" | "info" => Ok(Self::Information),
			"warning" => Ok(Self::Warning),
			"error" => Ok(Self::Error),
			other => Err(UnknownSeverity(other.to_string())),
		}
	}
}

/// One diagnostic from the latest batch pushed by the analysis service.
///
/// The serialized field names follow the backend's message records
/// (`file_name`, `pos_line`, `pos_col`, `text`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
	/// Path of the document the message is anchored in.
	#[serde(rename = "file_name")]
	pub document_path: String,
	/// 1-based line of the anchor.
	#[serde(rename = "pos_line")]
	pub line: u32,
	/// 0-based column of the anchor.
	#[serde(rename = "pos_col")]
	pub column: u32,
	/// Message severity.
	pub severity: Severity,
	/// Short caption shown in the header.
	#[serde(default)]
	pub caption: String,
	/// Raw message body, not yet highlighted.
	#[serde(rename = "text", default)]
	pub body: String,
}

impl DiagnosticMessage {
	/// Creates a message with an empty caption and body.
	pub fn new(document_path: impl Into<String>, line: u32, column: u32, severity: Severity) -> Self {
		Self {
			document_path: document_path.into(),
			line,
			column,
			severity,
			caption: String::new(),
			body: String::new(),
		}
	}

	/// Sets the caption.
	pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
		self.caption = caption.into();
		self
	}

	/// Sets the raw body.
	pub fn with_body(mut self, body: impl Into<String>) -> Self {
		self.body = body.into();
		self
	}

	/// Returns the anchor as a [`Position`].
	pub const fn position(&self) -> Position {
		Position::new(self.line, self.column)
	}

	/// Returns true if the message belongs to `document_path`.
	pub fn is_for(&self, document_path: &str) -> bool {
		self.document_path == document_path
	}
}

/// Selects the messages of `batch` anchored in `document_path`.
///
/// Order follows the batch; messages for other documents never leak through.
pub fn filter_for_document(batch: &[DiagnosticMessage], document_path: &str) -> Vec<DiagnosticMessage> {
	batch.iter().filter(|msg| msg.is_for(document_path)).cloned().collect()
}
