//! Session configuration.
//!
//! Configuration is TOML. Every key is optional; missing keys take the
//! defaults below.
//!
//! ```toml
//! document_path = "test.lean"
//! horizontal_ratio = 0.8
//!
//! [doc_preview]
//! threshold = 80
//! truncate_at = 75
//!
//! [fetch]
//! timeout_secs = 30
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Text shown when neither a `code` nor a `url` parameter is present.
pub const DEFAULT_CONTENT: &str =
	"-- Live javascript version of Lean\n\nexample (m n : ℕ) : m + n = n + m :=\nby simp";

/// Settings for one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
	/// Path the analysis service knows the document under.
	pub document_path: String,
	/// Initial document text when the query string carries none.
	pub default_content: String,
	/// Height-to-width ratio above which the panes stack vertically.
	pub horizontal_ratio: f64,
	/// Documentation preview policy.
	pub doc_preview: DocPreviewConfig,
	/// URL loading settings.
	pub fetch: FetchConfig,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			document_path: "test.lean".to_string(),
			default_content: DEFAULT_CONTENT.to_string(),
			horizontal_ratio: 0.8,
			doc_preview: DocPreviewConfig::default(),
			fetch: FetchConfig::default(),
		}
	}
}

/// When documentation starts collapsed and how much of it the collapsed form shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocPreviewConfig {
	/// Documentation at least this many characters long starts collapsed.
	pub threshold: usize,
	/// Number of characters shown while collapsed.
	pub truncate_at: usize,
}

impl Default for DocPreviewConfig {
	fn default() -> Self {
		Self {
			threshold: 80,
			truncate_at: 75,
		}
	}
}

/// HTTP settings for load-from-URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
	/// Per-request timeout in seconds.
	pub timeout_secs: u64,
	/// User agent sent with requests.
	pub user_agent: String,
}

impl Default for FetchConfig {
	fn default() -> Self {
		Self {
			timeout_secs: 30,
			user_agent: concat!("proofview/", env!("CARGO_PKG_VERSION")).to_string(),
		}
	}
}

impl SessionConfig {
	/// Parses a TOML string.
	pub fn parse(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Loads configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&content)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if !self.horizontal_ratio.is_finite() || self.horizontal_ratio <= 0.0 {
			return Err(ConfigError::Invalid {
				field: "horizontal_ratio",
				reason: format!("expected a positive number, got {}", self.horizontal_ratio),
			});
		}
		if self.document_path.is_empty() {
			return Err(ConfigError::Invalid {
				field: "document_path",
				reason: "must not be empty".to_string(),
			});
		}
		if self.doc_preview.truncate_at > self.doc_preview.threshold {
			return Err(ConfigError::Invalid {
				field: "doc_preview.truncate_at",
				reason: format!(
					"{} exceeds threshold {}",
					self.doc_preview.truncate_at, self.doc_preview.threshold
				),
			});
		}
		if self.fetch.timeout_secs == 0 {
			return Err(ConfigError::Invalid {
				field: "fetch.timeout_secs",
				reason: "must be at least 1".to_string(),
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_input_yields_defaults() {
		assert_eq!(SessionConfig::parse("").unwrap(), SessionConfig::default());
	}

	#[test]
	fn partial_tables_keep_other_defaults() {
		let config = SessionConfig::parse(
			r#"
			document_path = "/work/main.lean"

			[doc_preview]
			threshold = 120
			"#,
		)
		.unwrap();
		assert_eq!(config.document_path, "/work/main.lean");
		assert_eq!(config.doc_preview.threshold, 120);
		assert_eq!(config.doc_preview.truncate_at, 75);
		assert_eq!(config.horizontal_ratio, 0.8);
	}

	#[test]
	fn unknown_keys_are_rejected() {
		assert!(matches!(
			SessionConfig::parse("colour = \"red\""),
			Err(ConfigError::Toml(_))
		));
	}

	#[test]
	fn non_positive_ratio_is_rejected() {
		let err = SessionConfig::parse("horizontal_ratio = 0.0").unwrap_err();
		assert!(matches!(err, ConfigError::Invalid { field: "horizontal_ratio", .. }));
	}

	#[test]
	fn truncation_longer_than_threshold_is_rejected() {
		let err = SessionConfig::parse("[doc_preview]\nthreshold = 10\ntruncate_at = 20").unwrap_err();
		assert!(matches!(err, ConfigError::Invalid { field: "doc_preview.truncate_at", .. }));
	}

	#[test]
	fn missing_file_reports_path() {
		let err = SessionConfig::load("/definitely/not/here.toml").unwrap_err();
		match err {
			ConfigError::Io { path, .. } => assert!(path.ends_with("here.toml")),
			other => panic!("unexpected error: {other}"),
		}
	}
}
