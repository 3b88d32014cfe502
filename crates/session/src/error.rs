//! Error types for the editing session.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a [`SessionConfig`](crate::SessionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The file is not valid TOML or does not match the schema.
	#[error("config parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A value parsed but is out of range.
	#[error("invalid config value for {field}: {reason}")]
	Invalid {
		/// Dotted name of the offending field.
		field: &'static str,
		/// What is wrong with it.
		reason: String,
	},
}

/// Errors loading document text from a URL.
///
/// The `Display` output is what the session shows as its status message.
#[derive(Debug, Error)]
pub enum FetchError {
	/// The submitted text is not an absolute URL.
	#[error("invalid URL {url:?}: {source}")]
	InvalidUrl {
		/// The submitted text.
		url: String,
		/// Parser error.
		source: url::ParseError,
	},

	/// Only http and https sources can be loaded.
	#[error("unsupported URL scheme {scheme:?}")]
	UnsupportedScheme {
		/// The rejected scheme.
		scheme: String,
	},

	/// The server answered with a non-success status.
	#[error("failed to load {url}: HTTP {status}")]
	Status {
		/// Requested URL.
		url: String,
		/// HTTP status code.
		status: u16,
	},

	/// Connection, TLS, timeout or body decoding failure.
	#[error("failed to load {url}: {source}")]
	Transport {
		/// Requested URL.
		url: String,
		/// Underlying client error.
		source: reqwest::Error,
	},

	/// The HTTP client could not be constructed.
	#[error("HTTP client setup failed: {0}")]
	Client(reqwest::Error),
}

/// Errors surfaced by [`SessionController`](crate::SessionController) operations.
#[derive(Debug, Error)]
pub enum SessionError {
	/// Reading or writing a local file failed.
	#[error("I/O error on {path}: {error}")]
	Io {
		/// File involved.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Loading from a URL failed.
	#[error(transparent)]
	Fetch(#[from] FetchError),

	/// Configuration could not be loaded.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
