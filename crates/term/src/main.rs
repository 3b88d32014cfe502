//! proofview binary.
//!
//! Runs editing sessions headless: share a document as a query string, open
//! one from a file, query string or URL, or export it to disk.

mod cli;
mod commands;
mod offline;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use proofview_session::SessionConfig;
use tracing::{debug, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let config = load_config(cli.config.as_deref())?;
	info!(path = %config.document_path, "starting proofview");

	let output = commands::run(cli.command, config).await?;
	print!("{output}");
	Ok(())
}

/// Loads `explicit`, else the user config file when present, else defaults.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<SessionConfig> {
	if let Some(path) = explicit {
		return SessionConfig::load(path).with_context(|| format!("loading config {}", path.display()));
	}
	match default_config_path() {
		Some(path) if path.is_file() => {
			debug!(path = %path.display(), "using user config");
			SessionConfig::load(&path).with_context(|| format!("loading config {}", path.display()))
		}
		_ => Ok(SessionConfig::default()),
	}
}

fn default_config_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("proofview").join("config.toml"))
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("proofview=debug,proofview_session=debug,proofview_backend=debug,warn")
			} else {
				EnvFilter::new("proofview=info,proofview_session=info,proofview_backend=info,warn")
			}
		})
	};

	// PROOFVIEW_LOG_DIR sends logs to a per-process file instead of stderr.
	if let Some(log_dir) = std::env::var_os("PROOFVIEW_LOG_DIR").map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("proofview.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);

			tracing_subscriber::registry().with(filter()).with(file_layer).init();

			tracing::info!(path = ?log_path, "tracing initialized");
			return;
		}
	}

	tracing_subscriber::fmt()
		.with_env_filter(filter())
		.with_writer(std::io::stderr)
		.init();
}
