//! Subcommand implementations.
//!
//! Each command returns the text to print on stdout.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use proofview_backend::{AnalysisHub, BackendPush, push_channel};
use proofview_primitives::DiagnosticMessage;
use proofview_session::{
	HttpFetcher, MemoryHistory, Persistence, QueryParams, RopeBuffer, SessionConfig, SessionController, URL_PARAM,
};
use tracing::{debug, info};

use crate::cli::{Command, DocumentLocation};
use crate::offline::OfflineAnalysis;

/// Runs one subcommand.
pub async fn run(command: Command, config: SessionConfig) -> anyhow::Result<String> {
	match command {
		Command::Share { file, url } => share(&file, url.as_deref()),
		Command::Open {
			url,
			query,
			diagnostics,
			file,
		} => {
			let source = match (url, query, file) {
				(Some(url), _, _) => OpenSource::Url(url),
				(None, Some(query), _) => OpenSource::Query(query),
				(None, None, Some(file)) => OpenSource::File(DocumentLocation::parse(&file)),
				(None, None, None) => OpenSource::Default,
			};
			open(config, source, diagnostics.as_deref()).await
		}
		Command::Export { file, to } => export(config, &file, &to),
	}
}

/// Where `open` takes the document from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenSource {
	/// Configured default content.
	Default,
	/// A persisted query string.
	Query(String),
	/// A remote document.
	Url(String),
	/// A local file, optionally with a cursor.
	File(DocumentLocation),
}

fn mount(config: SessionConfig, hub: &AnalysisHub, query: &str) -> anyhow::Result<SessionController> {
	let fetcher = HttpFetcher::new(&config.fetch)?;
	let persistence = Persistence::new(query, Box::new(MemoryHistory::default()));
	Ok(SessionController::mount(
		config,
		hub,
		Arc::new(fetcher),
		persistence,
		Box::new(RopeBuffer::new()),
	))
}

/// Prints the query string carrying `file`'s text and, optionally, its source URL.
pub fn share(file: &Path, url: Option<&str>) -> anyhow::Result<String> {
	let text = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
	let mut persistence = Persistence::new("", Box::new(MemoryHistory::default()));
	persistence.store_code(&text);
	if let Some(url) = url {
		persistence.store_url(url);
	}
	Ok(format!("{}\n", persistence.query_string()))
}

/// Opens a session, runs the load workflow to completion and renders it.
///
/// A failed load is reported as an error carrying the session's status message.
pub async fn open(config: SessionConfig, source: OpenSource, diagnostics: Option<&Path>) -> anyhow::Result<String> {
	let hub = AnalysisHub::new(Arc::new(OfflineAnalysis));
	if let Some(path) = diagnostics {
		publish_diagnostics(&hub, path).await?;
	}

	let query = match &source {
		OpenSource::Query(query) => query.clone(),
		OpenSource::Url(url) => {
			let mut params = QueryParams::default();
			params.set(URL_PARAM, url);
			params.to_query_string()
		}
		OpenSource::Default | OpenSource::File(_) => String::new(),
	};
	let mut session = mount(config, &hub, &query)?;

	if let OpenSource::File(location) = &source {
		session.load_local_file(&location.path)?;
		if let Some(cursor) = location.cursor()
			&& let Some(query) = session.on_cursor_change(cursor)
		{
			let outcome = query.settled().await;
			debug!(?outcome, %cursor, "cursor query settled");
		}
	}

	session.render_pass();
	session.settle_loads().await;

	if let Some(message) = &session.session().status_message {
		bail!("{message}");
	}

	let view = session.view();
	let mut out = view.text;
	if !out.ends_with('\n') {
		out.push('\n');
	}
	let _ = writeln!(out, "\n-- {} is {}", session.session().document_path, view.status.label);
	if !view.panel.is_empty() {
		let _ = write!(out, "\n{}", view.panel.to_text());
	}
	Ok(out)
}

async fn publish_diagnostics(hub: &AnalysisHub, path: &Path) -> anyhow::Result<()> {
	let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
	let batch: Vec<DiagnosticMessage> =
		serde_json::from_str(&raw).with_context(|| format!("parsing diagnostics in {}", path.display()))?;

	let (tx, rx) = push_channel();
	tx.send(BackendPush::Diagnostics(batch))
		.context("diagnostics channel closed")?;
	drop(tx);
	hub.pump(rx).await;
	Ok(())
}

/// Writes `file` into `dir` through the session's save path.
pub fn export(mut config: SessionConfig, file: &Path, dir: &Path) -> anyhow::Result<String> {
	config.document_path = file.display().to_string();
	let hub = AnalysisHub::new(Arc::new(OfflineAnalysis));
	let mut session = mount(config, &hub, "")?;
	session.load_local_file(file)?;

	let written: PathBuf = session.save_into(dir)?;
	info!(path = %written.display(), "exported");
	Ok(format!("{}\n", written.display()))
}
