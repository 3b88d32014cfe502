//! The editing session: document identity, load/save workflow and layout.
//!
//! [`SessionController`] owns the [`DocumentSession`] and is its only writer.
//! Front ends forward editor and form events to its handlers and call
//! [`SessionController::render_pass`] once per frame.
//!
//! # URL loads
//!
//! Submitting a URL only records it as pending. The next render pass takes
//! the pending URL, clearing it before the fetch starts, and spawns the fetch.
//! Completions are delivered over a channel and applied on later render
//! passes in completion order, so the last fetch to finish wins.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use proofview_backend::AnalysisHub;
use proofview_primitives::Position;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::buffer::DocumentSurface;
use crate::config::SessionConfig;
use crate::error::{FetchError, Result, SessionError};
use crate::export::ExportedFile;
use crate::feedback::{FeedbackPanel, FeedbackSynchronizer, QueryHandle, RenderModel};
use crate::fetch::Fetcher;
use crate::layout::{Geometry, InfoPanelExtent, Orientation, classify, info_panel_extent};
use crate::persistence::{Persistence, StartupDocument};
use crate::status::{StatusTracker, StatusView};

/// State of one open document, owned by its [`SessionController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSession {
	/// Path the analysis service knows the document under.
	pub document_path: String,
	/// Latest cursor reported by the editor.
	pub cursor: Option<Position>,
	/// Current split orientation.
	pub layout: Orientation,
	/// URL to fetch on the next render pass.
	pub pending_load_url: Option<String>,
	/// Error from the last failed load, shown in the header.
	pub status_message: Option<String>,
}

/// Everything a front end draws for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
	/// Document text.
	pub text: String,
	/// Busy indicator.
	pub status: StatusView,
	/// Load error, if any.
	pub status_message: Option<String>,
	/// Info panel contents.
	pub panel: FeedbackPanel,
	/// Split orientation.
	pub layout: Orientation,
	/// Info panel size.
	pub extent: InfoPanelExtent,
	/// Text of the URL input field.
	pub url_input: String,
}

#[derive(Debug)]
struct LoadCompletion {
	url: String,
	result: std::result::Result<String, FetchError>,
}

/// Drives one editing session.
pub struct SessionController {
	config: SessionConfig,
	session: DocumentSession,
	hub: AnalysisHub,
	surface: Box<dyn DocumentSurface>,
	persistence: Persistence,
	fetcher: Arc<dyn Fetcher>,
	feedback: FeedbackSynchronizer,
	status: StatusTracker,
	url_input: String,
	header_expanded: bool,
	split_size: Option<u32>,
	/// Cleared by [`unmount`](SessionController::unmount); load results are dropped afterwards.
	active: bool,
	loads: Vec<JoinHandle<()>>,
	load_tx: mpsc::UnboundedSender<LoadCompletion>,
	load_rx: mpsc::UnboundedReceiver<LoadCompletion>,
}

impl std::fmt::Debug for SessionController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SessionController")
			.field("session", &self.session)
			.field("loads_in_flight", &self.loads.len())
			.finish_non_exhaustive()
	}
}

impl SessionController {
	/// Opens a session.
	///
	/// The initial text comes from the persisted `code` parameter, a loading
	/// placeholder when only `url` is persisted (that URL becomes the first
	/// pending load), or the configured default content.
	pub fn mount(
		config: SessionConfig,
		hub: &AnalysisHub,
		fetcher: Arc<dyn Fetcher>,
		persistence: Persistence,
		mut surface: Box<dyn DocumentSurface>,
	) -> Self {
		let startup = StartupDocument::resolve(persistence.params(), &config.default_content);
		surface.set_content(&startup.content);

		let document_path = config.document_path.clone();
		let status = StatusTracker::mount(document_path.clone(), hub.liveness().clone());
		let feedback = FeedbackSynchronizer::mount(document_path.clone(), hub.diagnostics().clone(), hub.service());
		let (load_tx, load_rx) = mpsc::unbounded_channel();

		info!(path = %document_path, pending_url = ?startup.initial_url, "session mounted");
		Self {
			session: DocumentSession {
				document_path,
				cursor: None,
				layout: Orientation::default(),
				pending_load_url: startup.initial_url.clone(),
				status_message: None,
			},
			url_input: startup.initial_url.unwrap_or_default(),
			config,
			hub: hub.clone(),
			surface,
			persistence,
			fetcher,
			feedback,
			status,
			header_expanded: true,
			split_size: None,
			active: true,
			loads: Vec::new(),
			load_tx,
			load_rx,
		}
	}

	/// Returns the session state.
	pub fn session(&self) -> &DocumentSession {
		&self.session
	}

	/// Returns the configuration the session runs with.
	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	/// Returns the persistence collaborator.
	pub fn persistence(&self) -> &Persistence {
		&self.persistence
	}

	/// Returns the document text.
	pub fn text(&self) -> String {
		self.surface.content()
	}

	/// Returns the text of the URL input field.
	pub fn url_input(&self) -> &str {
		&self.url_input
	}

	/// Handles a content change reported by the editor.
	pub fn on_content_change(&mut self, text: &str) {
		self.persistence.store_code(text);
	}

	/// Replaces the document text and propagates it like an edit.
	pub fn replace_document(&mut self, text: &str) {
		self.surface.set_content(text);
		self.on_content_change(text);
	}

	/// Handles a cursor move and queries the proof state there.
	pub fn on_cursor_change(&mut self, cursor: Position) -> Option<QueryHandle> {
		self.session.cursor = Some(cursor);
		self.feedback.set_cursor(cursor)
	}

	/// Handles a cursor move in editor coordinates (1-based column).
	pub fn on_editor_cursor(&mut self, line_number: u32, column: u32) -> Option<QueryHandle> {
		self.on_cursor_change(Position::from_editor(line_number, column))
	}

	/// Handles a URL form submit: persists the URL and schedules the load.
	pub fn submit_url(&mut self, url: &str) {
		debug!(url, "load from URL requested");
		self.url_input = url.to_string();
		self.persistence.store_url(url);
		self.session.pending_load_url = Some(url.to_string());
	}

	/// Handles typing in the URL field, which forgets the persisted URL.
	pub fn on_url_input_edited(&mut self, text: &str) {
		self.url_input = text.to_string();
		self.persistence.clear_url();
	}

	/// Starts the pending URL load, if any, and applies finished loads.
	///
	/// Returns true when a fetch was started.
	pub fn render_pass(&mut self) -> bool {
		if !self.active {
			return false;
		}
		let started = self.start_pending_load();
		self.loads.retain(|task| !task.is_finished());
		while let Ok(completion) = self.load_rx.try_recv() {
			self.apply_load(completion);
		}
		started
	}

	/// Waits for every started fetch and applies the results.
	pub async fn settle_loads(&mut self) {
		if !self.active {
			return;
		}
		for task in std::mem::take(&mut self.loads) {
			if let Err(err) = task.await {
				warn!(error = %err, "URL load task did not finish");
			}
		}
		while let Ok(completion) = self.load_rx.try_recv() {
			self.apply_load(completion);
		}
	}

	/// Returns true until [`unmount`](Self::unmount) is called.
	pub fn is_mounted(&self) -> bool {
		self.active
	}

	/// Returns the number of fetches not yet known to have finished.
	pub fn loads_in_flight(&self) -> usize {
		self.loads.len()
	}

	fn start_pending_load(&mut self) -> bool {
		if !self.active || self.session.pending_load_url.is_none() {
			return false;
		}
		let runtime = match Handle::try_current() {
			Ok(runtime) => runtime,
			Err(err) => {
				warn!(error = %err, "no async runtime; URL load deferred");
				return false;
			}
		};
		let Some(url) = self.session.pending_load_url.take() else {
			return false;
		};

		debug!(url = %url, "URL load started");
		let fetcher = Arc::clone(&self.fetcher);
		let tx = self.load_tx.clone();
		self.loads.push(runtime.spawn(async move {
			let result = fetcher.fetch_text(&url).await;
			if tx.send(LoadCompletion { url, result }).is_err() {
				debug!("session closed before URL load finished");
			}
		}));
		true
	}

	fn apply_load(&mut self, completion: LoadCompletion) {
		match completion.result {
			Ok(text) => {
				info!(url = %completion.url, bytes = text.len(), "document loaded from URL");
				self.replace_document(&text);
				self.session.status_message = None;
			}
			Err(err) => {
				warn!(url = %completion.url, error = %err, "URL load failed");
				self.session.status_message = Some(err.to_string());
			}
		}
	}

	/// Replaces the document with text read from a local file.
	///
	/// Clears any pending URL load and the persisted URL.
	pub fn load_local_text(&mut self, text: &str) {
		self.session.pending_load_url = None;
		self.replace_document(text);
		self.persistence.clear_url();
	}

	/// Reads `path` and loads it like [`load_local_text`](Self::load_local_text).
	///
	/// On a read error the document is left untouched and the error becomes
	/// the status message.
	pub fn load_local_file(&mut self, path: &Path) -> Result<()> {
		match std::fs::read_to_string(path) {
			Ok(text) => {
				info!(path = %path.display(), "document loaded from file");
				self.load_local_text(&text);
				Ok(())
			}
			Err(error) => {
				let err = SessionError::Io {
					path: path.to_path_buf(),
					error,
				};
				warn!(error = %err, "local load failed");
				self.session.status_message = Some(err.to_string());
				Err(err)
			}
		}
	}

	/// Recomputes the split orientation for the container geometry.
	pub fn resize(&mut self, geometry: Geometry) -> Orientation {
		let layout = classify(geometry, self.config.horizontal_ratio);
		if layout != self.session.layout {
			debug!(%layout, width = geometry.width, height = geometry.height, "layout changed");
		}
		self.session.layout = layout;
		layout
	}

	/// Collapses or expands the header. Returns the new state.
	pub fn toggle_header(&mut self) -> bool {
		self.header_expanded = !self.header_expanded;
		self.header_expanded
	}

	/// Records the editor pane size after a divider drag.
	pub fn finish_split_drag(&mut self, size: u32) {
		self.split_size = Some(size);
	}

	/// Returns the info panel size for the current layout.
	pub fn info_panel_extent(&self) -> InfoPanelExtent {
		info_panel_extent(self.session.layout, self.split_size, self.header_expanded)
	}

	/// Returns the export of the current text.
	pub fn save(&self) -> ExportedFile {
		ExportedFile::new(&self.session.document_path, self.surface.content())
	}

	/// Writes the export into `dir` and returns the written path.
	pub fn save_into(&self, dir: &Path) -> Result<PathBuf> {
		self.save().write_into(dir)
	}

	/// Returns the proof state and diagnostics currently shown.
	pub fn feedback(&self) -> RenderModel {
		self.feedback.model()
	}

	/// Returns the info panel.
	pub fn feedback_panel(&self) -> FeedbackPanel {
		self.feedback.panel(&self.config.doc_preview)
	}

	/// Flips the documentation block. Returns the new state, if shown.
	pub fn toggle_documentation(&self) -> Option<bool> {
		self.feedback.toggle_documentation(&self.config.doc_preview)
	}

	/// Returns the busy indicator.
	pub fn status(&self) -> StatusView {
		self.status.view()
	}

	/// Moves the session to another document path.
	///
	/// The status indicator follows immediately; feedback is remounted for the
	/// new path and re-queried at the current cursor.
	pub fn rename_document(&mut self, document_path: impl Into<String>) -> Option<QueryHandle> {
		let document_path = document_path.into();
		if document_path == self.session.document_path {
			return None;
		}
		info!(from = %self.session.document_path, to = %document_path, "document renamed");
		self.status.set_document_path(document_path.clone());
		self.feedback = FeedbackSynchronizer::mount(
			document_path.clone(),
			self.hub.diagnostics().clone(),
			self.hub.service(),
		);
		self.session.document_path = document_path;
		self.session.cursor.and_then(|cursor| self.feedback.set_cursor(cursor))
	}

	/// Returns everything to draw for this frame.
	pub fn view(&self) -> SessionView {
		SessionView {
			text: self.text(),
			status: self.status(),
			status_message: self.session.status_message.clone(),
			panel: self.feedback_panel(),
			layout: self.session.layout,
			extent: self.info_panel_extent(),
			url_input: self.url_input.clone(),
		}
	}

	/// Releases the store subscriptions. Later calls are no-ops.
	///
	/// Fetches already started still run; their results are dropped.
	pub fn unmount(&mut self) {
		if !std::mem::replace(&mut self.active, false) {
			return;
		}
		self.feedback.unmount();
		self.status.unmount();
		self.load_rx.close();
		let mut dropped = 0;
		while self.load_rx.try_recv().is_ok() {
			dropped += 1;
		}
		self.session.pending_load_url = None;
		self.loads.clear();
		info!(path = %self.session.document_path, dropped, "session unmounted");
	}
}

#[cfg(test)]
mod tests;
