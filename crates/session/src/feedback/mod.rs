//! Cursor-driven proof-state feedback for one open document.
//!
//! A [`FeedbackSynchronizer`] keeps two things current for its document: the
//! diagnostics of the latest store batch that belong to the document, and the
//! proof state at the cursor.
//!
//! # Stale responses
//!
//! Every cursor change bumps a generation counter and spawns a point query
//! tagged with the new generation. Queries are never cancelled. When one
//! completes, its result is applied only if its generation is still the
//! latest; otherwise it is dropped without touching the render model. The
//! proof state is cleared as soon as the cursor moves, so a goal is only ever
//! shown for the cursor it was queried at.

mod render;

use std::sync::Arc;

use parking_lot::Mutex;
use proofview_backend::{AnalysisService, DiagnosticStore, SubscriptionSet};
use proofview_primitives::{DiagnosticMessage, GoalAt, Position, filter_for_document};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

pub use self::render::{DocumentationView, FeedbackPanel, GoalView, MessageView, PanelColor};
use self::render::documentation_starts_expanded;
use crate::config::DocPreviewConfig;

/// What the synchronizer currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderModel {
	/// Proof state at the cursor, with the position it was queried for.
	pub goal: Option<GoalAt>,
	/// The document's diagnostics from the latest batch, in batch order.
	pub diagnostics: Vec<DiagnosticMessage>,
}

/// How a point query ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
	/// The proof state was shown.
	Applied,
	/// The service had no proof state at the cursor.
	Cleared,
	/// The query failed; treated as no proof state.
	Failed,
	/// A newer cursor superseded the query; its result was dropped.
	Stale,
	/// The synchronizer was unmounted before the query completed.
	Inactive,
	/// The query task panicked or was aborted by runtime shutdown.
	Abandoned,
}

/// Handle to an in-flight point query.
///
/// Dropping the handle does not cancel the query.
#[derive(Debug)]
pub struct QueryHandle {
	generation: u64,
	task: JoinHandle<QueryOutcome>,
}

impl QueryHandle {
	/// Generation the query was tagged with.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Waits for the query to finish and reports what happened to its result.
	pub async fn settled(self) -> QueryOutcome {
		match self.task.await {
			Ok(outcome) => outcome,
			Err(err) => {
				warn!(generation = self.generation, error = %err, "point query task did not finish");
				QueryOutcome::Abandoned
			}
		}
	}
}

#[derive(Debug, Default)]
struct FeedbackState {
	active: bool,
	cursor: Option<Position>,
	/// Bumped for every issued query; responses carrying an older value are stale.
	generation: u64,
	goal: Option<GoalAt>,
	/// Explicit documentation toggle; `None` uses the length-based default.
	doc_expanded: Option<bool>,
	diagnostics: Vec<DiagnosticMessage>,
	/// Bumped on every change to what is shown.
	revision: u64,
}

impl FeedbackState {
	fn set_diagnostics(&mut self, diagnostics: Vec<DiagnosticMessage>) {
		self.diagnostics = diagnostics;
		self.revision += 1;
	}

	fn set_goal(&mut self, goal: Option<GoalAt>) {
		self.goal = goal;
		self.doc_expanded = None;
		self.revision += 1;
	}
}

/// Keeps the diagnostics and proof state of one document in sync with the
/// cursor and the analysis backend.
pub struct FeedbackSynchronizer {
	document_path: Arc<str>,
	service: Arc<dyn AnalysisService>,
	store: DiagnosticStore,
	state: Arc<Mutex<FeedbackState>>,
	subscriptions: SubscriptionSet,
}

impl std::fmt::Debug for FeedbackSynchronizer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FeedbackSynchronizer")
			.field("document_path", &self.document_path)
			.field("state", &*self.state.lock())
			.finish_non_exhaustive()
	}
}

impl FeedbackSynchronizer {
	/// Activates feedback for `document_path`.
	///
	/// Subscribes to `store` first and then filters its current batch, so a
	/// batch published during activation is never missed.
	pub fn mount(document_path: impl Into<String>, store: DiagnosticStore, service: Arc<dyn AnalysisService>) -> Self {
		let document_path: Arc<str> = Arc::from(document_path.into());
		let state = Arc::new(Mutex::new(FeedbackState {
			active: true,
			..FeedbackState::default()
		}));

		let mut subscriptions = SubscriptionSet::new();
		let listener_state = Arc::clone(&state);
		let listener_path = Arc::clone(&document_path);
		subscriptions.push(store.subscribe(move |batch| {
			let filtered = filter_for_document(batch, &listener_path);
			let mut state = listener_state.lock();
			if state.active {
				trace!(path = %listener_path, messages = filtered.len(), "diagnostics refiltered");
				state.set_diagnostics(filtered);
			}
		}));

		state.lock().set_diagnostics(store.for_document(&document_path));
		debug!(path = %document_path, "feedback mounted");

		Self {
			document_path,
			service,
			store,
			state,
			subscriptions,
		}
	}

	/// Returns the document this synchronizer serves.
	pub fn document_path(&self) -> &str {
		&self.document_path
	}

	/// Returns the latest cursor.
	pub fn cursor(&self) -> Option<Position> {
		self.state.lock().cursor
	}

	/// Returns the generation of the most recently issued query.
	pub fn generation(&self) -> u64 {
		self.state.lock().generation
	}

	/// Returns a counter bumped whenever the render model changes.
	pub fn revision(&self) -> u64 {
		self.state.lock().revision
	}

	/// Returns true until [`unmount`](Self::unmount) is called.
	pub fn is_mounted(&self) -> bool {
		self.state.lock().active
	}

	/// Moves the cursor and queries the proof state there.
	///
	/// Returns `None` without querying when `cursor` equals the previous
	/// cursor, after unmount, or outside a tokio runtime.
	pub fn set_cursor(&self, cursor: Position) -> Option<QueryHandle> {
		let generation = {
			let mut state = self.state.lock();
			if !state.active || state.cursor == Some(cursor) {
				return None;
			}
			state.cursor = Some(cursor);
			state.set_diagnostics(self.store.for_document(&self.document_path));
			if state.goal.is_some() {
				state.set_goal(None);
			}
			state.generation += 1;
			state.generation
		};

		let runtime = match Handle::try_current() {
			Ok(runtime) => runtime,
			Err(err) => {
				warn!(error = %err, "no async runtime; proof state not queried");
				return None;
			}
		};

		debug!(
			path = %self.document_path,
			line = cursor.line,
			column = cursor.column,
			generation,
			"point query issued"
		);
		let service = Arc::clone(&self.service);
		let state = Arc::clone(&self.state);
		let path = Arc::clone(&self.document_path);
		let task = runtime.spawn(async move {
			let result = service.query(&path, cursor).await;
			let mut state = state.lock();
			if !state.active {
				return QueryOutcome::Inactive;
			}
			if state.generation != generation {
				trace!(generation, latest = state.generation, "stale proof state discarded");
				return QueryOutcome::Stale;
			}
			match result {
				Ok(Some(proof_state)) => {
					state.set_goal(Some(GoalAt {
						state: proof_state,
						position: cursor,
					}));
					QueryOutcome::Applied
				}
				Ok(None) => {
					state.set_goal(None);
					QueryOutcome::Cleared
				}
				Err(err) => {
					debug!(error = %err, generation, "point query failed");
					state.set_goal(None);
					QueryOutcome::Failed
				}
			}
		});

		Some(QueryHandle { generation, task })
	}

	/// Returns a snapshot of what is shown.
	pub fn model(&self) -> RenderModel {
		let state = self.state.lock();
		RenderModel {
			goal: state.goal.clone(),
			diagnostics: state.diagnostics.clone(),
		}
	}

	/// Builds the info panel for the current model.
	pub fn panel(&self, preview: &DocPreviewConfig) -> FeedbackPanel {
		let state = self.state.lock();
		FeedbackPanel::build(state.goal.as_ref(), state.doc_expanded, &state.diagnostics, preview)
	}

	/// Flips the documentation between expanded and collapsed.
	///
	/// Returns the new state, or `None` when no documentation is shown.
	pub fn toggle_documentation(&self, preview: &DocPreviewConfig) -> Option<bool> {
		let mut state = self.state.lock();
		let doc = state.goal.as_ref()?.state.documentation.as_deref()?;
		let expanded = !state
			.doc_expanded
			.unwrap_or_else(|| documentation_starts_expanded(doc, preview));
		state.doc_expanded = Some(expanded);
		state.revision += 1;
		Some(expanded)
	}

	/// Deactivates the synchronizer. Later calls are no-ops.
	///
	/// In-flight queries still complete but their results are dropped.
	pub fn unmount(&mut self) {
		let was_active = std::mem::take(&mut self.state.lock().active);
		self.subscriptions.dispose_all();
		if was_active {
			debug!(path = %self.document_path, "feedback unmounted");
		}
	}
}

impl Drop for FeedbackSynchronizer {
	fn drop(&mut self) {
		self.unmount();
	}
}
