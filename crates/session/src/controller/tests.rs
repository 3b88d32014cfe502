use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use proofview_backend::{AnalysisService, QueryError};
use proofview_primitives::{DiagnosticMessage, ProofState, Severity};
use tokio::sync::oneshot;

use super::*;
use crate::buffer::RopeBuffer;
use crate::config::DEFAULT_CONTENT;
use crate::feedback::QueryOutcome;
use crate::persistence::{CODE_PARAM, MemoryHistory, URL_PARAM};

struct EchoService;

#[async_trait]
impl AnalysisService for EchoService {
	async fn query(&self, document_path: &str, position: Position) -> std::result::Result<Option<ProofState>, QueryError> {
		Ok(Some(ProofState::default().with_state(format!("{document_path}@{position}"))))
	}
}

type FetchReply = std::result::Result<String, FetchError>;

/// Serves fixed pages, 404 for anything else, or waits on a gate armed by the test.
#[derive(Default)]
struct PageFetcher {
	pages: HashMap<String, String>,
	gates: Mutex<HashMap<String, oneshot::Receiver<FetchReply>>>,
	calls: Mutex<Vec<String>>,
}

impl PageFetcher {
	fn with_page(mut self, url: &str, text: &str) -> Self {
		self.pages.insert(url.to_string(), text.to_string());
		self
	}

	fn hold(&self, url: &str) -> oneshot::Sender<FetchReply> {
		let (tx, rx) = oneshot::channel();
		self.gates.lock().insert(url.to_string(), rx);
		tx
	}
}

#[async_trait]
impl Fetcher for PageFetcher {
	async fn fetch_text(&self, url: &str) -> FetchReply {
		self.calls.lock().push(url.to_string());
		let gate = self.gates.lock().remove(url);
		if let Some(rx) = gate {
			return rx.await.unwrap_or_else(|_| {
				Err(FetchError::Status {
					url: url.to_string(),
					status: 499,
				})
			});
		}
		self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
			url: url.to_string(),
			status: 404,
		})
	}
}

struct Harness {
	hub: AnalysisHub,
	fetcher: Arc<PageFetcher>,
	controller: SessionController,
}

fn harness(query: &str, fetcher: PageFetcher) -> Harness {
	let hub = AnalysisHub::new(Arc::new(EchoService));
	let fetcher = Arc::new(fetcher);
	let persistence = Persistence::new(query, Box::new(MemoryHistory::default()));
	let controller = SessionController::mount(
		SessionConfig::default(),
		&hub,
		fetcher.clone(),
		persistence,
		Box::new(RopeBuffer::new()),
	);
	Harness {
		hub,
		fetcher,
		controller,
	}
}

#[test]
fn startup_without_parameters_shows_default_content() {
	let h = harness("", PageFetcher::default());
	assert_eq!(h.controller.text(), DEFAULT_CONTENT);
	assert_eq!(h.controller.session().pending_load_url, None);
	assert_eq!(h.controller.session().document_path, "test.lean");
	assert_eq!(h.controller.url_input(), "");
}

#[test]
fn startup_prefers_persisted_code() {
	let h = harness("?code=example%20%3A%20true", PageFetcher::default());
	assert_eq!(h.controller.text(), "example : true");
}

#[tokio::test]
async fn persisted_url_is_loaded_on_first_render_pass() {
	let url = "https://example.com/a.lean";
	let mut h = harness("?url=https%3A%2F%2Fexample.com%2Fa.lean", PageFetcher::default().with_page(url, "theorem a : true"));
	assert_eq!(h.controller.text(), format!("-- loading from {url}"));
	assert_eq!(h.controller.url_input(), url);

	assert!(h.controller.render_pass());
	assert_eq!(h.controller.session().pending_load_url, None);
	h.controller.settle_loads().await;

	assert_eq!(h.controller.text(), "theorem a : true");
	assert_eq!(h.controller.session().status_message, None);
	assert_eq!(h.controller.persistence().params().get(CODE_PARAM), Some("theorem a : true"));
}

#[tokio::test]
async fn pending_url_triggers_exactly_one_fetch() {
	let url = "https://example.com/b.lean";
	let mut h = harness("", PageFetcher::default().with_page(url, "b"));

	h.controller.submit_url(url);
	assert_eq!(h.controller.session().pending_load_url.as_deref(), Some(url));
	assert_eq!(h.controller.persistence().params().get(URL_PARAM), Some(url));

	assert!(h.controller.render_pass());
	assert!(!h.controller.render_pass());
	h.controller.settle_loads().await;
	assert!(!h.controller.render_pass());

	assert_eq!(*h.fetcher.calls.lock(), vec![url.to_string()]);
	assert_eq!(h.controller.text(), "b");
}

#[tokio::test]
async fn failed_load_keeps_text_and_reports_status() {
	let mut h = harness("?code=keep%20me", PageFetcher::default());
	h.controller.submit_url("https://example.com/missing.lean");
	h.controller.render_pass();
	h.controller.settle_loads().await;

	assert_eq!(h.controller.text(), "keep me");
	assert_eq!(
		h.controller.session().status_message.as_deref(),
		Some("failed to load https://example.com/missing.lean: HTTP 404")
	);
}

#[tokio::test]
async fn successful_load_clears_previous_status() {
	let good = "https://example.com/good.lean";
	let mut h = harness("", PageFetcher::default().with_page(good, "good"));
	h.controller.submit_url("https://example.com/bad.lean");
	h.controller.render_pass();
	h.controller.settle_loads().await;
	assert!(h.controller.session().status_message.is_some());

	h.controller.submit_url(good);
	h.controller.render_pass();
	h.controller.settle_loads().await;
	assert_eq!(h.controller.session().status_message, None);
	assert_eq!(h.controller.text(), "good");
}

#[tokio::test]
async fn last_fetch_to_finish_wins() {
	let first = "https://example.com/first.lean";
	let second = "https://example.com/second.lean";
	let mut h = harness("", PageFetcher::default());
	let release_first = h.fetcher.hold(first);
	let release_second = h.fetcher.hold(second);

	h.controller.submit_url(first);
	h.controller.render_pass();
	h.controller.submit_url(second);
	h.controller.render_pass();
	assert_eq!(h.controller.loads_in_flight(), 2);

	release_second.send(Ok("second".to_string())).unwrap();
	for _ in 0..100 {
		h.controller.render_pass();
		if h.controller.text() == "second" {
			break;
		}
		tokio::task::yield_now().await;
	}
	assert_eq!(h.controller.text(), "second");

	release_first.send(Ok("first".to_string())).unwrap();
	h.controller.settle_loads().await;

	assert_eq!(h.controller.text(), "first");
	assert_eq!(h.controller.loads_in_flight(), 0);
}

#[test]
fn local_load_cancels_pending_url_and_forgets_it() {
	let mut h = harness("", PageFetcher::default());
	h.controller.submit_url("https://example.com/c.lean");
	h.controller.load_local_text("local text");

	assert_eq!(h.controller.session().pending_load_url, None);
	assert_eq!(h.controller.text(), "local text");
	let params = h.controller.persistence().params();
	assert!(!params.has(URL_PARAM));
	assert_eq!(params.get(CODE_PARAM), Some("local text"));
	assert!(!h.controller.render_pass());
}

#[test]
fn missing_local_file_reports_status_and_keeps_text() {
	let mut h = harness("?code=old", PageFetcher::default());
	let err = h.controller.load_local_file(Path::new("/definitely/not/here.lean")).unwrap_err();
	assert!(matches!(err, SessionError::Io { .. }));
	assert_eq!(h.controller.text(), "old");
	assert!(h.controller.session().status_message.is_some());
}

#[test]
fn editing_url_field_clears_persisted_url() {
	let mut h = harness("?url=https%3A%2F%2Fexample.com%2Fd.lean&code=x", PageFetcher::default());
	h.controller.on_url_input_edited("https://example.com/d");
	assert_eq!(h.controller.url_input(), "https://example.com/d");
	assert_eq!(h.controller.persistence().query_string(), "?code=x");
}

#[test]
fn content_edits_are_persisted() {
	let mut h = harness("", PageFetcher::default());
	h.controller.on_content_change("example : 2 = 2 := rfl");
	assert_eq!(
		h.controller.persistence().params().get(CODE_PARAM),
		Some("example : 2 = 2 := rfl")
	);
}

#[test]
fn resize_classifies_at_the_ratio_boundary() {
	let mut h = harness("", PageFetcher::default());
	assert_eq!(h.controller.resize(Geometry::new(100, 80)), Orientation::Vertical);
	assert_eq!(h.controller.resize(Geometry::new(100, 81)), Orientation::Horizontal);
	assert_eq!(h.controller.session().layout, Orientation::Horizontal);
}

#[test]
fn extent_follows_drag_and_header_state() {
	let mut h = harness("", PageFetcher::default());
	assert_eq!(h.controller.info_panel_extent().width, "38vw");

	h.controller.resize(Geometry::new(100, 200));
	assert_eq!(h.controller.info_panel_extent().height, "calc(35vh - 45px)");
	h.controller.finish_split_drag(300);
	assert_eq!(h.controller.info_panel_extent().height, "calc(95vh - 115px - 300px)");
	assert!(!h.controller.toggle_header());
	assert_eq!(h.controller.info_panel_extent().height, "calc(95vh - 0px - 300px)");
	assert_eq!(h.controller.info_panel_extent().width, "99%");
}

#[test]
fn save_exports_text_under_base_name_without_mutating_session() {
	let h = harness("?code=saved", PageFetcher::default());
	let before = h.controller.session().clone();
	let export = h.controller.save();
	assert_eq!(export.file_name, "test.lean");
	assert_eq!(export.contents, "saved");
	assert_eq!(*h.controller.session(), before);
}

#[tokio::test]
async fn editor_cursor_is_converted_and_queried() {
	let mut h = harness("", PageFetcher::default());
	let query = h.controller.on_editor_cursor(3, 5).unwrap();
	assert_eq!(query.settled().await, QueryOutcome::Applied);

	assert_eq!(h.controller.session().cursor, Some(Position::new(3, 4)));
	let goal = h.controller.feedback().goal.unwrap();
	assert_eq!(goal.state.state_text.as_deref(), Some("test.lean@3:4"));
	let panel = h.controller.feedback_panel();
	assert_eq!(panel.goal.unwrap().state_header.as_deref(), Some("goal at 3:4"));
}

#[tokio::test]
async fn rename_moves_status_and_feedback_to_new_path() {
	let mut h = harness("", PageFetcher::default());
	h.hub.liveness().publish(HashSet::from(["renamed.lean".to_string()]));
	h.hub.diagnostics().publish(vec![
		DiagnosticMessage::new("test.lean", 1, 0, Severity::Error),
		DiagnosticMessage::new("renamed.lean", 2, 0, Severity::Warning),
	]);
	assert!(!h.controller.status().busy);
	h.controller.on_cursor_change(Position::new(1, 0)).unwrap().settled().await;

	let requery = h.controller.rename_document("renamed.lean").unwrap();
	assert_eq!(requery.settled().await, QueryOutcome::Applied);
	assert!(h.controller.status().busy);
	let model = h.controller.feedback();
	assert_eq!(model.diagnostics.len(), 1);
	assert_eq!(model.diagnostics[0].document_path, "renamed.lean");
	assert_eq!(model.goal.unwrap().state.state_text.as_deref(), Some("renamed.lean@1:0"));
	assert_eq!(h.hub.diagnostics().subscriber_count(), 1);
	assert_eq!(h.controller.save().file_name, "renamed.lean");
}

#[test]
fn unmount_releases_store_subscriptions() {
	let mut h = harness("", PageFetcher::default());
	assert_eq!(h.hub.diagnostics().subscriber_count(), 1);
	assert_eq!(h.hub.liveness().subscriber_count(), 1);

	h.controller.unmount();
	h.controller.unmount();
	assert_eq!(h.hub.diagnostics().subscriber_count(), 0);
	assert_eq!(h.hub.liveness().subscriber_count(), 0);
}

#[tokio::test]
async fn finished_load_is_dropped_after_unmount() {
	let url = "https://example.com/late.lean";
	let mut h = harness("?code=orig", PageFetcher::default());
	let release = h.fetcher.hold(url);
	h.controller.submit_url(url);
	assert!(h.controller.render_pass());

	release.send(Ok("fetched".to_string())).unwrap();
	for _ in 0..100 {
		if h.controller.loads.iter().all(|task| task.is_finished()) {
			break;
		}
		tokio::task::yield_now().await;
	}
	assert!(h.controller.loads.iter().all(|task| task.is_finished()));

	h.controller.unmount();
	assert!(!h.controller.is_mounted());
	assert!(!h.controller.render_pass());
	h.controller.settle_loads().await;

	assert_eq!(h.controller.text(), "orig");
	assert_eq!(h.controller.persistence().params().get(CODE_PARAM), Some("orig"));
}

#[tokio::test]
async fn pending_url_is_not_fetched_after_unmount() {
	let url = "https://example.com/never.lean";
	let mut h = harness("", PageFetcher::default().with_page(url, "never"));
	h.controller.submit_url(url);
	h.controller.unmount();

	assert!(!h.controller.render_pass());
	h.controller.settle_loads().await;
	assert!(h.fetcher.calls.lock().is_empty());
	assert_eq!(h.controller.text(), DEFAULT_CONTENT);
}

#[test]
fn view_collects_frame_state() {
	let h = harness("?code=x", PageFetcher::default());
	let view = h.controller.view();
	assert_eq!(view.text, "x");
	assert_eq!(view.status.label, "ready!");
	assert_eq!(view.layout, Orientation::Vertical);
	assert!(view.panel.is_empty());
	assert_eq!(view.status_message, None);
}
