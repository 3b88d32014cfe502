use async_trait::async_trait;
use proofview_primitives::{Position, ProofState, Severity};

use super::*;
use crate::service::QueryError;

struct NoGoals;

#[async_trait]
impl AnalysisService for NoGoals {
	async fn query(&self, _document_path: &str, _position: Position) -> Result<Option<ProofState>, QueryError> {
		Ok(None)
	}
}

fn hub() -> AnalysisHub {
	AnalysisHub::new(Arc::new(NoGoals))
}

#[test]
fn apply_routes_pushes_to_stores() {
	let hub = hub();
	hub.apply(BackendPush::Diagnostics(vec![DiagnosticMessage::new(
		"/test.lean",
		1,
		0,
		Severity::Warning,
	)]));
	hub.apply(BackendPush::Busy(HashSet::from(["/test.lean".to_string()])));

	assert_eq!(hub.diagnostics().current().len(), 1);
	assert!(hub.liveness().is_busy("/test.lean"));
}

#[tokio::test]
async fn pump_drains_until_senders_close() {
	let hub = hub();
	let (tx, rx) = push_channel();
	tx.send(BackendPush::Busy(HashSet::from(["/a.lean".to_string()]))).unwrap();
	tx.send(BackendPush::Diagnostics(Vec::new())).unwrap();
	tx.send(BackendPush::Busy(HashSet::new())).unwrap();
	drop(tx);

	assert_eq!(hub.pump(rx).await, 3);
	assert!(!hub.liveness().is_busy("/a.lean"));
}

#[tokio::test]
async fn service_handle_answers_queries() {
	let hub = hub();
	let state = hub.service().query("/test.lean", Position::new(1, 0)).await;
	assert_eq!(state, Ok(None));
}
