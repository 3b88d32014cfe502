//! Wiring between the analysis service's push streams and the stores.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use proofview_primitives::DiagnosticMessage;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::service::AnalysisService;
use crate::store::{DiagnosticStore, LivenessTracker};

/// One push from the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendPush {
	/// A full diagnostics batch replacing the previous one.
	Diagnostics(Vec<DiagnosticMessage>),
	/// The full set of documents currently under analysis.
	Busy(HashSet<String>),
}

/// Sender half handed to the analysis service's transport.
pub type BackendPushSender = mpsc::UnboundedSender<BackendPush>;

/// Receiver half drained by [`AnalysisHub::pump`].
pub type BackendPushReceiver = mpsc::UnboundedReceiver<BackendPush>;

/// Creates a channel for [`BackendPush`] events.
pub fn push_channel() -> (BackendPushSender, BackendPushReceiver) {
	mpsc::unbounded_channel()
}

/// Shared handles to the analysis service and the stores it feeds.
///
/// The hub is the only writer of the stores; views receive clones of the
/// store handles and only read or subscribe.
#[derive(Clone)]
pub struct AnalysisHub {
	service: Arc<dyn AnalysisService>,
	diagnostics: DiagnosticStore,
	liveness: LivenessTracker,
}

impl fmt::Debug for AnalysisHub {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AnalysisHub")
			.field("diagnostics", &self.diagnostics)
			.field("liveness", &self.liveness)
			.finish_non_exhaustive()
	}
}

impl AnalysisHub {
	/// Creates a hub with empty stores.
	pub fn new(service: Arc<dyn AnalysisService>) -> Self {
		Self {
			service,
			diagnostics: DiagnosticStore::new(),
			liveness: LivenessTracker::new(),
		}
	}

	/// Returns the point-query service.
	pub fn service(&self) -> Arc<dyn AnalysisService> {
		Arc::clone(&self.service)
	}

	/// Returns the diagnostics store.
	pub fn diagnostics(&self) -> &DiagnosticStore {
		&self.diagnostics
	}

	/// Returns the busy-document tracker.
	pub fn liveness(&self) -> &LivenessTracker {
		&self.liveness
	}

	/// Publishes one push into the matching store.
	pub fn apply(&self, push: BackendPush) {
		match push {
			BackendPush::Diagnostics(batch) => self.diagnostics.publish(batch),
			BackendPush::Busy(busy) => self.liveness.publish(busy),
		}
	}

	/// Publishes pushes until every sender is dropped.
	///
	/// Returns the number of pushes applied.
	pub async fn pump(&self, mut rx: BackendPushReceiver) -> usize {
		info!("backend push pump started");
		let mut applied = 0;
		while let Some(push) = rx.recv().await {
			self.apply(push);
			applied += 1;
		}
		debug!(applied, "backend push pump finished");
		applied
	}
}

#[cfg(test)]
mod tests;
