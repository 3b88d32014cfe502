//! Backend-fed stores: the latest diagnostic batch and the busy-document set.
//!
//! Both stores are thin typed wrappers over [`Broadcast`]. Only the backend
//! side publishes; views read [`current`](DiagnosticStore::current) and
//! subscribe.

use std::collections::HashSet;
use std::sync::Arc;

use proofview_primitives::{DiagnosticMessage, filter_for_document};
use tracing::debug;

use crate::broadcast::{Broadcast, Subscription};

/// Latest full batch of diagnostics pushed by the analysis service.
///
/// A publish replaces the whole batch; messages from earlier batches are not
/// merged in.
#[derive(Debug, Clone)]
pub struct DiagnosticStore {
	inner: Broadcast<Vec<DiagnosticMessage>>,
}

impl Default for DiagnosticStore {
	fn default() -> Self {
		Self::new()
	}
}

impl DiagnosticStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self {
			inner: Broadcast::new("diagnostics", Vec::new()),
		}
	}

	/// Replaces the visible batch and notifies subscribers.
	pub fn publish(&self, batch: Vec<DiagnosticMessage>) {
		debug!(messages = batch.len(), "diagnostics batch published");
		self.inner.publish(batch);
	}

	/// Returns the latest batch.
	pub fn current(&self) -> Arc<Vec<DiagnosticMessage>> {
		self.inner.current()
	}

	/// Returns the latest batch's messages for one document, in batch order.
	pub fn for_document(&self, document_path: &str) -> Vec<DiagnosticMessage> {
		filter_for_document(&self.inner.current(), document_path)
	}

	/// Registers a listener called with every new batch.
	pub fn subscribe(&self, listener: impl Fn(&[DiagnosticMessage]) + Send + Sync + 'static) -> Subscription {
		self.inner.subscribe(move |batch: &Vec<DiagnosticMessage>| listener(batch))
	}

	/// Returns the number of registered listeners.
	pub fn subscriber_count(&self) -> usize {
		self.inner.subscriber_count()
	}
}

/// Set of document paths the backend is currently analysing.
#[derive(Debug, Clone)]
pub struct LivenessTracker {
	inner: Broadcast<HashSet<String>>,
}

impl Default for LivenessTracker {
	fn default() -> Self {
		Self::new()
	}
}

impl LivenessTracker {
	/// Creates a tracker with no busy documents.
	pub fn new() -> Self {
		Self {
			inner: Broadcast::new("liveness", HashSet::new()),
		}
	}

	/// Replaces the busy set and notifies subscribers.
	pub fn publish(&self, busy: HashSet<String>) {
		debug!(busy = busy.len(), "busy set published");
		self.inner.publish(busy);
	}

	/// Returns the latest busy set.
	pub fn current(&self) -> Arc<HashSet<String>> {
		self.inner.current()
	}

	/// Returns true if `document_path` is in the latest busy set.
	pub fn is_busy(&self, document_path: &str) -> bool {
		self.inner.current().contains(document_path)
	}

	/// Registers a listener called with every new busy set.
	pub fn subscribe(&self, listener: impl Fn(&HashSet<String>) + Send + Sync + 'static) -> Subscription {
		self.inner.subscribe(listener)
	}

	/// Returns the number of registered listeners.
	pub fn subscriber_count(&self) -> usize {
		self.inner.subscriber_count()
	}
}
