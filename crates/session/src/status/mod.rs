//! Busy indicator for the open document.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use proofview_backend::{LivenessTracker, SubscriptionSet};
use tracing::debug;

use crate::feedback::PanelColor;

/// Label shown while the backend analyses the document.
pub const BUSY_LABEL: &str = "running...";
/// Label shown once analysis finished.
pub const READY_LABEL: &str = "ready!";

/// Rendered status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusView {
	/// Whether the document is under analysis.
	pub busy: bool,
	/// Text of the indicator.
	pub label: &'static str,
	/// Background color of the indicator.
	pub color: PanelColor,
}

impl StatusView {
	/// Returns the view for a busy flag.
	pub const fn new(busy: bool) -> Self {
		if busy {
			Self {
				busy,
				label: BUSY_LABEL,
				color: PanelColor::Orange,
			}
		} else {
			Self {
				busy,
				label: READY_LABEL,
				color: PanelColor::LightGreen,
			}
		}
	}
}

/// Tracks whether one document is in the backend's busy set.
///
/// The flag is recomputed on mount, on every liveness publish, and whenever
/// the document path changes. Nothing else is cached.
pub struct StatusTracker {
	document_path: Arc<Mutex<String>>,
	busy: Arc<AtomicBool>,
	liveness: LivenessTracker,
	subscriptions: SubscriptionSet,
}

impl std::fmt::Debug for StatusTracker {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StatusTracker")
			.field("document_path", &*self.document_path.lock())
			.field("busy", &self.is_busy())
			.finish_non_exhaustive()
	}
}

impl StatusTracker {
	/// Starts tracking `document_path`.
	pub fn mount(document_path: impl Into<String>, liveness: LivenessTracker) -> Self {
		let document_path = Arc::new(Mutex::new(document_path.into()));
		let busy = Arc::new(AtomicBool::new(false));

		let mut subscriptions = SubscriptionSet::new();
		let listener_path = Arc::clone(&document_path);
		let listener_busy = Arc::clone(&busy);
		subscriptions.push(liveness.subscribe(move |set| {
			let path = listener_path.lock();
			listener_busy.store(set.contains(path.as_str()), Ordering::Release);
		}));

		let tracker = Self {
			document_path,
			busy,
			liveness,
			subscriptions,
		};
		tracker.recompute();
		tracker
	}

	/// Switches to another document and recomputes the flag.
	pub fn set_document_path(&self, document_path: impl Into<String>) {
		let document_path = document_path.into();
		debug!(path = %document_path, "status tracking moved");
		*self.document_path.lock() = document_path;
		self.recompute();
	}

	/// Returns the latest flag.
	pub fn is_busy(&self) -> bool {
		self.busy.load(Ordering::Acquire)
	}

	/// Returns the indicator for the latest flag.
	pub fn view(&self) -> StatusView {
		StatusView::new(self.is_busy())
	}

	/// Stops tracking. Later calls are no-ops.
	pub fn unmount(&mut self) {
		self.subscriptions.dispose_all();
	}

	fn recompute(&self) {
		let path = self.document_path.lock();
		self.busy.store(self.liveness.is_busy(&path), Ordering::Release);
	}
}

impl Drop for StatusTracker {
	fn drop(&mut self) {
		self.unmount();
	}
}
