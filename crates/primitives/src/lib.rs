//! Core data model shared by the analysis backend adapters and the editing session.

/// Backend-reported diagnostics and their severities.
pub mod diagnostic;
/// Proof-state records returned by point queries.
pub mod goal;
/// Cursor positions in document coordinates.
pub mod position;

pub use diagnostic::{DiagnosticMessage, Severity, UnknownSeverity, filter_for_document};
pub use goal::{GoalAt, ProofState};
pub use position::Position;

/// Returns the final path component of a document path.
///
/// Both `/` and `\` separate components so that paths reported by the backend
/// resolve the same way on every platform. Falls back to the whole input when
/// the path ends in a separator.
pub fn base_name(document_path: &str) -> &str {
	document_path
		.rsplit(['/', '\\'])
		.find(|segment| !segment.is_empty())
		.unwrap_or(document_path)
}
