//! Point-query contract of the analysis service.

use async_trait::async_trait;
use proofview_primitives::{Position, ProofState};
use thiserror::Error;

/// Errors a point query can fail with.
///
/// Callers in the feedback path treat every variant as "no proof state".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
	/// The service answered with an error.
	#[error("query rejected: {0}")]
	Rejected(String),
	/// The service is not running or the connection to it was lost.
	#[error("analysis service unavailable")]
	Unavailable,
}

/// Asynchronous analysis backend answering proof-state point queries.
///
/// No ordering is guaranteed between outstanding queries, and there is no way
/// to cancel one; callers discard responses they no longer need.
#[async_trait]
pub trait AnalysisService: Send + Sync {
	/// Queries the proof state at `position` in `document_path`.
	async fn query(&self, document_path: &str, position: Position) -> Result<Option<ProofState>, QueryError>;
}
