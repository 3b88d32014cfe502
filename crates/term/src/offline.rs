//! Analysis service used when no backend is attached.

use async_trait::async_trait;
use proofview_backend::{AnalysisService, QueryError};
use proofview_primitives::{Position, ProofState};
use tracing::trace;

/// Answers every point query with [`QueryError::Unavailable`].
///
/// Diagnostics still flow through the hub, so the info panel shows whatever
/// batch was published.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAnalysis;

#[async_trait]
impl AnalysisService for OfflineAnalysis {
	async fn query(&self, document_path: &str, position: Position) -> Result<Option<ProofState>, QueryError> {
		trace!(path = document_path, %position, "offline point query");
		Err(QueryError::Unavailable)
	}
}
