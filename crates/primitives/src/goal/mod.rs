use serde::{Deserialize, Serialize};

use crate::Position;

/// Proof-state information at a cursor position.
///
/// Every field is independently optional; which ones are present decides
/// which panel blocks get rendered. Serialized names follow the backend's
/// info records (`text`, `doc`, `type`, `full-id`, `state`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofState {
	/// Name of the tactic under the cursor.
	#[serde(rename = "text", default, skip_serializing_if = "Option::is_none")]
	pub tactic_text: Option<String>,
	/// Documentation for the identifier or tactic under the cursor.
	#[serde(rename = "doc", default, skip_serializing_if = "Option::is_none")]
	pub documentation: Option<String>,
	/// Type of the term under the cursor.
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub type_text: Option<String>,
	/// Fully qualified identifier of the term under the cursor.
	#[serde(rename = "full-id", default, skip_serializing_if = "Option::is_none")]
	pub full_identifier: Option<String>,
	/// Pretty-printed goal state.
	#[serde(rename = "state", default, skip_serializing_if = "Option::is_none")]
	pub state_text: Option<String>,
}

impl ProofState {
	/// Returns true when no field is set.
	pub fn is_empty(&self) -> bool {
		self.tactic_text.is_none()
			&& self.documentation.is_none()
			&& self.type_text.is_none()
			&& self.full_identifier.is_none()
			&& self.state_text.is_none()
	}

	/// Sets the tactic text.
	pub fn with_tactic(mut self, text: impl Into<String>) -> Self {
		self.tactic_text = Some(text.into());
		self
	}

	/// Sets the documentation text.
	pub fn with_documentation(mut self, doc: impl Into<String>) -> Self {
		self.documentation = Some(doc.into());
		self
	}

	/// Sets the type text.
	pub fn with_type(mut self, ty: impl Into<String>) -> Self {
		self.type_text = Some(ty.into());
		self
	}

	/// Sets the fully qualified identifier.
	pub fn with_full_identifier(mut self, id: impl Into<String>) -> Self {
		self.full_identifier = Some(id.into());
		self
	}

	/// Sets the goal state text.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state_text = Some(state.into());
		self
	}
}

/// A proof state paired with the cursor it was queried for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalAt {
	/// The resolved proof state.
	pub state: ProofState,
	/// Cursor the query was issued for.
	pub position: Position,
}
