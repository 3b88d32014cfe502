//! Render plan for the info panel.
//!
//! The panel is described as data: headers, code blocks and the
//! documentation toggle, in display order. Front ends decide how to draw it.

use std::fmt::Write as _;

use proofview_primitives::{DiagnosticMessage, GoalAt, Severity};

use crate::config::DocPreviewConfig;

/// Colors used by the panel and the status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelColor {
	/// Information messages.
	Green,
	/// Warnings, and the busy status label.
	Orange,
	/// Errors.
	Red,
	/// The ready status label.
	LightGreen,
}

impl PanelColor {
	/// Returns the color for a diagnostic severity.
	pub const fn for_severity(severity: Severity) -> Self {
		match severity {
			Severity::Information => Self::Green,
			Severity::Warning => Self::Orange,
			Severity::Error => Self::Red,
		}
	}

	/// Returns the CSS color name.
	pub const fn as_css(self) -> &'static str {
		match self {
			Self::Green => "green",
			Self::Orange => "orange",
			Self::Red => "red",
			Self::LightGreen => "lightgreen",
		}
	}
}

/// Rendered info panel: the goal block, then one block per diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackPanel {
	/// Proof-state block, absent when no goal is shown.
	pub goal: Option<GoalView>,
	/// Diagnostics in batch order.
	pub messages: Vec<MessageView>,
}

/// Proof-state block.
///
/// Fields are in display order; each is present only when the goal carries
/// the data it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalView {
	/// `tactic ... at L:C`, or `type [of ...] at L:C` when there is no tactic.
	pub header: Option<String>,
	/// Type signature, shown only for non-tactic goals.
	pub type_body: Option<String>,
	/// Collapsible documentation.
	pub documentation: Option<DocumentationView>,
	/// `goal at L:C`.
	pub state_header: Option<String>,
	/// Goal state text.
	pub state_body: Option<String>,
}

/// Documentation with its collapse state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationView {
	/// Full documentation text.
	pub text: String,
	/// Whether the full text is shown.
	pub expanded: bool,
	truncate_at: usize,
}

impl DocumentationView {
	/// Returns the text as currently displayed.
	pub fn visible(&self) -> String {
		if self.expanded {
			return self.text.clone();
		}
		let preview: String = self.text.chars().take(self.truncate_at).collect();
		format!("{preview} [...]")
	}
}

/// One diagnostic block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
	/// `L:C: severity: caption`.
	pub header: String,
	/// Header color.
	pub color: PanelColor,
	/// Raw message body.
	pub body: String,
}

impl MessageView {
	fn from_message(message: &DiagnosticMessage) -> Self {
		Self {
			header: format!(
				"{}:{}: {}: {}",
				message.line, message.column, message.severity, message.caption
			),
			color: PanelColor::for_severity(message.severity),
			body: message.body.clone(),
		}
	}
}

/// Returns whether documentation of this length starts expanded.
pub(crate) fn documentation_starts_expanded(text: &str, preview: &DocPreviewConfig) -> bool {
	text.chars().count() < preview.threshold
}

impl GoalView {
	fn build(goal: &GoalAt, doc_expanded: Option<bool>, preview: &DocPreviewConfig) -> Self {
		let state = &goal.state;
		let at = goal.position;

		let header = match (&state.tactic_text, &state.type_text) {
			(Some(tactic), _) => Some(format!("tactic {tactic} at {at}")),
			(None, Some(_)) => Some(match &state.full_identifier {
				Some(id) => format!("type of {id} at {at}"),
				None => format!("type at {at}"),
			}),
			(None, None) => None,
		};
		let type_body = match state.tactic_text {
			Some(_) => None,
			None => state.type_text.clone(),
		};
		let documentation = state.documentation.as_ref().map(|text| DocumentationView {
			expanded: doc_expanded.unwrap_or_else(|| documentation_starts_expanded(text, preview)),
			text: text.clone(),
			truncate_at: preview.truncate_at,
		});

		Self {
			header,
			type_body,
			documentation,
			state_header: state.state_text.as_ref().map(|_| format!("goal at {at}")),
			state_body: state.state_text.clone(),
		}
	}
}

impl FeedbackPanel {
	/// Builds the panel for a goal and the document's diagnostics.
	///
	/// `doc_expanded` overrides the default collapse state of the documentation.
	pub fn build(
		goal: Option<&GoalAt>,
		doc_expanded: Option<bool>,
		diagnostics: &[DiagnosticMessage],
		preview: &DocPreviewConfig,
	) -> Self {
		Self {
			goal: goal.map(|goal| GoalView::build(goal, doc_expanded, preview)),
			messages: diagnostics.iter().map(MessageView::from_message).collect(),
		}
	}

	/// Returns true when there is nothing to show.
	pub fn is_empty(&self) -> bool {
		self.goal.is_none() && self.messages.is_empty()
	}

	/// Renders the panel as plain text, one block per paragraph.
	pub fn to_text(&self) -> String {
		let mut blocks: Vec<String> = Vec::new();
		if let Some(goal) = &self.goal {
			let mut block = String::new();
			let lines = [
				goal.header.clone(),
				goal.type_body.clone(),
				goal.documentation.as_ref().map(DocumentationView::visible),
				goal.state_header.clone(),
				goal.state_body.clone(),
			];
			for line in lines.into_iter().flatten() {
				let _ = writeln!(block, "{line}");
			}
			blocks.push(block);
		}
		for message in &self.messages {
			blocks.push(format!("{}\n{}\n", message.header, message.body));
		}
		blocks.join("\n")
	}
}
