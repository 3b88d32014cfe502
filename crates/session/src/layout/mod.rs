//! Split orientation and info-panel sizing policy.

use std::fmt;

/// How the editor and info panes are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
	/// Side by side, divider running top to bottom.
	#[default]
	Vertical,
	/// Stacked, divider running left to right.
	Horizontal,
}

impl Orientation {
	/// Returns the split-pane name of the orientation.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Vertical => "vertical",
			Self::Horizontal => "horizontal",
		}
	}
}

impl fmt::Display for Orientation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Client size of the editing container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
	/// Container width.
	pub width: u32,
	/// Container height.
	pub height: u32,
}

impl Geometry {
	/// Creates a geometry.
	pub const fn new(width: u32, height: u32) -> Self {
		Self { width, height }
	}
}

/// Classifies the container: horizontal iff `height > ratio * width`.
pub fn classify(geometry: Geometry, ratio: f64) -> Orientation {
	if f64::from(geometry.height) > ratio * f64::from(geometry.width) {
		Orientation::Horizontal
	} else {
		Orientation::Vertical
	}
}

/// Size expressions for the info panel container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPanelExtent {
	/// Height expression.
	pub height: String,
	/// Width expression.
	pub width: String,
}

/// Header height subtracted once the divider has been dragged.
const EXPANDED_HEADER_DRAGGED_PX: u32 = 115;
/// Header height subtracted before the divider has been dragged.
const EXPANDED_HEADER_INITIAL_PX: u32 = 45;

/// Computes the info panel size for the current layout.
///
/// `split_size` is the editor pane size after the last divider drag; before
/// any drag the panel takes its initial share. An expanded header eats into
/// the stacked layout's height.
pub fn info_panel_extent(orientation: Orientation, split_size: Option<u32>, header_expanded: bool) -> InfoPanelExtent {
	let header = |px: u32| if header_expanded { px } else { 0 };
	let height = match (orientation, split_size) {
		(Orientation::Horizontal, Some(size)) => {
			format!("calc(95vh - {}px - {size}px)", header(EXPANDED_HEADER_DRAGGED_PX))
		}
		(Orientation::Horizontal, None) => format!("calc(35vh - {}px)", header(EXPANDED_HEADER_INITIAL_PX)),
		(Orientation::Vertical, _) => "100%".to_string(),
	};
	let width = match (orientation, split_size) {
		(Orientation::Vertical, Some(size)) => format!("calc(98vw - {size}px)"),
		(Orientation::Vertical, None) => "38vw".to_string(),
		(Orientation::Horizontal, _) => "99%".to_string(),
	};
	InfoPanelExtent { height, width }
}
