use proptest::prelude::*;

use super::*;

#[test]
fn zero_line_is_clamped() {
	assert_eq!(Position::new(0, 4), Position::new(1, 4));
}

#[test]
fn editor_columns_are_shifted_to_zero_based() {
	assert_eq!(Position::from_editor(3, 1), Position::new(3, 0));
	assert_eq!(Position::from_editor(3, 9), Position::new(3, 8));
	assert_eq!(Position::from_editor(3, 0), Position::new(3, 0));
}

#[test]
fn display_is_line_colon_column() {
	assert_eq!(Position::new(12, 7).to_string(), "12:7");
}

proptest! {
	#[test]
	fn constructed_lines_are_never_zero(line in 0u32..10_000, column in 0u32..10_000) {
		let pos = Position::new(line, column);
		prop_assert!(pos.line >= 1);
		prop_assert_eq!(pos.column, column);
	}
}
