use thiserror::Error;

use crate::position::Position;

/// Failure to resolve a position or edit against a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
	/// The line does not exist.
	#[error("line {line} out of bounds (document has {lines} lines)")]
	LineOutOfBounds {
		/// Requested line.
		line: u32,
		/// Number of lines in the document.
		lines: usize,
	},
	/// The character offset is past the end of its line.
	#[error("character {}:{} out of bounds (line has {len} characters)", .pos.line, .pos.character)]
	CharacterOutOfBounds {
		/// Requested position.
		pos: Position,
		/// Length of the line, line break excluded.
		len: usize,
	},
	/// Two edits of one batch overlap.
	#[error("edits overlap at {}:{}", .at.line, .at.character)]
	OverlappingEdits {
		/// Start of the second edit.
		at: Position,
	},
}
