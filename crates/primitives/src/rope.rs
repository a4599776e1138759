//! Rope utilities: position/offset conversion and edit application.

use ropey::{Rope, RopeSlice};

use crate::edit::TextEdit;
use crate::error::PositionError;
use crate::position::Position;

/// Length of line `line` in characters, line break excluded.
pub fn line_len(text: RopeSlice, line: usize) -> Option<usize> {
	if line >= text.len_lines() {
		return None;
	}
	let slice = text.line(line);
	let mut len = slice.len_chars();
	if len > 0 && slice.char(len - 1) == '\n' {
		len -= 1;
		if len > 0 && slice.char(len - 1) == '\r' {
			len -= 1;
		}
	}
	Some(len)
}

/// Content of line `line`, line break excluded.
pub fn line_text(text: RopeSlice, line: usize) -> Option<String> {
	let len = line_len(text, line)?;
	Some(text.line(line).slice(..len).to_string())
}

/// Converts a char offset into a position. Offsets past the end clamp to the end.
pub fn position_at(text: RopeSlice, char_idx: usize) -> Position {
	let char_idx = char_idx.min(text.len_chars());
	let line = text.char_to_line(char_idx);
	let character = char_idx - text.line_to_char(line);
	Position::new(line as u32, character as u32)
}

/// Converts a position into a char offset.
pub fn offset_at(text: RopeSlice, pos: Position) -> Result<usize, PositionError> {
	let line = pos.line as usize;
	let len = line_len(text, line).ok_or(PositionError::LineOutOfBounds {
		line: pos.line,
		lines: text.len_lines(),
	})?;
	if pos.character as usize > len {
		return Err(PositionError::CharacterOutOfBounds { pos, len });
	}
	Ok(text.line_to_char(line) + pos.character as usize)
}

/// Applies a batch of non-overlapping edits given in pre-edit coordinates.
///
/// Edits may come in any order; edits starting at the same position keep
/// their relative order.
pub fn apply_edits(text: &Rope, edits: &[TextEdit]) -> Result<Rope, PositionError> {
	let slice = text.slice(..);
	let mut resolved = Vec::with_capacity(edits.len());
	for edit in edits {
		let start = offset_at(slice, edit.range.start)?;
		let end = offset_at(slice, edit.range.end)?.max(start);
		resolved.push((start, end, edit));
	}
	resolved.sort_by_key(|(start, end, _)| (*start, *end));
	for pair in resolved.windows(2) {
		if pair[1].0 < pair[0].1 {
			return Err(PositionError::OverlappingEdits {
				at: pair[1].2.range.start,
			});
		}
	}

	let mut out = text.clone();
	for (start, end, edit) in resolved.into_iter().rev() {
		out.remove(start..end);
		out.insert(start, &edit.new_text);
	}
	Ok(out)
}
