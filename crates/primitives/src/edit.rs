//! Text edit types.

use crate::position::{Position, Range, end_of_insert};

/// Where a document change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOrigin {
	/// Typed or otherwise produced by the user.
	User,
	/// Produced by an editor component, tagged with its name.
	///
	/// Components use the tag to recognise echoes of their own edits.
	Internal(&'static str),
}

/// Replacement of `range` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
	/// The replaced range, in pre-edit coordinates.
	pub range: Range,
	/// The inserted text.
	pub new_text: String,
}

impl TextEdit {
	/// Creates a new edit.
	pub fn new(range: Range, new_text: impl Into<String>) -> Self {
		Self {
			range,
			new_text: new_text.into(),
		}
	}

	/// Creates a pure insertion at `pos`.
	pub fn insert(pos: Position, new_text: impl Into<String>) -> Self {
		Self::new(Range::point(pos), new_text)
	}

	/// Creates a pure deletion of `range`.
	pub fn delete(range: Range) -> Self {
		Self::new(range, String::new())
	}

	/// Returns true if nothing is removed.
	pub fn is_insert(&self) -> bool {
		self.range.is_empty()
	}

	/// Returns true if nothing is inserted.
	pub fn is_delete(&self) -> bool {
		self.new_text.is_empty()
	}

	/// Returns true if the edit neither spans nor introduces a line break.
	pub fn is_single_line(&self) -> bool {
		self.range.is_single_line() && !self.new_text.contains('\n')
	}

	/// Inserted length in characters.
	pub fn inserted_len(&self) -> usize {
		self.new_text.chars().count()
	}

	/// Removed length in characters for a single-line edit.
	pub fn removed_len(&self) -> usize {
		self.range.char_len() as usize
	}

	/// Net change in characters for a single-line edit.
	pub fn len_delta(&self) -> isize {
		self.inserted_len() as isize - self.removed_len() as isize
	}

	/// True when both edits replace the same number of characters with the
	/// same number of characters.
	pub fn same_shape(&self, other: &TextEdit) -> bool {
		self.removed_len() == other.removed_len() && self.inserted_len() == other.inserted_len()
	}

	/// The position right after the inserted text, in post-edit coordinates.
	pub fn end_after(&self) -> Position {
		end_of_insert(self.range.start, &self.new_text)
	}
}
