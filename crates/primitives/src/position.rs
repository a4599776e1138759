//! Line/character coordinates.
//!
//! Characters are counted in Unicode scalar values, the same unit `ropey`
//! indexes by.

use std::cmp::Ordering;


/// A position in a document in line/character coordinates.
///
/// Ordering compares the line first, then the character.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
	/// Zero-based line index.
	pub line: u32,
	/// Zero-based character offset in the line.
	pub character: u32,
}

impl Position {
	/// Creates a new position.
	pub const fn new(line: u32, character: u32) -> Self {
		Self { line, character }
	}

	/// Where `self`, given relative to the start of a text fragment, lands
	/// once that fragment is placed at `base`.
	///
	/// The first relative line continues `base`'s line, so its character is
	/// offset by `base.character`; later lines keep their own column.
	pub fn relative_to(self, base: Position) -> Position {
		if self.line == 0 {
			Position::new(base.line, base.character + self.character)
		} else {
			Position::new(base.line + self.line, self.character)
		}
	}
}

/// A half-open range between two positions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
	/// Start position (inclusive).
	pub start: Position,
	/// End position (exclusive).
	pub end: Position,
}

impl Range {
	/// Creates a new range.
	pub const fn new(start: Position, end: Position) -> Self {
		Self { start, end }
	}

	/// Creates a range from raw line/character coordinates.
	pub const fn from_coords(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Self {
		Self {
			start: Position::new(start_line, start_char),
			end: Position::new(end_line, end_char),
		}
	}

	/// Creates a range confined to a single line.
	pub const fn on_line(line: u32, start_char: u32, end_char: u32) -> Self {
		Self::from_coords(line, start_char, line, end_char)
	}

	/// Creates a zero-length range at a position.
	pub const fn point(pos: Position) -> Self {
		Self { start: pos, end: pos }
	}

	/// Returns true if start and end are the same position.
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Returns true if the range starts and ends on the same line.
	pub fn is_single_line(&self) -> bool {
		self.start.line == self.end.line
	}

	/// Character width of a single-line range; zero for multi-line ranges.
	pub fn char_len(&self) -> u32 {
		if self.is_single_line() {
			self.end.character.saturating_sub(self.start.character)
		} else {
			0
		}
	}

	/// Locates `pos` relative to this range, boundaries included.
	///
	/// Returns `Less` before the start, `Greater` after the end and `Equal`
	/// anywhere in `[start, end]`.
	pub fn locate(&self, pos: Position) -> Ordering {
		if pos < self.start {
			Ordering::Less
		} else if pos > self.end {
			Ordering::Greater
		} else {
			Ordering::Equal
		}
	}

	/// Returns true if `pos` lies in `[start, end]`.
	pub fn contains_position(&self, pos: Position) -> bool {
		self.locate(pos) == Ordering::Equal
	}

	/// Returns true if `other` lies entirely in `[start, end]`.
	pub fn contains_range(&self, other: &Range) -> bool {
		self.contains_position(other.start) && self.contains_position(other.end)
	}

	/// Returns true if the ranges overlap or touch, or one is nested in the other.
	pub fn intersects(&self, other: &Range) -> bool {
		other.contains_position(self.start) || other.contains_position(self.end) || self.contains_range(other)
	}

	/// Returns true if the ranges share at least one character.
	///
	/// Ranges that merely touch at a boundary do not overlap.
	pub fn overlaps(&self, other: &Range) -> bool {
		if self.end <= other.start {
			return false;
		}
		self.start < other.end
	}
}

/// The position right after `text` once it is inserted at `start`.
pub fn end_of_insert(start: Position, text: &str) -> Position {
	let mut lines = 0u32;
	let mut last_len = 0u32;
	for ch in text.chars() {
		if ch == '\n' {
			lines += 1;
			last_len = 0;
		} else {
			last_len += 1;
		}
	}
	if lines == 0 {
		Position::new(start.line, start.character + last_len)
	} else {
		Position::new(start.line + lines, last_len)
	}
}
