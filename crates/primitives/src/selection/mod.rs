//! Turning cursor positions and selections into single-line ranges.
//!
//! Every helper takes the line lengths it needs through a `line_len`
//! callback so callers can back it with whatever document storage they have.

use crate::position::{Position, Range};

#[cfg(test)]
mod tests;

/// Returns true for characters that make up a word.
pub fn is_word_char(ch: char) -> bool {
	ch.is_alphanumeric() || ch == '_'
}

/// The word under `pos` in `line_text`, if the character at `pos` is a word character.
pub fn word_range_at(line_text: &str, pos: Position) -> Option<Range> {
	let chars: Vec<char> = line_text.chars().collect();
	let at = pos.character as usize;
	if !chars.get(at).copied().is_some_and(is_word_char) {
		return None;
	}
	let mut start = at;
	while start > 0 && is_word_char(chars[start - 1]) {
		start -= 1;
	}
	let mut end = at + 1;
	while end < chars.len() && is_word_char(chars[end]) {
		end += 1;
	}
	Some(Range::on_line(pos.line, start as u32, end as u32))
}

/// A one-character range under `pos`.
///
/// At or past the end of the line the last character is used instead, so
/// the range always covers something that can be highlighted on a
/// non-empty line.
pub fn char_range_at(line_len: u32, pos: Position) -> Range {
	if pos.character >= line_len {
		Range::on_line(pos.line, line_len.saturating_sub(1), line_len)
	} else {
		Range::on_line(pos.line, pos.character, pos.character + 1)
	}
}

/// Splits a characterwise range into one range per line, dropping empty pieces.
pub fn split_range(range: Range, line_len: impl Fn(u32) -> u32) -> Vec<Range> {
	let mut out = Vec::new();
	for line in range.start.line..=range.end.line {
		let start = if line == range.start.line { range.start.character } else { 0 };
		let end = if line == range.end.line {
			range.end.character
		} else {
			line_len(line)
		};
		if start < end {
			out.push(Range::on_line(line, start, end));
		}
	}
	out
}

/// Splits a blockwise selection into one column range per line.
///
/// The corners may be given in any order; each piece is clamped to its
/// line's length.
pub fn block_ranges(range: Range, line_len: impl Fn(u32) -> u32) -> Vec<Range> {
	let (first, last) = if range.start.line <= range.end.line {
		(range.start.line, range.end.line)
	} else {
		(range.end.line, range.start.line)
	};
	let left = range.start.character.min(range.end.character);
	let right = range.start.character.max(range.end.character);
	(first..=last)
		.map(|line| {
			let len = line_len(line);
			Range::on_line(line, left.min(len), right.min(len))
		})
		.collect()
}

/// One range per line covering each whole line in `first..=last`.
pub fn line_ranges(first: u32, last: u32, line_len: impl Fn(u32) -> u32) -> Vec<Range> {
	(first..=last).map(|line| Range::on_line(line, 0, line_len(line))).collect()
}
