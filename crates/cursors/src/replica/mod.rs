//! Tracked spans and the arena that keeps them ordered.

use slab::Slab;
use tandem_primitives::{Position, Range, TextEdit};

#[cfg(test)]
mod tests;

/// Stable identifier of a replica within its [`ReplicaSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplicaId(usize);

/// One tracked single-line span.
///
/// A replica remembers two spans: the synced span, which is where its text
/// sits in the document as of the last completed change, and the live span
/// (`curr_*`), which follows every edit applied since then.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replica {
	line: u32,
	start: u32,
	end: u32,
	curr_start: u32,
	curr_end: u32,
	text: String,
	pre_count: u32,
}

impl Replica {
	/// Creates a replica covering `start..end` on `line` with the given content.
	pub fn new(line: u32, start: u32, end: u32, text: impl Into<String>) -> Self {
		Self {
			line,
			start,
			end,
			curr_start: start,
			curr_end: end,
			text: text.into(),
			pre_count: 0,
		}
	}

	/// Line the replica lives on.
	pub fn line(&self) -> u32 {
		self.line
	}

	/// Current literal content.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Number of replicas on the same line that start before this one.
	pub fn pre_count(&self) -> u32 {
		self.pre_count
	}

	/// Span as of the last completed change.
	pub fn range(&self) -> Range {
		Range::on_line(self.line, self.start, self.end)
	}

	/// Live span, reflecting every edit applied so far.
	pub fn curr_range(&self) -> Range {
		Range::on_line(self.line, self.curr_start, self.curr_end)
	}

	/// Length of the current text in characters.
	pub fn text_len(&self) -> usize {
		self.text.chars().count()
	}

	/// Replacement of the synced span with the current text.
	pub fn text_edit(&self) -> TextEdit {
		TextEdit::new(self.range(), self.text.clone())
	}

	/// Replaces characters `begin..end` of the text with `insert`.
	///
	/// Both bounds are clamped to the text length. Positions are not
	/// touched; [`ReplicaSet::reflow`] recomputes them.
	pub(crate) fn splice(&mut self, begin: usize, end: usize, insert: &str) {
		let len = self.text_len();
		let begin = begin.min(len);
		let end = end.clamp(begin, len);
		let from = char_to_byte(&self.text, begin);
		let to = char_to_byte(&self.text, end);
		self.text.replace_range(from..to, insert);
	}

	/// Inserts `insert` at character `offset`, clamped to the text length.
	pub(crate) fn insert(&mut self, offset: usize, insert: &str) {
		self.splice(offset, offset, insert);
	}

	/// Appends `insert` to the text.
	pub(crate) fn append(&mut self, insert: &str) {
		let len = self.text_len();
		self.splice(len, len, insert);
	}

	/// Moves the replica to account for an edit that lies outside of it.
	///
	/// Edits that start after the replica leave it alone. Edits ending on the
	/// replica's line move it by the edit's character delta; all edits move it
	/// by their line delta.
	pub(crate) fn shift_for(&mut self, edit: &TextEdit) {
		if edit.range.start > Position::new(self.line, self.end) {
			return;
		}
		let after = edit.end_after();
		if edit.range.end.line == self.line {
			let start = after.character + self.start.saturating_sub(edit.range.end.character);
			let end = after.character + self.end.saturating_sub(edit.range.end.character);
			self.start = start;
			self.end = end;
		}
		self.line = after.line + self.line.saturating_sub(edit.range.end.line);
		self.curr_start = self.start;
		self.curr_end = self.end;
	}

	/// Commits the live span as the synced span.
	pub(crate) fn sync(&mut self) {
		self.start = self.curr_start;
		self.end = self.curr_end;
	}
}

/// Byte index of character `idx` in `s`, or `s.len()` past the end.
pub(crate) fn char_to_byte(s: &str, idx: usize) -> usize {
	s.char_indices().nth(idx).map_or(s.len(), |(byte, _)| byte)
}

/// Replicas of one session, ordered by line then start.
///
/// Replicas live in a slab so their identifiers stay valid across inserts
/// and removals; `order` holds the sorted view.
#[derive(Debug, Clone, Default)]
pub struct ReplicaSet {
	slab: Slab<Replica>,
	order: Vec<usize>,
}

impl ReplicaSet {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of replicas.
	pub fn len(&self) -> usize {
		self.order.len()
	}

	/// Returns true if there are no replicas.
	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Looks up a replica.
	pub fn get(&self, id: ReplicaId) -> Option<&Replica> {
		self.slab.get(id.0)
	}

	/// Replicas in order.
	pub fn iter(&self) -> impl DoubleEndedIterator<Item = (ReplicaId, &Replica)> + '_ {
		self.order.iter().map(|&key| (ReplicaId(key), &self.slab[key]))
	}

	/// First replica in order.
	pub fn first(&self) -> Option<&Replica> {
		self.order.first().map(|&key| &self.slab[key])
	}

	/// Live spans in order.
	pub fn curr_ranges(&self) -> Vec<Range> {
		self.iter().map(|(_, r)| r.curr_range()).collect()
	}

	/// Adds a replica and restores ordering.
	pub fn insert(&mut self, replica: Replica) -> ReplicaId {
		let key = self.slab.insert(replica);
		self.order.push(key);
		self.rank();
		ReplicaId(key)
	}

	/// Removes a replica and restores ordering.
	pub fn remove(&mut self, id: ReplicaId) -> Option<Replica> {
		let replica = self.slab.try_remove(id.0)?;
		self.order.retain(|&key| key != id.0);
		self.rank();
		Some(replica)
	}

	/// Keeps only the replicas matching `keep`.
	pub fn retain(&mut self, mut keep: impl FnMut(&Replica) -> bool) {
		self.slab.retain(|_, replica| keep(replica));
		let slab = &self.slab;
		self.order.retain(|&key| slab.contains(key));
		self.rank();
	}

	/// Applies `f` to every replica in order.
	pub(crate) fn for_each_mut(&mut self, mut f: impl FnMut(&mut Replica)) {
		for &key in &self.order {
			f(&mut self.slab[key]);
		}
	}

	/// Sorts by line then start and recomputes every `pre_count`.
	fn rank(&mut self) {
		let slab = &self.slab;
		self.order.sort_by_key(|&key| (slab[key].line, slab[key].curr_start, slab[key].curr_end));
		let mut line = None;
		let mut count = 0;
		for &key in &self.order {
			let replica = &mut self.slab[key];
			if line != Some(replica.line) {
				line = Some(replica.line);
				count = 0;
			}
			replica.pre_count = count;
			count += 1;
		}
	}

	/// Recomputes live spans after text edits.
	///
	/// Each replica starts where it was synced, pushed right by how much the
	/// replicas before it on the same line grew or shrank.
	pub(crate) fn reflow(&mut self) {
		let mut line = None;
		let mut shift: i64 = 0;
		for &key in &self.order {
			let replica = &mut self.slab[key];
			if line != Some(replica.line) {
				line = Some(replica.line);
				shift = 0;
			}
			let len = replica.text_len() as i64;
			let start = (i64::from(replica.start) + shift).max(0);
			replica.curr_start = start as u32;
			replica.curr_end = (start + len) as u32;
			shift += len - i64::from(replica.end - replica.start);
		}
	}

	/// Moves every replica to account for an edit outside all of them.
	///
	/// Joined or split lines can bring replicas onto a shared line, so the
	/// ranking is redone afterwards.
	pub(crate) fn shift_for(&mut self, edit: &TextEdit) {
		self.for_each_mut(|replica| replica.shift_for(edit));
		self.rank();
	}

	/// Commits every live span.
	pub(crate) fn sync(&mut self) {
		self.for_each_mut(Replica::sync);
	}
}
