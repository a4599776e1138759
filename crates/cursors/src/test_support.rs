//! In-memory host used by the session and manager tests.

use ropey::Rope;
use tandem_primitives::rope::apply_edits;
use tandem_primitives::{EditOrigin, Position, Range, TextEdit};

use crate::host::{Batch, BufferId, DocumentChange, Host, HostCall, HostError};

pub(crate) const BUFFER: BufferId = BufferId(1);

/// Installs a test-writer subscriber once per test binary.
pub(crate) fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_max_level(tracing::Level::TRACE)
		.with_test_writer()
		.try_init();
}

/// A single-buffer host that applies line replacements to its own lines and
/// records every batch it receives.
#[derive(Debug, Default)]
pub(crate) struct MockHost {
	pub lines: Vec<String>,
	pub cursor: Option<Position>,
	pub batches: Vec<Batch>,
	pub messages: Vec<String>,
	pub fail_apply: bool,
}

impl MockHost {
	pub fn new(text: &str) -> Self {
		Self {
			lines: text.split('\n').map(str::to_string).collect(),
			..Self::default()
		}
	}

	pub fn text(&self) -> String {
		self.lines.join("\n")
	}

	/// Performs a user edit and returns the change the host would report.
	///
	/// The cursor ends up right after the inserted text, as after typing.
	pub fn edit(&mut self, range: Range, new_text: &str) -> DocumentChange {
		let original = self.text();
		let edit = TextEdit::new(range, new_text);
		let updated = apply_edits(&Rope::from(original.as_str()), std::slice::from_ref(&edit)).unwrap();
		self.lines = updated.to_string().split('\n').map(str::to_string).collect();
		self.cursor = Some(edit.end_after());
		DocumentChange {
			buffer: BUFFER,
			range,
			new_text: new_text.to_string(),
			original,
			origin: EditOrigin::User,
		}
	}

	/// Every call of every batch, in order.
	pub fn calls(&self) -> Vec<&HostCall> {
		self.batches.iter().flat_map(Batch::calls).collect()
	}

	/// Calls of the most recent batch.
	pub fn last_calls(&self) -> &[HostCall] {
		self.batches.last().map(Batch::calls).unwrap_or_default()
	}

	/// Line replacements issued so far.
	pub fn replaced_lines(&self) -> Vec<(u32, String)> {
		self.calls()
			.into_iter()
			.filter_map(|call| match call {
				HostCall::ReplaceLine { line, text } => Some((*line, text.clone())),
				_ => None,
			})
			.collect()
	}

	/// Ranges of the most recent highlight call.
	pub fn highlighted(&self) -> Option<Vec<Range>> {
		self.calls().into_iter().rev().find_map(|call| match call {
			HostCall::HighlightRanges { ranges, .. } => Some(ranges.clone()),
			_ => None,
		})
	}

	pub fn clear_batches(&mut self) {
		self.batches.clear();
	}
}

impl Host for MockHost {
	fn line(&self, buffer: BufferId, line: u32) -> Option<String> {
		if buffer != BUFFER {
			return None;
		}
		self.lines.get(line as usize).cloned()
	}

	fn cursor(&self, buffer: BufferId) -> Option<Position> {
		if buffer != BUFFER {
			return None;
		}
		self.cursor
	}

	fn apply(&mut self, buffer: BufferId, batch: Batch) -> Result<(), HostError> {
		if buffer != BUFFER {
			return Err(HostError::Detached(buffer));
		}
		if self.fail_apply {
			return Err(HostError::Rejected("read-only buffer".to_string()));
		}
		for call in batch.calls() {
			match call {
				HostCall::ReplaceLine { line, text } => {
					if let Some(slot) = self.lines.get_mut(*line as usize) {
						*slot = text.clone();
					}
				}
				HostCall::SetCursor(pos) => self.cursor = Some(*pos),
				_ => {}
			}
		}
		self.batches.push(batch);
		Ok(())
	}

	fn show_message(&mut self, message: &str) {
		self.messages.push(message.to_string());
	}
}
