//! The host editor seam: document events in, batched editor calls out.

use tandem_primitives::{EditOrigin, Position, Range, TextEdit};
use thiserror::Error;

/// Origin tag carried by document changes caused by a session's own batches.
pub const EDIT_ORIGIN: EditOrigin = EditOrigin::Internal("cursors");

/// Identifier of a host buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

/// Keys a session binds while it is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
	/// End the session.
	Cancel,
	/// Jump to the next replica.
	Next,
	/// Jump to the previous replica.
	Previous,
}

/// One coalesced document change, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
	/// Changed buffer.
	pub buffer: BufferId,
	/// Replaced range, in pre-edit coordinates.
	pub range: Range,
	/// Inserted text.
	pub new_text: String,
	/// Whole document content before the change.
	pub original: String,
	/// Who made the change.
	///
	/// Hosts tag changes produced by applying a session [`Batch`] with
	/// [`EDIT_ORIGIN`].
	pub origin: EditOrigin,
}

impl DocumentChange {
	/// The change as a text edit.
	pub fn edit(&self) -> TextEdit {
		TextEdit::new(self.range, self.new_text.clone())
	}
}

/// A single call into the host editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
	/// Replace the content of a line, line break excluded.
	ReplaceLine {
		/// Zero-based line index.
		line: u32,
		/// New content.
		text: String,
	},
	/// Remove every highlight in a namespace.
	ClearHighlights {
		/// Highlight namespace.
		namespace: String,
	},
	/// Highlight ranges in a namespace.
	HighlightRanges {
		/// Highlight namespace.
		namespace: String,
		/// Highlight group.
		group: String,
		/// Ranges to draw.
		ranges: Vec<Range>,
	},
	/// Move the cursor.
	SetCursor(Position),
	/// Set the buffer-local flag telling key mappings a session is active.
	SetActivated(bool),
	/// Bind a buffer-local key to a session action.
	BindKey {
		/// Key notation, e.g. `<C-n>`.
		key: String,
		/// Action to trigger.
		action: KeyAction,
	},
	/// Remove a buffer-local binding.
	UnbindKey {
		/// Key notation.
		key: String,
	},
}

/// Host calls issued together for one incoming event.
///
/// A host must apply a batch as one transaction: nothing in between may be
/// observable, including display refreshes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
	calls: Vec<HostCall>,
}

impl Batch {
	/// Creates an empty batch.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a call.
	pub fn push(&mut self, call: HostCall) {
		self.calls.push(call);
	}

	/// Appends a line replacement.
	pub fn replace_line(&mut self, line: u32, text: impl Into<String>) {
		self.push(HostCall::ReplaceLine { line, text: text.into() });
	}

	/// The calls in issue order.
	pub fn calls(&self) -> &[HostCall] {
		&self.calls
	}
}

/// Failure reported by the host while applying a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
	/// The buffer is gone or no longer attached.
	#[error("buffer {0:?} is not attached")]
	Detached(BufferId),
	/// The host refused the batch.
	#[error("host rejected batch: {0}")]
	Rejected(String),
}

/// The host editor as seen by a session.
pub trait Host {
	/// Content of a line, line break excluded.
	fn line(&self, buffer: BufferId, line: u32) -> Option<String>;

	/// Cursor position if `buffer` is the current buffer.
	fn cursor(&self, buffer: BufferId) -> Option<Position>;

	/// Applies a batch of calls as one transaction.
	fn apply(&mut self, buffer: BufferId, batch: Batch) -> Result<(), HostError>;

	/// Shows a message to the user.
	fn show_message(&mut self, message: &str);
}
