//! Per-buffer session bookkeeping.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use tandem_primitives::selection::{block_ranges, char_range_at, line_ranges, split_range, word_range_at};
use tandem_primitives::{Position, Range};

use crate::config::CursorsConfig;
use crate::error::CursorsError;
use crate::host::{BufferId, DocumentChange, Host, KeyAction};
use crate::session::{LinkedRanges, Session, span_text};


/// What a selection command picks up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Select {
	/// The character under the cursor, or the last one at end of line.
	Position(Position),
	/// The word under the cursor, or the character when there is none.
	Word(Position),
	/// A visual selection, characterwise or blockwise.
	Visual {
		/// Selection corners.
		range: Range,
		/// Blockwise selection.
		block: bool,
	},
	/// The text covered by an operator motion.
	Operator {
		/// Motion start and end.
		range: Range,
		/// Linewise motion.
		linewise: bool,
	},
}

/// Cursor sessions of every buffer.
///
/// Sessions that end up deactivated are disposed and forgotten before any
/// method returns.
#[derive(Default)]
pub struct Cursors {
	config: CursorsConfig,
	sessions: FxHashMap<BufferId, Session>,
}

impl Cursors {
	/// Creates a manager with no sessions.
	pub fn new(config: CursorsConfig) -> Self {
		Self {
			config,
			sessions: FxHashMap::default(),
		}
	}

	/// Configuration used for new sessions.
	pub fn config(&self) -> &CursorsConfig {
		&self.config
	}

	/// Replaces the configuration. Running sessions keep theirs.
	pub fn set_config(&mut self, config: CursorsConfig) {
		self.config = config;
	}

	/// Session of `buffer`, if any.
	pub fn session(&self, buffer: BufferId) -> Option<&Session> {
		self.sessions.get(&buffer)
	}

	/// Returns true if `buffer` has a session.
	pub fn is_activated(&self, buffer: BufferId) -> bool {
		self.sessions.contains_key(&buffer)
	}

	/// Returns the session of `buffer`, starting one if needed.
	pub fn create_session(&mut self, host: &mut dyn Host, buffer: BufferId) -> Result<&mut Session, CursorsError> {
		match self.sessions.entry(buffer) {
			Entry::Occupied(entry) => Ok(entry.into_mut()),
			Entry::Vacant(entry) => {
				let session = Session::new(host, buffer, self.config.clone())?;
				Ok(entry.insert(session))
			}
		}
	}

	/// Adds ranges to the session of `buffer`, starting one if needed.
	pub fn add_ranges(&mut self, host: &mut dyn Host, buffer: BufferId, ranges: &[Range]) -> Result<bool, CursorsError> {
		let added = self.create_session(host, buffer)?.add_ranges(host, ranges);
		self.reap(host);
		Ok(added)
	}

	/// Adds linked occurrences to the session of `buffer`, starting one if needed.
	pub fn add_linked(
		&mut self,
		host: &mut dyn Host,
		buffer: BufferId,
		linked: &LinkedRanges,
	) -> Result<bool, CursorsError> {
		let added = self.create_session(host, buffer)?.add_linked(host, linked);
		self.reap(host);
		added
	}

	/// Toggles or adds replicas picked by a selection command.
	pub fn select(&mut self, host: &mut dyn Host, buffer: BufferId, select: Select) -> Result<(), CursorsError> {
		let line_len = |line: u32| host.line(buffer, line).map_or(0, |text| text.chars().count() as u32);
		let (ranges, toggle) = match select {
			Select::Position(pos) => (vec![char_range_at(line_len(pos.line), pos)], true),
			Select::Word(pos) => {
				let word = host
					.line(buffer, pos.line)
					.and_then(|text| word_range_at(&text, pos));
				(vec![word.unwrap_or_else(|| char_range_at(line_len(pos.line), pos))], true)
			}
			Select::Visual { range, block: true } => (block_ranges(range, line_len), true),
			Select::Visual { range, block: false } => (split_range(range, line_len), true),
			Select::Operator { range, linewise: true } => (line_ranges(range.start.line, range.end.line, line_len), false),
			Select::Operator { range, linewise: false } => (split_range(range, line_len), false),
		};
		tracing::trace!(?buffer, ?select, ranges = ranges.len(), "selection resolved");

		let session = self.create_session(host, buffer)?;
		if toggle {
			for range in ranges.into_iter().filter(|range| !range.is_empty()) {
				let Some(text) = span_text(host, buffer, range) else {
					continue;
				};
				session.add_range(host, range, text);
			}
		} else {
			session.add_ranges(host, &ranges);
		}
		self.reap(host);
		Ok(())
	}

	/// Runs a bound key action on the session of `buffer`.
	pub fn handle_key(&mut self, host: &mut dyn Host, buffer: BufferId, action: KeyAction) {
		if let Some(session) = self.sessions.get_mut(&buffer) {
			session.handle_key(host, action);
		}
		self.reap(host);
	}

	/// Forwards a document change to the session of its buffer.
	pub fn on_document_change(&mut self, host: &mut dyn Host, change: &DocumentChange) {
		if let Some(session) = self.sessions.get_mut(&change.buffer) {
			session.on_change(host, change);
		}
		self.reap(host);
	}

	/// Cancels the session of `buffer`.
	pub fn cancel(&mut self, host: &mut dyn Host, buffer: BufferId) {
		if let Some(session) = self.sessions.get_mut(&buffer) {
			session.cancel(host);
		}
		self.reap(host);
	}

	/// Disposes the session of a closed buffer.
	pub fn on_document_close(&mut self, host: &mut dyn Host, buffer: BufferId) {
		if let Some(mut session) = self.sessions.remove(&buffer) {
			session.dispose(host);
		}
	}

	/// Disposes every session.
	pub fn reset(&mut self, host: &mut dyn Host) {
		for (_, mut session) in self.sessions.drain() {
			session.dispose(host);
		}
	}

	fn reap(&mut self, host: &mut dyn Host) {
		let done: Vec<BufferId> = self
			.sessions
			.iter()
			.filter(|(_, session)| !session.is_active())
			.map(|(buffer, _)| *buffer)
			.collect();
		for buffer in done {
			if let Some(mut session) = self.sessions.remove(&buffer) {
				session.dispose(host);
				tracing::debug!(?buffer, "cursors session removed");
			}
		}
	}
}
