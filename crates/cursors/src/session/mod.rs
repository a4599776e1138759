//! One multi-range editing session over a single buffer.
//!
//! A session owns its replicas and turns every document change it hears
//! about into one batch of host calls: either the replicas shift out of the
//! way, or the change is replayed onto every replica, or the session
//! refuses and deactivates.

use regex::Regex;
use ropey::Rope;
use tandem_primitives::rope::{apply_edits, line_text};
use tandem_primitives::{Position, Range, TextEdit};

use crate::classify::{Classification, classify};
use crate::compose::{reconstruct_edits, resolve};
use crate::config::CursorsConfig;
use crate::diff::{CharDiffer, Differ};
use crate::error::{CursorsError, Refusal};
use crate::host::{Batch, BufferId, DocumentChange, EDIT_ORIGIN, Host, HostCall, KeyAction};
use crate::replica::{Replica, ReplicaId, ReplicaSet};
use crate::replicate::replicate;


/// Whether replicas may still be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// No change has touched the replicas yet; ranges can be added or toggled.
	Configuring,
	/// A change touched the replicas; the set is frozen.
	Live,
}

enum State {
	Active { replicas: ReplicaSet, phase: Phase },
	Deactivated,
}

/// Result of linked-range discovery, consumed by [`Session::add_linked`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedRanges {
	/// Occurrences to keep in sync.
	pub ranges: Vec<Range>,
	/// Pattern every occurrence must keep matching as a whole.
	pub word_pattern: Option<String>,
}

/// A multi-range editing session bound to one buffer.
pub struct Session {
	buffer: BufferId,
	config: CursorsConfig,
	state: State,
	differ: Box<dyn Differ>,
	word_pattern: Option<Regex>,
	keys_bound: bool,
}

impl Session {
	/// Starts a session on `buffer`, binding the configured keys.
	pub fn new(host: &mut dyn Host, buffer: BufferId, config: CursorsConfig) -> Result<Self, CursorsError> {
		let mut batch = Batch::new();
		for (key, action) in bindings(&config) {
			batch.push(HostCall::BindKey {
				key: key.to_string(),
				action,
			});
		}
		batch.push(HostCall::SetActivated(true));
		host.apply(buffer, batch)?;
		tracing::debug!(?buffer, "cursors session started");
		Ok(Self {
			buffer,
			config,
			state: State::Active {
				replicas: ReplicaSet::new(),
				phase: Phase::Configuring,
			},
			differ: Box::new(CharDiffer),
			word_pattern: None,
			keys_bound: true,
		})
	}

	/// Replaces the differ used to split composed changes.
	pub fn with_differ(mut self, differ: impl Differ + 'static) -> Self {
		self.differ = Box::new(differ);
		self
	}

	/// Buffer the session edits.
	pub fn buffer(&self) -> BufferId {
		self.buffer
	}

	/// Returns true until the session is cancelled.
	pub fn is_active(&self) -> bool {
		matches!(self.state, State::Active { .. })
	}

	/// Current phase, or `None` once deactivated.
	pub fn phase(&self) -> Option<Phase> {
		match &self.state {
			State::Active { phase, .. } => Some(*phase),
			State::Deactivated => None,
		}
	}

	/// Replicas of an active session.
	pub fn replicas(&self) -> Option<&ReplicaSet> {
		match &self.state {
			State::Active { replicas, .. } => Some(replicas),
			State::Deactivated => None,
		}
	}

	/// Live spans of all replicas, in order. Empty once deactivated.
	pub fn ranges(&self) -> Vec<Range> {
		self.replicas().map(ReplicaSet::curr_ranges).unwrap_or_default()
	}

	/// Adds replicas for `ranges`, replacing existing replicas they overlap.
	///
	/// Ranges spanning several lines or overlapping an earlier range of the
	/// same call are skipped. Returns false if the session is not configuring
	/// or ends up with no replicas, in which case it is cancelled.
	pub fn add_ranges(&mut self, host: &mut dyn Host, ranges: &[Range]) -> bool {
		let buffer = self.buffer;
		let State::Active { replicas, phase } = &mut self.state else {
			return false;
		};
		if *phase == Phase::Live {
			host.show_message("Can't add ranges after range change.");
			return false;
		}

		let mut accepted: Vec<Range> = Vec::with_capacity(ranges.len());
		for range in ranges {
			if range.start > range.end {
				tracing::debug!(?buffer, ?range, "skipping reversed range");
				continue;
			}
			if !range.is_single_line() {
				tracing::debug!(?buffer, ?range, "skipping multi-line range");
				continue;
			}
			if accepted.iter().any(|other| other.overlaps(range)) {
				tracing::debug!(?buffer, ?range, "skipping overlapping range");
				continue;
			}
			accepted.push(*range);
		}
		replicas.retain(|replica| !accepted.iter().any(|range| range.overlaps(&replica.curr_range())));
		for range in accepted {
			match span_text(host, buffer, range) {
				Some(text) => {
					replicas.insert(Replica::new(range.start.line, range.start.character, range.end.character, text));
				}
				None => tracing::debug!(?buffer, ?range, "skipping range outside document"),
			}
		}
		tracing::debug!(?buffer, replicas = replicas.len(), "ranges added");

		if replicas.is_empty() {
			self.cancel(host);
			return false;
		}
		self.redraw(host);
		true
	}

	/// Adds linked occurrences, optionally guarded by a word pattern.
	///
	/// The pattern is anchored at both ends. While it is set, any replicated
	/// change that leaves a replica not matching it as a whole cancels the
	/// session.
	pub fn add_linked(&mut self, host: &mut dyn Host, linked: &LinkedRanges) -> Result<bool, CursorsError> {
		if let Some(pattern) = &linked.word_pattern {
			self.word_pattern = Some(Regex::new(&format!("^(?:{pattern})$"))?);
		}
		Ok(self.add_ranges(host, &linked.ranges))
	}

	/// Toggles a single replica: removes the first one intersecting `range`,
	/// or adds a new one covering `range` with `text`.
	///
	/// Removing the last replica cancels the session.
	pub fn add_range(&mut self, host: &mut dyn Host, range: Range, text: impl Into<String>) {
		let buffer = self.buffer;
		let State::Active { replicas, phase } = &mut self.state else {
			return;
		};
		if *phase == Phase::Live {
			host.show_message("Can't add range after range change.");
			return;
		}
		if range.start > range.end || !range.is_single_line() {
			tracing::debug!(?buffer, ?range, "skipping unusable range");
			return;
		}
		let hit = replicas
			.iter()
			.find(|(_, replica)| replica.range().intersects(&range))
			.map(|(id, _)| id);
		match hit {
			Some(id) => {
				replicas.remove(id);
				tracing::debug!(?buffer, ?range, "replica removed");
			}
			None => {
				replicas.insert(Replica::new(range.start.line, range.start.character, range.end.character, text));
				tracing::debug!(?buffer, ?range, "replica added");
			}
		}
		if replicas.is_empty() {
			self.cancel(host);
		} else {
			self.redraw(host);
		}
	}

	/// Handles one document change reported by the host.
	pub fn on_change(&mut self, host: &mut dyn Host, change: &DocumentChange) {
		let buffer = self.buffer;
		if change.buffer != buffer {
			return;
		}
		if change.origin == EDIT_ORIGIN {
			tracing::debug!(?buffer, "ignoring echo of own edit");
			return;
		}
		let State::Active { replicas, phase } = &mut self.state else {
			return;
		};
		if replicas.is_empty() {
			return;
		}

		let edit = change.edit();
		let classification = classify(replicas, &edit);
		tracing::trace!(?buffer, ?classification, range = ?edit.range, "classified change");
		let outcome = match classification {
			Classification::Outside => {
				replicas.shift_for(&edit);
				let mut batch = Batch::new();
				push_highlights(&mut batch, &self.config, replicas);
				Ok(batch)
			}
			Classification::Inside(owner) => {
				*phase = Phase::Live;
				replicate_inside(replicas, host, buffer, change, owner, &self.config, self.word_pattern.as_ref())
			}
			Classification::Composed => {
				*phase = Phase::Live;
				resolve_composed(replicas, self.differ.as_ref(), change, &self.config, self.word_pattern.as_ref())
			}
		};

		match outcome {
			Ok(batch) => self.commit(host, batch),
			Err(refusal) => {
				tracing::debug!(?buffer, reason = %refusal, "refusing change");
				self.cancel(host);
			}
		}
	}

	/// Moves the cursor to the first replica starting after it, wrapping to the first.
	pub fn navigate_next(&mut self, host: &mut dyn Host) -> Option<Position> {
		let ranges = self.ranges();
		let cursor = host.cursor(self.buffer)?;
		let target = ranges
			.iter()
			.find(|range| range.start > cursor)
			.or_else(|| ranges.first())?
			.start;
		self.move_cursor(host, target);
		Some(target)
	}

	/// Moves the cursor to the last replica ending before it, wrapping to the last.
	pub fn navigate_previous(&mut self, host: &mut dyn Host) -> Option<Position> {
		let ranges = self.ranges();
		let cursor = host.cursor(self.buffer)?;
		let target = ranges
			.iter()
			.rev()
			.find(|range| range.end < cursor)
			.or_else(|| ranges.last())?
			.start;
		self.move_cursor(host, target);
		Some(target)
	}

	/// Runs the action bound to a session key.
	pub fn handle_key(&mut self, host: &mut dyn Host, action: KeyAction) {
		match action {
			KeyAction::Cancel => self.cancel(host),
			KeyAction::Next => {
				self.navigate_next(host);
			}
			KeyAction::Previous => {
				self.navigate_previous(host);
			}
		}
	}

	/// Clears highlights, drops the activated flag and releases all replicas.
	pub fn cancel(&mut self, host: &mut dyn Host) {
		if !self.is_active() {
			return;
		}
		self.state = State::Deactivated;
		let mut batch = Batch::new();
		batch.push(HostCall::ClearHighlights {
			namespace: self.config.namespace.clone(),
		});
		batch.push(HostCall::SetActivated(false));
		if let Err(error) = host.apply(self.buffer, batch) {
			tracing::warn!(buffer = ?self.buffer, error = %error, "failed to clear cursors highlights");
		}
		tracing::debug!(buffer = ?self.buffer, "cursors session cancelled");
	}

	/// Cancels the session and unbinds its keys. Safe to call repeatedly.
	pub fn dispose(&mut self, host: &mut dyn Host) {
		self.cancel(host);
		if !self.keys_bound {
			return;
		}
		self.keys_bound = false;
		let mut batch = Batch::new();
		for (key, _) in bindings(&self.config) {
			batch.push(HostCall::UnbindKey { key: key.to_string() });
		}
		if let Err(error) = host.apply(self.buffer, batch) {
			tracing::warn!(buffer = ?self.buffer, error = %error, "failed to unbind cursors keys");
		}
	}

	fn redraw(&mut self, host: &mut dyn Host) {
		let State::Active { replicas, .. } = &self.state else {
			return;
		};
		let mut batch = Batch::new();
		push_highlights(&mut batch, &self.config, replicas);
		self.commit(host, batch);
	}

	fn move_cursor(&mut self, host: &mut dyn Host, target: Position) {
		let mut batch = Batch::new();
		batch.push(HostCall::SetCursor(target));
		self.commit(host, batch);
	}

	/// Applies `batch`, committing live spans on success and cancelling on failure.
	fn commit(&mut self, host: &mut dyn Host, batch: Batch) {
		match host.apply(self.buffer, batch) {
			Ok(()) => {
				if let State::Active { replicas, .. } = &mut self.state {
					replicas.sync();
				}
			}
			Err(error) => {
				tracing::warn!(buffer = ?self.buffer, error = %error, "host rejected cursors batch");
				self.cancel(host);
			}
		}
	}
}

fn bindings(config: &CursorsConfig) -> [(&str, KeyAction); 3] {
	[
		(config.cancel_key.as_str(), KeyAction::Cancel),
		(config.next_key.as_str(), KeyAction::Next),
		(config.previous_key.as_str(), KeyAction::Previous),
	]
}

pub(crate) fn span_text(host: &dyn Host, buffer: BufferId, range: Range) -> Option<String> {
	let line = host.line(buffer, range.start.line)?;
	let (start, end) = (range.start.character as usize, range.end.character as usize);
	if end > line.chars().count() {
		return None;
	}
	let len = end.checked_sub(start)?;
	Some(line.chars().skip(start).take(len).collect())
}

fn push_highlights(batch: &mut Batch, config: &CursorsConfig, replicas: &ReplicaSet) {
	batch.push(HostCall::ClearHighlights {
		namespace: config.namespace.clone(),
	});
	batch.push(HostCall::HighlightRanges {
		namespace: config.namespace.clone(),
		group: config.highlight_group.clone(),
		ranges: replicas.curr_ranges(),
	});
}

fn check_pattern(replicas: &ReplicaSet, pattern: Option<&Regex>) -> Result<(), Refusal> {
	let Some(pattern) = pattern else {
		return Ok(());
	};
	for (_, replica) in replicas.iter() {
		if !pattern.is_match(replica.text()) {
			return Err(Refusal::PatternMismatch {
				text: replica.text().to_string(),
			});
		}
	}
	Ok(())
}

/// Replays a change owned by one replica and builds the host batch for it.
///
/// Lines are rebuilt from the pre-edit document with every replica's new
/// text in place. Lines the host already shows correctly are left alone.
fn replicate_inside(
	replicas: &mut ReplicaSet,
	host: &dyn Host,
	buffer: BufferId,
	change: &DocumentChange,
	owner: ReplicaId,
	config: &CursorsConfig,
	pattern: Option<&Regex>,
) -> Result<Batch, Refusal> {
	let edit = change.edit();
	replicate(replicas, owner, &edit)?;
	check_pattern(replicas, pattern)?;

	let mut batch = Batch::new();
	if replicas.len() > 1 {
		let edits: Vec<TextEdit> = replicas.iter().map(|(_, r)| r.text_edit()).collect();
		let doc = apply_edits(&Rope::from(change.original.as_str()), &edits)?;
		let mut lines: Vec<u32> = replicas.iter().map(|(_, r)| r.line()).collect();
		lines.dedup();
		for line in lines {
			let text = line_text(doc.slice(..), line as usize).unwrap_or_default();
			if host.line(buffer, line).as_deref() != Some(text.as_str()) {
				batch.replace_line(line, text);
			}
		}
		if let Some(cursor) = corrected_cursor(replicas, host, buffer, owner, &edit) {
			batch.push(HostCall::SetCursor(cursor));
		}
	}
	push_highlights(&mut batch, config, replicas);
	Ok(batch)
}

/// Splits a change spanning several replicas and applies it to each of them.
///
/// The document already holds the change, so only highlights are redrawn.
fn resolve_composed(
	replicas: &mut ReplicaSet,
	differ: &dyn Differ,
	change: &DocumentChange,
	config: &CursorsConfig,
	pattern: Option<&Regex>,
) -> Result<Batch, Refusal> {
	let edits = reconstruct_edits(differ, &change.original, &change.edit())?;
	resolve(replicas, &edits)?;
	check_pattern(replicas, pattern)?;
	let mut batch = Batch::new();
	push_highlights(&mut batch, config, replicas);
	Ok(batch)
}

/// Where the cursor belongs once same-line replicas before the owner grew.
fn corrected_cursor(
	replicas: &ReplicaSet,
	host: &dyn Host,
	buffer: BufferId,
	owner: ReplicaId,
	edit: &TextEdit,
) -> Option<Position> {
	let owner = replicas.get(owner)?;
	let cursor = host.cursor(buffer)?;
	if owner.pre_count() == 0 || cursor.line != owner.line() {
		return None;
	}
	let shift = owner.pre_count() as isize * edit.len_delta();
	let character = (cursor.character as isize + shift).max(0) as u32;
	Some(Position::new(cursor.line, character))
}
