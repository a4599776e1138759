//! Deciding which replica, if any, an incoming change belongs to.

use tandem_primitives::TextEdit;

use crate::replica::{ReplicaId, ReplicaSet};

/// Where a change landed relative to the replicas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
	/// The change touches no replica.
	Outside,
	/// The change is confined to exactly one replica.
	Inside(ReplicaId),
	/// The change touches replicas but cannot be pinned to one.
	Composed,
}

/// Classifies `edit` against the live spans of `replicas`.
///
/// An edit that inserts whole lines right before the first replica counts
/// as outside even though it touches the replica's start.
pub fn classify(replicas: &ReplicaSet, edit: &TextEdit) -> Classification {
	let touches = replicas.iter().any(|(_, r)| edit.range.intersects(&r.curr_range()));
	let prepends_lines = edit.new_text.ends_with('\n')
		&& replicas.first().is_some_and(|first| first.curr_range().start == edit.range.end);
	if !touches || prepends_lines {
		return Classification::Outside;
	}
	match owner(replicas, edit) {
		Some(id) => Classification::Inside(id),
		None => Classification::Composed,
	}
}

/// The single replica owning `edit`, if there is one.
///
/// Only single-line edits without line breaks can be owned. Containment is
/// inclusive, so a pure insertion at a replica's end belongs to it; where two
/// replicas touch, the earlier one wins.
pub fn owner(replicas: &ReplicaSet, edit: &TextEdit) -> Option<ReplicaId> {
	if !edit.is_single_line() {
		return None;
	}
	replicas
		.iter()
		.find(|(_, replica)| replica.curr_range().contains_range(&edit.range))
		.map(|(id, _)| id)
}
