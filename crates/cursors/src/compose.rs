//! Resolving a change that spans several replicas at once.
//!
//! Hosts coalesce simultaneous typing into one larger change. The change is
//! split back into elementary edits by diffing the replaced text against the
//! inserted text, and the edits are matched against the replicas: one edit
//! per replica, or one begin/end pair per replica.

use ropey::Rope;
use tandem_primitives::rope::{offset_at, position_at};
use tandem_primitives::{Range, TextEdit};

use crate::diff::{DiffOp, Differ};
use crate::error::Refusal;
use crate::replica::ReplicaSet;

/// Splits `edit` into elementary single-line edits.
///
/// `original` is the whole document before the change. Positions of the
/// returned edits are in pre-edit document coordinates. Any elementary edit
/// crossing or introducing a line break is refused.
pub(crate) fn reconstruct_edits(differ: &dyn Differ, original: &str, edit: &TextEdit) -> Result<Vec<TextEdit>, Refusal> {
	let doc = Rope::from(original);
	let from = offset_at(doc.slice(..), edit.range.start)?;
	let to = offset_at(doc.slice(..), edit.range.end)?.max(from);
	let old = doc.slice(from..to);
	let base = edit.range.start;
	let at = |offset: usize| position_at(old, offset).relative_to(base);

	let mut edits = Vec::new();
	let mut offset = 0;
	let mut ops = differ.diff(&old.to_string(), &edit.new_text).into_iter().peekable();
	while let Some(op) = ops.next() {
		match op {
			DiffOp::Equal(text) => offset += text.chars().count(),
			DiffOp::Delete(text) => {
				let end = offset + text.chars().count();
				let range = Range::new(at(offset), at(end));
				let inserted = match ops.next_if(|next| matches!(next, DiffOp::Insert(_))) {
					Some(DiffOp::Insert(inserted)) => inserted,
					_ => String::new(),
				};
				edits.push(TextEdit::new(range, inserted));
				offset = end;
			}
			DiffOp::Insert(text) => edits.push(TextEdit::insert(at(offset), text)),
		}
	}

	if edits.iter().any(|edit| !edit.is_single_line()) {
		return Err(Refusal::MultiLine);
	}
	Ok(edits)
}

/// How one replica changes under a composed edit, in characters of its text.
enum Step {
	Splice { begin: usize, end: usize, text: String },
	Trim { head: usize, tail: usize },
	Wrap { prefix: String, suffix: String },
}

/// Matches elementary `edits` against `replicas` and applies them.
///
/// Every edit is checked before any replica changes, so a refusal leaves
/// the set untouched.
pub(crate) fn resolve(replicas: &mut ReplicaSet, edits: &[TextEdit]) -> Result<(), Refusal> {
	let n = replicas.len();
	let steps = if edits.len() == n {
		one_per_replica(replicas, edits)?
	} else if edits.len() == 2 * n {
		pair_per_replica(replicas, edits)?
	} else {
		return Err(Refusal::CountMismatch {
			edits: edits.len(),
			replicas: n,
		});
	};

	let mut steps = steps.into_iter();
	replicas.for_each_mut(|replica| match steps.next() {
		Some(Step::Splice { begin, end, text }) => replica.splice(begin, end, &text),
		Some(Step::Trim { head, tail }) => {
			replica.splice(0, head, "");
			let len = replica.text_len();
			replica.splice(len.saturating_sub(tail), len, "");
		}
		Some(Step::Wrap { prefix, suffix }) => {
			replica.insert(0, &prefix);
			replica.append(&suffix);
		}
		None => {}
	});
	replicas.reflow();
	Ok(())
}

fn one_per_replica(replicas: &ReplicaSet, edits: &[TextEdit]) -> Result<Vec<Step>, Refusal> {
	let mut steps = Vec::with_capacity(edits.len());
	for (index, ((_, replica), edit)) in replicas.iter().zip(edits).enumerate() {
		let curr = replica.curr_range();
		if !curr.contains_range(&edit.range) {
			return Err(Refusal::OutsideReplica { index });
		}
		if index > 0 && !edit.same_shape(&edits[index - 1]) {
			return Err(Refusal::UnequalShape { index });
		}
		let begin = (edit.range.start.character - curr.start.character) as usize;
		steps.push(Step::Splice {
			begin,
			end: begin + edit.removed_len(),
			text: edit.new_text.clone(),
		});
	}
	Ok(steps)
}

fn pair_per_replica(replicas: &ReplicaSet, edits: &[TextEdit]) -> Result<Vec<Step>, Refusal> {
	let mut steps = Vec::with_capacity(replicas.len());
	for (index, ((_, replica), pair)) in replicas.iter().zip(edits.chunks_exact(2)).enumerate() {
		let curr = replica.curr_range();
		let (begin, end) = (&pair[0], &pair[1]);
		let step = if begin.is_delete() && end.is_delete() && !begin.is_insert() && !end.is_insert() {
			let unwraps = begin.range.start == curr.start && end.range.end == curr.end && begin.range.end <= end.range.start;
			unwraps.then(|| Step::Trim {
				head: begin.removed_len(),
				tail: end.removed_len(),
			})
		} else if begin.is_insert() && end.is_insert() {
			let wraps = begin.range.start == curr.start && end.range.start == curr.end;
			wraps.then(|| Step::Wrap {
				prefix: begin.new_text.clone(),
				suffix: end.new_text.clone(),
			})
		} else {
			None
		};
		steps.push(step.ok_or(Refusal::UnpairedBoundary { index })?);
	}
	Ok(steps)
}
