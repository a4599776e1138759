//! Replaying an edit made inside one replica onto all of them.

use tandem_primitives::TextEdit;

use crate::error::Refusal;
use crate::replica::{ReplicaId, ReplicaSet};

/// Applies to every replica the transform `edit` performed on `owner`.
///
/// The transform is expressed relative to the owner's live span: edits at
/// the end stay at the end, edits at an offset stay at that offset (clamped
/// for shorter replicas). Nothing is mutated when the transform is refused.
pub(crate) fn replicate(replicas: &mut ReplicaSet, owner: ReplicaId, edit: &TextEdit) -> Result<(), Refusal> {
	let Some(owner_replica) = replicas.get(owner) else {
		return Ok(());
	};
	let curr = owner_replica.curr_range();
	let start = edit.range.start.character;
	let end = edit.range.end.character;
	let text = edit.new_text.as_str();

	if edit.is_insert() {
		if end == curr.end.character {
			replicas.for_each_mut(|r| r.append(text));
		} else {
			let offset = start.saturating_sub(curr.start.character) as usize;
			replicas.for_each_mut(|r| r.insert(offset, text));
		}
	} else {
		let removed = edit.removed_len();
		if end == curr.end.character {
			if start == curr.start.character {
				let old = owner_replica.text().to_string();
				replace_whole(replicas, &old, text)?;
			} else {
				replicas.for_each_mut(|r| {
					let len = r.text_len();
					r.splice(len.saturating_sub(removed), len, text);
				});
			}
		} else {
			let offset = start.saturating_sub(curr.start.character) as usize;
			replicas.for_each_mut(|r| {
				let len = r.text_len();
				r.splice(offset.min(len), (offset + removed).min(len), text);
			});
		}
	}
	replicas.reflow();
	Ok(())
}

/// Replacement of a whole replica, replayed as a wrap or a trim.
///
/// If the new text contains the old one, whatever surrounds it is added
/// around every replica. If the old text contains the new one, the same
/// number of characters is trimmed from each side of every replica. The
/// first occurrence wins, so coincidental repeats are read as wraps or
/// trims: replacing `ab` with `aab` prepends `a`.
fn replace_whole(replicas: &mut ReplicaSet, old: &str, new: &str) -> Result<(), Refusal> {
	if let Some(idx) = new.find(old) {
		let prefix = &new[..idx];
		let suffix = &new[idx + old.len()..];
		replicas.for_each_mut(|r| {
			if !prefix.is_empty() {
				r.insert(0, prefix);
			}
			if !suffix.is_empty() {
				r.append(suffix);
			}
		});
		return Ok(());
	}
	if let Some(idx) = old.find(new) {
		let head = old[..idx].chars().count();
		let tail = old[idx + new.len()..].chars().count();
		replicas.for_each_mut(|r| {
			if head > 0 {
				r.splice(0, head, "");
			}
			if tail > 0 {
				let len = r.text_len();
				r.splice(len.saturating_sub(tail), len, "");
			}
		});
		return Ok(());
	}
	Err(Refusal::IrreconcilableReplacement {
		old: old.to_string(),
		new: new.to_string(),
	})
}
