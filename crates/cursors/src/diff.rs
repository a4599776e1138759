//! Character diffs between pre- and post-edit text.

use similar::{Algorithm, DiffTag, TextDiff};

/// One run of a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOp {
	/// Text present on both sides.
	Equal(String),
	/// Text only in the new side.
	Insert(String),
	/// Text only in the old side.
	Delete(String),
}

/// Computes a diff between two texts.
///
/// Implementations must return ops whose equal and delete runs concatenate
/// to `old`, and whose equal and insert runs concatenate to `new`.
pub trait Differ {
	/// Diffs `old` against `new`.
	fn diff(&self, old: &str, new: &str) -> Vec<DiffOp>;
}

/// Myers diff over characters.
///
/// Changes between two equal runs are reported as at most one delete
/// followed by at most one insert.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharDiffer;

impl Differ for CharDiffer {
	fn diff(&self, old: &str, new: &str) -> Vec<DiffOp> {
		let diff = TextDiff::configure().algorithm(Algorithm::Myers).diff_chars(old, new);
		let old_slices = diff.old_slices();
		let new_slices = diff.new_slices();

		let mut out = Vec::new();
		let mut deleted = String::new();
		let mut inserted = String::new();
		for op in diff.ops() {
			let (tag, old_range, new_range) = op.as_tag_tuple();
			match tag {
				DiffTag::Equal => {
					flush(&mut out, &mut deleted, &mut inserted);
					out.push(DiffOp::Equal(old_slices[old_range].concat()));
				}
				DiffTag::Delete => deleted.push_str(&old_slices[old_range].concat()),
				DiffTag::Insert => inserted.push_str(&new_slices[new_range].concat()),
				DiffTag::Replace => {
					deleted.push_str(&old_slices[old_range].concat());
					inserted.push_str(&new_slices[new_range].concat());
				}
			}
		}
		flush(&mut out, &mut deleted, &mut inserted);
		merge_equal_runs(out)
	}
}

fn flush(out: &mut Vec<DiffOp>, deleted: &mut String, inserted: &mut String) {
	if !deleted.is_empty() {
		out.push(DiffOp::Delete(std::mem::take(deleted)));
	}
	if !inserted.is_empty() {
		out.push(DiffOp::Insert(std::mem::take(inserted)));
	}
}

fn merge_equal_runs(ops: Vec<DiffOp>) -> Vec<DiffOp> {
	let mut out: Vec<DiffOp> = Vec::with_capacity(ops.len());
	for op in ops {
		match (out.last_mut(), op) {
			(Some(DiffOp::Equal(prev)), DiffOp::Equal(next)) => prev.push_str(&next),
			(_, op) => out.push(op),
		}
	}
	out
}
