use proptest::prelude::*;
use tandem_primitives::{Position, Range, TextEdit};

use super::*;

fn set_of(spans: &[(u32, u32, u32, &str)]) -> ReplicaSet {
	let mut set = ReplicaSet::new();
	for &(line, start, end, text) in spans {
		set.insert(Replica::new(line, start, end, text));
	}
	set
}

fn assert_ranked(set: &ReplicaSet) {
	for (_, replica) in set.iter() {
		let before = set
			.iter()
			.filter(|(_, other)| other.line() == replica.line() && other.curr_range().start < replica.curr_range().start)
			.count();
		assert_eq!(replica.pre_count() as usize, before);
	}
}

#[test]
fn insert_keeps_order_and_pre_count() {
	let set = set_of(&[(1, 4, 7, "bar"), (0, 8, 11, "foo"), (0, 0, 3, "foo"), (1, 0, 3, "bar")]);
	let ranges = set.curr_ranges();
	assert_eq!(
		ranges,
		vec![
			Range::on_line(0, 0, 3),
			Range::on_line(0, 8, 11),
			Range::on_line(1, 0, 3),
			Range::on_line(1, 4, 7)
		]
	);
	let counts: Vec<u32> = set.iter().map(|(_, r)| r.pre_count()).collect();
	assert_eq!(counts, vec![0, 1, 0, 1]);
}

#[test]
fn remove_reranks() {
	let mut set = ReplicaSet::new();
	let first = set.insert(Replica::new(0, 0, 3, "foo"));
	set.insert(Replica::new(0, 4, 7, "foo"));
	set.insert(Replica::new(0, 8, 11, "foo"));
	assert!(set.remove(first).is_some());
	assert!(set.get(first).is_none());
	let counts: Vec<u32> = set.iter().map(|(_, r)| r.pre_count()).collect();
	assert_eq!(counts, vec![0, 1]);
	assert!(set.remove(first).is_none());
}

#[test]
fn ids_survive_other_removals() {
	let mut set = ReplicaSet::new();
	let a = set.insert(Replica::new(0, 0, 1, "a"));
	let b = set.insert(Replica::new(0, 2, 3, "b"));
	set.remove(a);
	set.insert(Replica::new(1, 0, 1, "c"));
	assert_eq!(set.get(b).map(Replica::text), Some("b"));
}

#[test]
fn splice_clamps_to_text() {
	let mut replica = Replica::new(0, 0, 3, "foo");
	replica.splice(1, 2, "XY");
	assert_eq!(replica.text(), "fXYo");
	replica.splice(10, 12, "!");
	assert_eq!(replica.text(), "fXYo!");
	replica.insert(0, "<");
	replica.append(">");
	assert_eq!(replica.text(), "<fXYo!>");
}

#[test]
fn splice_counts_characters_not_bytes() {
	let mut replica = Replica::new(0, 0, 3, "héé");
	replica.splice(1, 2, "e");
	assert_eq!(replica.text(), "heé");
}

#[test]
fn reflow_accumulates_same_line_growth() {
	let mut set = set_of(&[(0, 0, 3, "foo"), (0, 4, 7, "foo"), (1, 0, 3, "bar")]);
	set.for_each_mut(|r| r.append("X"));
	set.reflow();
	assert_eq!(
		set.curr_ranges(),
		vec![Range::on_line(0, 0, 4), Range::on_line(0, 5, 9), Range::on_line(1, 0, 4)]
	);
	// synced spans are untouched until sync
	let synced: Vec<Range> = set.iter().map(|(_, r)| r.range()).collect();
	assert_eq!(synced[1], Range::on_line(0, 4, 7));
	set.sync();
	let synced: Vec<Range> = set.iter().map(|(_, r)| r.range()).collect();
	assert_eq!(synced[1], Range::on_line(0, 5, 9));
}

#[test]
fn text_edit_targets_synced_span() {
	let mut set = set_of(&[(2, 4, 7, "foo")]);
	set.for_each_mut(|r| r.insert(0, "x"));
	set.reflow();
	let (_, replica) = set.iter().next().unwrap();
	assert_eq!(replica.text_edit(), TextEdit::new(Range::on_line(2, 4, 7), "xfoo"));
}

#[test]
fn shift_for_edit_before_on_same_line() {
	let mut replica = Replica::new(0, 4, 7, "foo");
	replica.shift_for(&TextEdit::new(Range::on_line(0, 0, 1), "abc"));
	assert_eq!(replica.curr_range(), Range::on_line(0, 6, 9));
	assert_eq!(replica.range(), Range::on_line(0, 6, 9));
	assert_eq!(replica.text(), "foo");
}

#[test]
fn shift_for_lines_inserted_above() {
	let mut replica = Replica::new(2, 1, 4, "foo");
	replica.shift_for(&TextEdit::insert(Position::new(0, 0), "a\nb\n"));
	assert_eq!(replica.curr_range(), Range::on_line(4, 1, 4));
}

#[test]
fn shift_for_line_break_before_replica() {
	let mut replica = Replica::new(0, 6, 9, "foo");
	replica.shift_for(&TextEdit::insert(Position::new(0, 2), "\n  "));
	assert_eq!(replica.curr_range(), Range::on_line(1, 6, 9));
}

#[test]
fn shift_for_joined_lines() {
	let mut replica = Replica::new(1, 2, 5, "foo");
	replica.shift_for(&TextEdit::delete(Range::from_coords(0, 3, 1, 0)));
	assert_eq!(replica.curr_range(), Range::on_line(0, 5, 8));
}

#[test]
fn shift_ignores_edit_after_replica() {
	let mut replica = Replica::new(1, 2, 5, "foo");
	replica.shift_for(&TextEdit::new(Range::from_coords(1, 7, 3, 0), "x\ny"));
	assert_eq!(replica.curr_range(), Range::on_line(1, 2, 5));
}

#[test]
fn joining_lines_reranks() {
	let mut set = set_of(&[(0, 0, 3, "foo"), (1, 2, 5, "bar")]);
	set.shift_for(&TextEdit::delete(Range::from_coords(0, 4, 1, 0)));
	assert_eq!(set.curr_ranges(), vec![Range::on_line(0, 0, 3), Range::on_line(0, 6, 9)]);
	let counts: Vec<u32> = set.iter().map(|(_, r)| r.pre_count()).collect();
	assert_eq!(counts, vec![0, 1]);
}

#[test]
fn splitting_lines_reranks() {
	let mut set = set_of(&[(0, 0, 3, "foo"), (0, 6, 9, "bar")]);
	set.shift_for(&TextEdit::insert(Position::new(0, 4), "\n"));
	assert_eq!(set.curr_ranges(), vec![Range::on_line(0, 0, 3), Range::on_line(1, 2, 5)]);
	let counts: Vec<u32> = set.iter().map(|(_, r)| r.pre_count()).collect();
	assert_eq!(counts, vec![0, 0]);
}

proptest! {
	#[test]
	fn pre_count_matches_same_line_predecessors(
		spans in prop::collection::vec((0u32..4, 0u32..20), 1..12),
		join in 0u32..3,
	) {
		let mut set = ReplicaSet::new();
		let mut taken: Vec<(u32, u32)> = Vec::new();
		for (line, start) in spans {
			let col = start * 3;
			if taken.contains(&(line, col)) {
				continue;
			}
			taken.push((line, col));
			set.insert(Replica::new(line, col, col + 2, "ab"));
		}
		assert_ranked(&set);
		set.shift_for(&TextEdit::delete(Range::from_coords(join, 100, join + 1, 0)));
		assert_ranked(&set);
		let ids: Vec<ReplicaId> = set.iter().map(|(id, _)| id).step_by(2).collect();
		for id in ids {
			set.remove(id);
			assert_ranked(&set);
		}
	}

	#[test]
	fn edits_before_shift_by_character_delta(col in 0u32..4, removed in 0u32..2, insert in "[a-z]{0,5}") {
		let mut replica = Replica::new(0, 10, 13, "foo");
		let edit = TextEdit::new(Range::on_line(0, col, col + removed), insert.clone());
		replica.shift_for(&edit);
		let delta = insert.chars().count() as i64 - i64::from(removed);
		prop_assert_eq!(i64::from(replica.curr_range().start.character), 10 + delta);
		prop_assert_eq!(i64::from(replica.curr_range().end.character), 13 + delta);
		prop_assert_eq!(replica.text(), "foo");
	}
}
