use super::*;

fn lens(lines: &'static [&'static str]) -> impl Fn(u32) -> u32 {
	move |line| lines.get(line as usize).map_or(0, |l| l.chars().count() as u32)
}

#[test]
fn word_under_cursor() {
	assert_eq!(word_range_at("let foo_bar = 1;", Position::new(2, 6)), Some(Range::on_line(2, 4, 11)));
	assert_eq!(word_range_at("let foo_bar = 1;", Position::new(2, 4)), Some(Range::on_line(2, 4, 11)));
	assert_eq!(word_range_at("let foo_bar = 1;", Position::new(2, 11)), None);
	assert_eq!(word_range_at("abc", Position::new(0, 3)), None);
}

#[test]
fn char_range_falls_back_to_last_char() {
	assert_eq!(char_range_at(1, Position::new(0, 0)), Range::on_line(0, 0, 1));
	assert_eq!(char_range_at(1, Position::new(1, 1)), Range::on_line(1, 0, 1));
	assert_eq!(char_range_at(3, Position::new(0, 9)), Range::on_line(0, 2, 3));
}

#[test]
fn split_characterwise_range() {
	let lines = lens(&["hello", "", "world"]);
	let ranges = split_range(Range::from_coords(0, 2, 2, 3), lines);
	assert_eq!(ranges, vec![Range::on_line(0, 2, 5), Range::on_line(2, 0, 3)]);
}

#[test]
fn split_single_line_range() {
	let ranges = split_range(Range::on_line(1, 1, 4), lens(&["", "abcdef"]));
	assert_eq!(ranges, vec![Range::on_line(1, 1, 4)]);
}

#[test]
fn block_ranges_clamp_to_line_length() {
	let lines = lens(&["abcdef", "ab", "abcdef"]);
	let ranges = block_ranges(Range::from_coords(2, 4, 0, 1), lines);
	assert_eq!(
		ranges,
		vec![Range::on_line(0, 1, 4), Range::on_line(1, 1, 2), Range::on_line(2, 1, 4)]
	);
}

#[test]
fn whole_line_ranges() {
	let ranges = line_ranges(0, 1, lens(&["foo", "ba"]));
	assert_eq!(ranges, vec![Range::on_line(0, 0, 3), Range::on_line(1, 0, 2)]);
}
