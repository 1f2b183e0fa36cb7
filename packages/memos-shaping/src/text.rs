// Case-insensitive matching works on folded chars so that every index in the folded
// sequence is also a valid index into the original content.

pub(crate) fn fold(text: &str) -> Vec<char> {
	text.chars().map(fold_char).collect()
}

pub(crate) fn fold_chars(chars: &[char]) -> Vec<char> {
	chars.iter().copied().map(fold_char).collect()
}

pub(crate) fn find_from(haystack: &[char], needle: &[char], start: usize) -> Option<usize> {
	if needle.is_empty() || needle.len() > haystack.len() {
		return None;
	}

	let last = haystack.len() - needle.len();

	if start > last {
		return None;
	}

	(start..=last).find(|&idx| haystack[idx..idx + needle.len()] == *needle)
}

pub(crate) fn count_non_overlapping(haystack: &[char], needle: &[char]) -> usize {
	let mut count = 0;
	let mut start = 0;

	while let Some(pos) = find_from(haystack, needle, start) {
		count += 1;
		start = pos + needle.len();
	}

	count
}

pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
	let needle = fold(needle);

	if needle.is_empty() {
		return true;
	}

	find_from(&fold(haystack), &needle, 0).is_some()
}

pub(crate) fn char_len(text: &str) -> usize {
	text.chars().count()
}

pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
	match text.char_indices().nth(max_chars) {
		Some((byte_idx, _)) => &text[..byte_idx],
		None => text,
	}
}

fn fold_char(ch: char) -> char {
	ch.to_lowercase().next().unwrap_or(ch)
}
