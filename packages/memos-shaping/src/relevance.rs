use crate::text;

/// Score given to every note when no query is active.
pub const NEUTRAL_SCORE: f64 = 0.5;

const TITLE_BONUS: f64 = 2.0;
const TAG_BONUS: f64 = 1.0;
const SCALE: f64 = 10.0;

/// Heuristic relevance in `[0.0, 1.0]`.
///
/// This is a fixed linear blend, not a probabilistic model:
/// `min(1, (occurrences + title_bonus + tag_bonus + position) / 10)`, where the title bonus
/// applies when the first line contains the query, the tag bonus when any tag contains it, and
/// `position = 1 - first_match / content_len` rewards early matches.
pub fn relevance_score<S>(content: &str, query: &str, tags: &[S]) -> f64
where
	S: AsRef<str>,
{
	if query.is_empty() {
		return NEUTRAL_SCORE;
	}

	let chars: Vec<char> = content.chars().collect();
	let haystack = text::fold_chars(&chars);
	let needle = text::fold(query);
	let occurrences = text::count_non_overlapping(&haystack, &needle) as f64;
	let title = content.split('\n').next().unwrap_or_default();
	let title_bonus = if text::contains_folded(title, query) { TITLE_BONUS } else { 0.0 };
	let tag_bonus = if tags.iter().any(|tag| text::contains_folded(tag.as_ref(), query)) {
		TAG_BONUS
	} else {
		0.0
	};
	let position = match text::find_from(&haystack, &needle, 0) {
		Some(first) if !haystack.is_empty() => 1.0 - first as f64 / haystack.len() as f64,
		_ => 0.0,
	};
	let raw = occurrences + title_bonus + tag_bonus + position;

	(raw / SCALE).min(1.0)
}
