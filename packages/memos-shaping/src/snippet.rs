use crate::text;

pub const DEFAULT_CONTEXT_CHARS: usize = 50;
pub const ELLIPSIS: &str = "...";
pub const EMPHASIS: &str = "**";

/// Returns one context window per case-insensitive occurrence of `query`.
///
/// Scanning resumes one char after each hit, so overlapping occurrences are reported again.
/// Windows grow outward until they sit on word boundaries, carry an ellipsis on each side
/// that was cut, and wrap the matched text in `**`.
pub fn extract_snippets(content: &str, query: &str, context_chars: usize) -> Vec<String> {
	if query.is_empty() || content.is_empty() {
		return Vec::new();
	}

	let chars: Vec<char> = content.chars().collect();
	let haystack = text::fold_chars(&chars);
	let needle = text::fold(query);
	let mut snippets = Vec::new();
	let mut start = 0;

	while let Some(pos) = text::find_from(&haystack, &needle, start) {
		snippets.push(render(&chars, pos, needle.len(), context_chars));

		start = pos + 1;
	}

	snippets
}

fn render(chars: &[char], pos: usize, len: usize, context_chars: usize) -> String {
	let match_end = pos + len;
	let mut begin = pos.saturating_sub(context_chars);
	let mut end = match_end.saturating_add(context_chars).min(chars.len());

	while begin > 0 && chars[begin - 1].is_alphanumeric() {
		begin -= 1;
	}
	while end < chars.len() && chars[end].is_alphanumeric() {
		end += 1;
	}

	let mut out = String::with_capacity(end - begin + 2 * (ELLIPSIS.len() + EMPHASIS.len()));

	if begin > 0 {
		out.push_str(ELLIPSIS);
	}

	out.extend(&chars[begin..pos]);
	out.push_str(EMPHASIS);
	out.extend(&chars[pos..match_end]);
	out.push_str(EMPHASIS);
	out.extend(&chars[match_end..end]);

	if end < chars.len() {
		out.push_str(ELLIPSIS);
	}

	out
}
