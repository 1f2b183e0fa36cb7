use crate::{
	snippet::{self, DEFAULT_CONTEXT_CHARS, ELLIPSIS},
	text,
};

pub const SNIPPET_SEPARATOR: &str = " [...] ";
pub const MAX_SUMMARY_SNIPPETS: usize = 3;

// Below this share of the budget the summary also takes plain body lines.
const BODY_FILL_RATIO: f64 = 0.7;

/// Best-effort summary of `content` in at most roughly `max_length` chars.
///
/// With a query that matches, the first few match snippets are joined. Otherwise the title is
/// kept and header or list lines are preferred over plain body lines.
pub fn summarize(content: &str, query: &str, max_length: usize) -> String {
	if content.is_empty() {
		return String::new();
	}
	if !query.is_empty() {
		let snippets = snippet::extract_snippets(content, query, DEFAULT_CONTEXT_CHARS);

		if !snippets.is_empty() {
			return join_snippets(&snippets, max_length);
		}
	}

	structural_summary(content, max_length)
}

fn join_snippets(snippets: &[String], max_length: usize) -> String {
	let take = snippets.len().min(MAX_SUMMARY_SNIPPETS);
	let joined = snippets[..take].join(SNIPPET_SEPARATOR);

	if text::char_len(&joined) > max_length {
		return format!("{}{ELLIPSIS}", text::truncate_chars(&joined, max_length));
	}

	joined
}

fn structural_summary(content: &str, max_length: usize) -> String {
	let mut lines = content.split('\n');
	let title = lines.next().unwrap_or_default();
	let body: Vec<&str> = lines.map(str::trim).filter(|line| !line.is_empty()).collect();
	let budget = max_length as i64 - text::char_len(title) as i64;
	let mut parts = vec![title];
	// Length of `parts` joined by single spaces.
	let mut joined_len = text::char_len(title);

	for line in body.iter().filter(|line| is_structural(line)) {
		push_within_budget(&mut parts, &mut joined_len, line, budget);
	}

	if (joined_len as f64) < max_length as f64 * BODY_FILL_RATIO {
		for line in body.iter().filter(|line| !is_structural(line)) {
			push_within_budget(&mut parts, &mut joined_len, line, budget);
		}
	}

	truncate_at_word(parts.join("\n"), max_length)
}

fn push_within_budget<'a>(
	parts: &mut Vec<&'a str>,
	joined_len: &mut usize,
	line: &'a str,
	budget: i64,
) {
	let line_len = text::char_len(line);

	if ((*joined_len + line_len) as i64) < budget {
		parts.push(line);

		*joined_len += 1 + line_len;
	}
}

fn is_structural(line: &str) -> bool {
	line.starts_with('#') || line.starts_with('-') || line.starts_with('*') || line.starts_with("1.")
}

fn truncate_at_word(summary: String, max_length: usize) -> String {
	if text::char_len(&summary) <= max_length {
		return summary;
	}

	let head = text::truncate_chars(&summary, max_length);
	let cut = match head.rfind(' ') {
		Some(idx) => &head[..idx],
		None => head,
	};

	format!("{cut}{ELLIPSIS}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_content_summarizes_to_empty() {
		assert_eq!(summarize("", "", 500), "");
		assert_eq!(summarize("", "query", 500), "");
	}

	#[test]
	fn single_line_is_kept_verbatim() {
		assert_eq!(summarize("Just a title", "", 500), "Just a title");
	}

	#[test]
	fn prefers_structural_lines_then_body() {
		let content = "Title\nplain body line\n# Header\n- item one\n\n* item two\n1. first";
		let summary = summarize(content, "", 500);

		assert_eq!(
			summary,
			"Title\n# Header\n- item one\n* item two\n1. first\nplain body line"
		);
	}

	#[test]
	fn skips_body_lines_once_summary_is_large_enough() {
		let header = format!("# {}", "h".repeat(40));
		let content = format!("Title\nbody text\n{header}");
		let summary = summarize(&content, "", 60);

		// Title plus header already exceed 70% of the budget.
		assert_eq!(summary, format!("Title\n{header}"));
	}

	#[test]
	fn lines_over_budget_are_dropped() {
		let content = format!("Title\n- {}\n- short", "x".repeat(80));
		let summary = summarize(&content, "", 50);

		assert_eq!(summary, "Title\n- short");
	}

	#[test]
	fn long_title_truncates_at_word_boundary() {
		let content = "word ".repeat(30);
		let summary = summarize(content.trim_end(), "", 50);

		assert!(summary.ends_with("..."));
		assert!(summary.chars().count() <= 53);
		assert!(!summary.trim_end_matches("...").ends_with(' '));
	}

	#[test]
	fn query_summary_joins_top_three_snippets() {
		let content = "one rust\n".repeat(4);
		let summary = summarize(&content, "rust", 2_000);

		assert_eq!(summary.matches(SNIPPET_SEPARATOR).count(), 2);
		assert_eq!(summary.matches("**rust**").count(), 3);
	}

	#[test]
	fn query_summary_hard_truncates() {
		let content = format!("{} rust {}", "a".repeat(40), "b".repeat(40));
		let summary = summarize(&content, "rust", 50);

		assert_eq!(summary.chars().count(), 53);
		assert!(summary.ends_with("..."));
	}

	#[test]
	fn falls_back_to_structure_when_query_misses() {
		assert_eq!(summarize("Title\n- item", "absent", 500), "Title\n- item");
	}
}
