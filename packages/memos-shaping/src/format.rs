use serde_json::{Map, Value};

use crate::{
	params::{ResponseFormat, SearchParams},
	record::{
		FIELD_CONTENT, FIELD_CREATE_TIME, FIELD_ID, FIELD_NODES, FIELD_SNIPPET, FIELD_TAGS,
		FIELD_UPDATE_TIME, NoteFields, NoteRecord,
	},
	relevance,
	snippet::{self, DEFAULT_CONTEXT_CHARS, ELLIPSIS},
	summary::{self, MAX_SUMMARY_SNIPPETS},
	text,
};

pub const FIELD_RELEVANCE_SCORE: &str = "relevanceScore";
pub const FIELD_MATCH_SNIPPETS: &str = "matchSnippets";

const MINIMAL_SNIPPET_CHARS: usize = 100;

/// Projects one record into the shape selected by the response format.
///
/// Summary output for an active query also carries `relevanceScore` and, when the query
/// matched, up to three `matchSnippets`.
pub fn format_note(record: &NoteRecord, params: &SearchParams) -> Map<String, Value> {
	let mut out = Map::new();

	out.insert(FIELD_ID.to_string(), Value::from(record.note_id()));

	if params.response_format() == ResponseFormat::IdOnly {
		return out;
	}

	out.insert(FIELD_CREATE_TIME.to_string(), Value::from(record.create_time()));
	out.insert(FIELD_UPDATE_TIME.to_string(), Value::from(record.update_time()));

	match params.response_format() {
		ResponseFormat::Minimal => {
			let first_line = record.content().split('\n').next().unwrap_or_default();

			out.insert(
				FIELD_SNIPPET.to_string(),
				Value::from(text::truncate_chars(first_line, MINIMAL_SNIPPET_CHARS)),
			);
			out.insert(FIELD_TAGS.to_string(), tags_value(record));
		},
		ResponseFormat::Summary => insert_summary(&mut out, record, params),
		ResponseFormat::Full =>
			for field in params.fields() {
				if let Some(value) = record.get(field) {
					out.insert(field.clone(), value.clone());
				}
			},
		ResponseFormat::IdOnly => {},
	}

	if params.response_format() != ResponseFormat::Full {
		out.remove(FIELD_NODES);
	}

	out
}

fn insert_summary(out: &mut Map<String, Value>, record: &NoteRecord, params: &SearchParams) {
	let content = record.content();
	let query = params.query();

	if params.summary_only() || params.has_query() {
		out.insert(
			FIELD_CONTENT.to_string(),
			Value::from(summary::summarize(content, query, params.content_max_length())),
		);

		if params.has_query() {
			let snippets = snippet::extract_snippets(content, query, DEFAULT_CONTEXT_CHARS);

			if !snippets.is_empty() {
				let top: Vec<Value> =
					snippets.into_iter().take(MAX_SUMMARY_SNIPPETS).map(Value::from).collect();

				out.insert(FIELD_MATCH_SNIPPETS.to_string(), Value::Array(top));
			}

			out.insert(
				FIELD_RELEVANCE_SCORE.to_string(),
				Value::from(relevance::relevance_score(content, query, &record.tags())),
			);
		}
	} else {
		out.insert(
			FIELD_CONTENT.to_string(),
			Value::from(truncate_with_ellipsis(content, params.content_max_length())),
		);
	}

	out.insert(FIELD_TAGS.to_string(), tags_value(record));
	out.insert(FIELD_SNIPPET.to_string(), Value::from(record.str_field(FIELD_SNIPPET)));
}

fn truncate_with_ellipsis(content: &str, max_chars: usize) -> String {
	let head = text::truncate_chars(content, max_chars);

	if head.len() < content.len() { format!("{head}{ELLIPSIS}") } else { head.to_string() }
}

fn tags_value(record: &NoteRecord) -> Value {
	Value::Array(record.tags().into_iter().map(Value::from).collect())
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::params::SearchRequest;

	fn record(value: Value) -> NoteRecord {
		value.as_object().cloned().expect("fixture must be an object")
	}

	fn params(format: ResponseFormat, query: &str) -> SearchParams {
		SearchParams::new(SearchRequest {
			query: query.to_string(),
			response_format: format,
			..Default::default()
		})
	}

	fn sample() -> NoteRecord {
		record(json!({
			"name": "memos/42",
			"content": "Title Line\nBody text about rust",
			"tags": ["rust"],
			"createTime": "2024-05-01T00:00:00Z",
			"updateTime": "2024-05-02T00:00:00Z",
			"snippet": "Title Line Body text",
			"nodes": [{ "type": "PARAGRAPH" }],
			"visibility": "PRIVATE"
		}))
	}

	#[test]
	fn id_only_has_a_single_key() {
		for query in ["", "rust"] {
			let out = format_note(&sample(), &params(ResponseFormat::IdOnly, query));

			assert_eq!(out.len(), 1);
			assert_eq!(out[FIELD_ID], json!("memos/42"));
		}
	}

	#[test]
	fn minimal_uses_first_line_and_omits_content() {
		let out = format_note(&sample(), &params(ResponseFormat::Minimal, ""));

		assert_eq!(out[FIELD_SNIPPET], json!("Title Line"));
		assert_eq!(out[FIELD_TAGS], json!(["rust"]));
		assert!(!out.contains_key(FIELD_CONTENT));
		assert!(!out.contains_key(FIELD_NODES));
	}

	#[test]
	fn minimal_snippet_is_capped() {
		let note = record(json!({ "name": "memos/1", "content": "x".repeat(150) }));
		let out = format_note(&note, &params(ResponseFormat::Minimal, ""));

		assert_eq!(out[FIELD_SNIPPET].as_str().map(|s| s.chars().count()), Some(100));
	}

	#[test]
	fn summary_without_query_truncates_plainly() {
		let note = record(json!({ "name": "memos/1", "content": "y".repeat(80) }));
		let params = SearchParams::new(SearchRequest {
			content_max_length: 50,
			..Default::default()
		});
		let out = format_note(&note, &params);

		assert_eq!(out[FIELD_CONTENT], json!(format!("{}...", "y".repeat(50))));
		assert_eq!(out[FIELD_SNIPPET], json!(""));
		assert!(!out.contains_key(FIELD_RELEVANCE_SCORE));
		assert!(!out.contains_key(FIELD_MATCH_SNIPPETS));
	}

	#[test]
	fn summary_with_query_attaches_relevance() {
		let out = format_note(&sample(), &params(ResponseFormat::Summary, "rust"));

		assert!(out[FIELD_CONTENT].as_str().is_some_and(|content| content.contains("**rust**")));
		assert_eq!(out[FIELD_MATCH_SNIPPETS].as_array().map(Vec::len), Some(1));
		assert!(out[FIELD_RELEVANCE_SCORE].as_f64().is_some_and(|score| score > 0.0));
		assert_eq!(out[FIELD_SNIPPET], json!("Title Line Body text"));
		assert!(!out.contains_key(FIELD_NODES));
	}

	#[test]
	fn summary_only_uses_structural_summary_without_scores() {
		let params = SearchParams::new(SearchRequest { summary_only: true, ..Default::default() });
		let out = format_note(&sample(), &params);

		assert_eq!(out[FIELD_CONTENT], json!("Title Line\nBody text about rust"));
		assert!(!out.contains_key(FIELD_RELEVANCE_SCORE));
	}

	#[test]
	fn full_copies_requested_fields_only() {
		let params = SearchParams::new(SearchRequest {
			response_format: ResponseFormat::Full,
			fields: vec!["content".to_string(), "nodes".to_string(), "missing".to_string()],
			..Default::default()
		});
		let out = format_note(&sample(), &params);

		assert_eq!(out[FIELD_CONTENT], json!("Title Line\nBody text about rust"));
		assert!(out.contains_key(FIELD_NODES));
		assert!(!out.contains_key("missing"));
		assert!(!out.contains_key("visibility"));
		assert!(!out.contains_key(FIELD_TAGS));
		assert_eq!(out[FIELD_UPDATE_TIME], json!("2024-05-02T00:00:00Z"));
	}
}
