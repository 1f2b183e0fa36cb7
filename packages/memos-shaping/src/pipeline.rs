use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
	filter,
	format::{self, FIELD_RELEVANCE_SCORE},
	paginate,
	params::{ResponseFormat, SearchParams},
	record::NoteRecord,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
	pub memos: Vec<Map<String, Value>>,
	pub total_count: usize,
	pub has_more: bool,
	/// `-1` when there is no further page.
	pub next_offset: i64,
	pub query_metadata: QueryMetadata,
}

/// Describes the search that was actually executed, after clamping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMetadata {
	pub query: String,
	pub limit: usize,
	pub offset: usize,
	pub format: ResponseFormat,
	pub filtered_count: usize,
	pub returned_count: usize,
}

/// Runs the full pipeline over an already fetched collection.
pub fn shape(records: &[NoteRecord], params: &SearchParams) -> SearchResponse {
	let mut matched = filter::filter_records(records, params);

	filter::sort_newest_first(&mut matched);

	let page = paginate::paginate(&matched, params.offset(), params.limit());
	let mut memos: Vec<Map<String, Value>> =
		page.items.iter().map(|record| format::format_note(record, params)).collect();

	if params.has_query() {
		rerank_by_relevance(&mut memos);
	}

	let query_metadata = QueryMetadata {
		query: params.query().to_string(),
		limit: params.limit(),
		offset: params.offset(),
		format: params.response_format(),
		filtered_count: page.total_count,
		returned_count: memos.len(),
	};

	SearchResponse {
		memos,
		total_count: page.total_count,
		has_more: page.has_more,
		next_offset: page.next_offset,
		query_metadata,
	}
}

/// Stable sort of an already selected page by `relevanceScore`, highest first.
///
/// Does nothing unless at least one note carries a score; notes without one rank as zero.
pub fn rerank_by_relevance(memos: &mut [Map<String, Value>]) {
	if !memos.iter().any(|memo| memo.contains_key(FIELD_RELEVANCE_SCORE)) {
		return;
	}

	memos.sort_by(|a, b| {
		relevance_of(b).partial_cmp(&relevance_of(a)).unwrap_or(Ordering::Equal)
	});
}

fn relevance_of(memo: &Map<String, Value>) -> f64 {
	memo.get(FIELD_RELEVANCE_SCORE).and_then(Value::as_f64).unwrap_or(0.0)
}
