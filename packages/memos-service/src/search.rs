use serde_json::{Map, Value};

use crate::{Error, MemosService, Result};
use memos_shaping::{ResponseFormat, SearchParams, SearchRequest, SearchResponse};

impl MemosService {
	/// Fetches the whole collection and shapes it.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let params = SearchParams::new(req);

		tracing::debug!(
			query = params.query(),
			limit = params.limit(),
			offset = params.offset(),
			format = params.response_format().as_str(),
			tags_filter = ?params.tags_filter(),
			"Searching memos."
		);

		let records = self
			.store
			.list_notes()
			.await
			.map_err(|err| crate::store_error("searching memos", err))?;
		let response = memos_shaping::shape(&records, &params);

		tracing::info!(
			fetched = records.len(),
			total = response.total_count,
			returned = response.memos.len(),
			has_more = response.has_more,
			"Memo search completed."
		);

		Ok(response)
	}

	/// Full records for a plain query, capped at `tools.legacy_search_limit`.
	pub async fn search_legacy(&self, query: &str) -> Result<Vec<Map<String, Value>>> {
		let req = SearchRequest {
			query: query.to_string(),
			limit: self.tools.legacy_search_limit,
			response_format: ResponseFormat::Full,
			..Default::default()
		};

		Ok(self.search(req).await?.memos)
	}

	pub async fn latest(&self, limit: i64, format: ResponseFormat) -> Result<Vec<Map<String, Value>>> {
		let req = SearchRequest {
			limit: limit.min(self.tools.listing_limit_max),
			content_max_length: self.tools.latest_content_max_length,
			response_format: listing_format(format),
			..Default::default()
		};

		Ok(self.search(req).await?.memos)
	}

	/// Accepts the tag with or without `#`.
	pub async fn by_tag(
		&self,
		tag: &str,
		limit: i64,
		format: ResponseFormat,
	) -> Result<Vec<Map<String, Value>>> {
		let tag = tag.replace('#', "");
		let tag = tag.trim();

		if tag.is_empty() {
			return Err(Error::InvalidRequest { message: "tag must be non-empty.".to_string() });
		}

		let req = SearchRequest {
			limit: limit.min(self.tools.listing_limit_max),
			content_max_length: self.tools.by_tag_content_max_length,
			tags_filter: vec![tag.to_string()],
			response_format: listing_format(format),
			..Default::default()
		};

		Ok(self.search(req).await?.memos)
	}
}

/// Listings only offer `minimal`, `summary` and `full`.
fn listing_format(format: ResponseFormat) -> ResponseFormat {
	match format {
		ResponseFormat::IdOnly => ResponseFormat::Summary,
		other => other,
	}
}
