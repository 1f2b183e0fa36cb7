use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 50;
pub const DEFAULT_CONTENT_MAX_LENGTH: i64 = 500;
pub const MIN_CONTENT_MAX_LENGTH: i64 = 50;
pub const MAX_CONTENT_MAX_LENGTH: i64 = 2_000;
pub const DEFAULT_FIELDS: [&str; 4] = ["id", "content", "tags", "createTime"];

/// Output shape of each note in a search response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ResponseFormat {
	Full,
	#[default]
	Summary,
	Minimal,
	IdOnly,
}
impl ResponseFormat {
	/// Unknown names fall back to [`ResponseFormat::Summary`].
	pub fn parse(raw: &str) -> Self {
		match raw.trim().to_ascii_lowercase().as_str() {
			"full" => Self::Full,
			"summary" => Self::Summary,
			"minimal" => Self::Minimal,
			"id_only" => Self::IdOnly,
			_ => Self::default(),
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Full => "full",
			Self::Summary => "summary",
			Self::Minimal => "minimal",
			Self::IdOnly => "id_only",
		}
	}
}
impl From<String> for ResponseFormat {
	fn from(value: String) -> Self {
		Self::parse(&value)
	}
}

/// Raw, unvalidated search input as callers provide it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
	pub query: String,
	pub limit: i64,
	pub offset: i64,
	pub fields: Vec<String>,
	pub summary_only: bool,
	pub content_max_length: i64,
	pub date_from: Option<String>,
	pub date_to: Option<String>,
	pub tags_filter: Vec<String>,
	pub response_format: ResponseFormat,
	pub group_by_tag: bool,
}
impl Default for SearchRequest {
	fn default() -> Self {
		Self {
			query: String::new(),
			limit: DEFAULT_LIMIT,
			offset: 0,
			fields: DEFAULT_FIELDS.iter().map(|field| field.to_string()).collect(),
			summary_only: false,
			content_max_length: DEFAULT_CONTENT_MAX_LENGTH,
			date_from: None,
			date_to: None,
			tags_filter: Vec::new(),
			response_format: ResponseFormat::default(),
			group_by_tag: false,
		}
	}
}

/// Search parameters with every bound already enforced.
///
/// Out-of-range values are corrected silently, never rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchParams {
	query: String,
	limit: usize,
	offset: usize,
	fields: Vec<String>,
	summary_only: bool,
	content_max_length: usize,
	date_from: Option<String>,
	date_to: Option<String>,
	tags_filter: Vec<String>,
	response_format: ResponseFormat,
	group_by_tag: bool,
}
impl SearchParams {
	pub fn new(req: SearchRequest) -> Self {
		Self {
			query: req.query,
			limit: req.limit.clamp(MIN_LIMIT, MAX_LIMIT) as usize,
			offset: req.offset.max(0) as usize,
			fields: req.fields,
			summary_only: req.summary_only,
			content_max_length: req
				.content_max_length
				.clamp(MIN_CONTENT_MAX_LENGTH, MAX_CONTENT_MAX_LENGTH) as usize,
			date_from: req.date_from.filter(|value| !value.is_empty()),
			date_to: req.date_to.filter(|value| !value.is_empty()),
			tags_filter: req.tags_filter,
			response_format: req.response_format,
			group_by_tag: req.group_by_tag,
		}
	}

	pub fn query(&self) -> &str {
		&self.query
	}

	pub fn has_query(&self) -> bool {
		!self.query.is_empty()
	}

	pub fn limit(&self) -> usize {
		self.limit
	}

	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn fields(&self) -> &[String] {
		&self.fields
	}

	pub fn summary_only(&self) -> bool {
		self.summary_only
	}

	pub fn content_max_length(&self) -> usize {
		self.content_max_length
	}

	pub fn date_from(&self) -> Option<&str> {
		self.date_from.as_deref()
	}

	pub fn date_to(&self) -> Option<&str> {
		self.date_to.as_deref()
	}

	pub fn tags_filter(&self) -> &[String] {
		&self.tags_filter
	}

	pub fn response_format(&self) -> ResponseFormat {
		self.response_format
	}

	/// Reserved. The pipeline does not group yet.
	pub fn group_by_tag(&self) -> bool {
		self.group_by_tag
	}
}
impl From<SearchRequest> for SearchParams {
	fn from(req: SearchRequest) -> Self {
		Self::new(req)
	}
}
impl From<SearchParams> for SearchRequest {
	fn from(params: SearchParams) -> Self {
		Self {
			query: params.query,
			limit: params.limit as i64,
			offset: params.offset as i64,
			fields: params.fields,
			summary_only: params.summary_only,
			content_max_length: params.content_max_length as i64,
			date_from: params.date_from,
			date_to: params.date_to,
			tags_filter: params.tags_filter,
			response_format: params.response_format,
			group_by_tag: params.group_by_tag,
		}
	}
}
