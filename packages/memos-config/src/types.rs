use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub memos: MemosApi,
	#[serde(default)]
	pub tools: Tools,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	/// Either "stdio" or "http".
	#[serde(default = "default_transport")]
	pub transport: String,
	/// Listen address for the streamable HTTP transport. Must be a loopback address.
	#[serde(default = "default_mcp_bind")]
	pub mcp_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MemosApi {
	pub url: String,
	/// Optional. Falls back to MEMOS_ACCESS_TOKEN, then MEMOS_API_KEY.
	pub api_key: Option<String>,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	/// Records requested per listing page.
	#[serde(default = "default_page_size")]
	pub page_size: u32,
	/// Upper bound on listing pages fetched for a single search.
	#[serde(default = "default_max_pages")]
	pub max_pages: u32,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Tools {
	/// Appended to every created memo unless already present.
	pub default_tag: String,
	pub legacy_search_limit: i64,
	/// Ceiling for the latest and by-tag listings.
	pub listing_limit_max: i64,
	pub latest_content_max_length: i64,
	pub by_tag_content_max_length: i64,
}
impl Default for Tools {
	fn default() -> Self {
		Self {
			default_tag: default_tag(),
			legacy_search_limit: 20,
			listing_limit_max: 20,
			latest_content_max_length: 300,
			by_tag_content_max_length: 400,
		}
	}
}

pub(crate) fn default_tag() -> String {
	"#MCP".to_string()
}

fn default_transport() -> String {
	"stdio".to_string()
}

fn default_mcp_bind() -> String {
	"127.0.0.1:8765".to_string()
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_timeout_ms() -> u64 {
	10_000
}

fn default_page_size() -> u32 {
	200
}

fn default_max_pages() -> u32 {
	100
}
