use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use color_eyre::Result;
use rmcp::{
	ErrorData, ServerHandler, ServiceExt,
	handler::server::router::tool::ToolRouter,
	model::{CallToolResult, JsonObject, ServerCapabilities, ServerInfo},
	transport::{
		self,
		streamable_http_server::{
			StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
		},
	},
};
use serde_json::{Map, Value};
use tokio::net::TcpListener;

use memos_config::Service;
use memos_service::{Error, MemosService};
use memos_shaping::{ResponseFormat, SearchRequest};

pub const TOOL_SEARCH_MEMOS_ENHANCED: &str = "search_memos_enhanced";
pub const TOOL_SEARCH_MEMOS: &str = "search_memos";
pub const TOOL_GET_LATEST_MEMOS: &str = "get_latest_memos";
pub const TOOL_GET_MEMOS_BY_TAG: &str = "get_memos_by_tag";
pub const TOOL_GET_MEMO_BY_ID: &str = "get_memo_by_id";
pub const TOOL_CREATE_MEMO: &str = "create_memo";
pub const TOOL_UPDATE_MEMO: &str = "update_memo";
pub const TOOL_DELETE_MEMO: &str = "delete_memo";

const CLAMPED_INTEGER_ARGS: [&str; 3] = ["limit", "offset", "content_max_length"];
const DEFAULT_LATEST_LIMIT: i64 = 3;
const DEFAULT_BY_TAG_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct MemosMcp {
	service: Arc<MemosService>,
	tool_router: ToolRouter<Self>,
}
impl MemosMcp {
	pub fn new(service: Arc<MemosService>) -> Self {
		Self { service, tool_router: Self::tool_router() }
	}
}

#[rmcp::tool_router]
impl MemosMcp {
	#[rmcp::tool(
		name = "search_memos_enhanced",
		description = "Search memos with pagination, filters and a selectable response format (id_only, minimal, summary, full). Summary results for a query carry relevance scores and match snippets. Out-of-range limit (1 to 50), offset (0 or more) and content_max_length (50 to 2000) are clamped.",
		input_schema = search_enhanced_schema()
	)]
	async fn search_memos_enhanced(&self, params: JsonObject) -> Result<CallToolResult, ErrorData> {
		let req = parse_search_request(params)?;
		let response = self.service.search(req).await.map_err(service_error)?;
		let value = serde_json::to_value(&response).map_err(|err| {
			ErrorData::internal_error(format!("Failed to encode search response: {err}"), None)
		})?;

		Ok(CallToolResult::structured(value))
	}

	#[rmcp::tool(
		name = "search_memos",
		description = "Search memos by text and return full records (up to 20).",
		input_schema = search_schema()
	)]
	async fn search_memos(&self, mut params: JsonObject) -> Result<CallToolResult, ErrorData> {
		let query = take_optional_string(&mut params, "query")?.unwrap_or_default();
		let memos = self.service.search_legacy(&query).await.map_err(service_error)?;

		Ok(memo_list(memos))
	}

	#[rmcp::tool(
		name = "get_latest_memos",
		description = "Get the most recently created memos (default 3). Limits above 20 are clamped.",
		input_schema = latest_schema()
	)]
	async fn get_latest_memos(&self, mut params: JsonObject) -> Result<CallToolResult, ErrorData> {
		let limit = take_optional_i64(&mut params, "limit")?.unwrap_or(DEFAULT_LATEST_LIMIT);
		let format = take_response_format(&mut params)?;
		let memos = self.service.latest(limit, format).await.map_err(service_error)?;

		Ok(memo_list(memos))
	}

	#[rmcp::tool(
		name = "get_memos_by_tag",
		description = "Get the newest memos carrying a tag, given with or without # (default 10). Limits above 20 are clamped.",
		input_schema = by_tag_schema()
	)]
	async fn get_memos_by_tag(&self, mut params: JsonObject) -> Result<CallToolResult, ErrorData> {
		let tag = take_required_string(&mut params, "tag")?;
		let limit = take_optional_i64(&mut params, "limit")?.unwrap_or(DEFAULT_BY_TAG_LIMIT);
		let format = take_response_format(&mut params)?;
		let memos = self.service.by_tag(&tag, limit, format).await.map_err(service_error)?;

		Ok(memo_list(memos))
	}

	#[rmcp::tool(
		name = "get_memo_by_id",
		description = "Fetch a memo by id, given as memos/<uid> or <uid>.",
		input_schema = memo_id_schema()
	)]
	async fn get_memo_by_id(&self, mut params: JsonObject) -> Result<CallToolResult, ErrorData> {
		let memo_id = take_required_string(&mut params, "memo_id")?;
		let memo = self.service.get(&memo_id).await.map_err(service_error)?;

		Ok(CallToolResult::structured(memo))
	}

	#[rmcp::tool(
		name = "create_memo",
		description = "Create a private memo. The configured default tag is always included.",
		input_schema = create_schema()
	)]
	async fn create_memo(&self, mut params: JsonObject) -> Result<CallToolResult, ErrorData> {
		let content = take_required_string(&mut params, "content")?;
		let tags = take_string_list(&mut params, "tags")?;
		let memo = self.service.create(&content, &tags).await.map_err(service_error)?;

		Ok(CallToolResult::structured(memo))
	}

	#[rmcp::tool(
		name = "update_memo",
		description = "Replace the content and inline tags of an existing memo.",
		input_schema = update_schema()
	)]
	async fn update_memo(&self, mut params: JsonObject) -> Result<CallToolResult, ErrorData> {
		let memo_id = take_required_string(&mut params, "memo_id")?;
		let content = take_required_string(&mut params, "content")?;
		let tags = take_string_list(&mut params, "tags")?;
		let memo = self.service.update(&memo_id, &content, &tags).await.map_err(service_error)?;

		Ok(CallToolResult::structured(memo))
	}

	#[rmcp::tool(
		name = "delete_memo",
		description = "Delete a memo by id, given as memos/<uid> or <uid>.",
		input_schema = memo_id_schema()
	)]
	async fn delete_memo(&self, mut params: JsonObject) -> Result<CallToolResult, ErrorData> {
		let memo_id = take_required_string(&mut params, "memo_id")?;
		let out = self.service.delete(&memo_id).await.map_err(service_error)?;

		Ok(CallToolResult::structured(out))
	}
}

#[rmcp::tool_handler]
impl ServerHandler for MemosMcp {
	fn get_info(&self) -> ServerInfo {
		ServerInfo {
			instructions: Some(
				"Search, read and write notes stored in a Memos instance. Prefer search_memos_enhanced with the summary or minimal format to keep responses small.".to_string(),
			),
			capabilities: ServerCapabilities::builder().enable_tools().build(),
			..Default::default()
		}
	}
}

pub async fn serve_mcp(cfg: &Service, service: Arc<MemosService>) -> Result<()> {
	match cfg.transport.as_str() {
		"http" => serve_http(&cfg.mcp_bind, service).await,
		_ => serve_stdio(service).await,
	}
}

async fn serve_stdio(service: Arc<MemosService>) -> Result<()> {
	let running = MemosMcp::new(service).serve(transport::stdio()).await?;
	let reason = running.waiting().await?;

	tracing::info!(?reason, "Stdio session ended.");

	Ok(())
}

async fn serve_http(bind_addr: &str, service: Arc<MemosService>) -> Result<()> {
	let bind_addr: SocketAddr = bind_addr.parse()?;
	let session_manager: Arc<LocalSessionManager> = Default::default();
	let mcp_service = StreamableHttpService::new(
		move || Ok(MemosMcp::new(service.clone())),
		session_manager,
		StreamableHttpServerConfig::default(),
	);
	let router = Router::new().fallback_service(mcp_service);
	let listener = TcpListener::bind(bind_addr).await?;

	tracing::info!(%bind_addr, "Serving MCP over streamable HTTP.");

	axum::serve(listener, router).await?;

	Ok(())
}

fn service_error(err: Error) -> ErrorData {
	match err {
		Error::InvalidRequest { .. } => ErrorData::invalid_params(err.to_string(), None),
		Error::Store { message } => ErrorData::internal_error(message, None),
	}
}

fn memo_list(memos: Vec<Map<String, Value>>) -> CallToolResult {
	let memos = memos.into_iter().map(Value::Object).collect();

	CallToolResult::structured(serde_json::json!({ "memos": Value::Array(memos) }))
}

fn parse_search_request(params: JsonObject) -> Result<SearchRequest, ErrorData> {
	let mut params: JsonObject =
		params.into_iter().filter(|(_, value)| !value.is_null()).collect();

	for key in CLAMPED_INTEGER_ARGS {
		if let Some(value) = params.get_mut(key)
			&& let Some(number) = saturating_integer(value)
		{
			*value = Value::from(number);
		}
	}

	let mut req: SearchRequest = serde_json::from_value(Value::Object(params))
		.map_err(|err| ErrorData::invalid_params(format!("Invalid search arguments: {err}"), None))?;

	req.summary_only = req.response_format == ResponseFormat::Summary;

	Ok(req)
}

fn take_response_format(params: &mut JsonObject) -> Result<ResponseFormat, ErrorData> {
	Ok(take_optional_string(params, "response_format")?
		.map(|raw| ResponseFormat::parse(&raw))
		.unwrap_or_default())
}

fn take_required_string(params: &mut JsonObject, key: &str) -> Result<String, ErrorData> {
	let value = params
		.remove(key)
		.ok_or_else(|| ErrorData::invalid_params(format!("{key} is required."), None))?;
	let text = value
		.as_str()
		.ok_or_else(|| ErrorData::invalid_params(format!("{key} must be a string."), None))?
		.trim();

	if text.is_empty() {
		return Err(ErrorData::invalid_params(format!("{key} must be non-empty."), None));
	}

	Ok(text.to_string())
}

fn take_optional_string(params: &mut JsonObject, key: &str) -> Result<Option<String>, ErrorData> {
	match params.remove(key) {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(text)) => Ok(Some(text)),
		Some(_) => Err(ErrorData::invalid_params(format!("{key} must be a string."), None)),
	}
}

fn take_optional_i64(params: &mut JsonObject, key: &str) -> Result<Option<i64>, ErrorData> {
	match params.remove(key) {
		None | Some(Value::Null) => Ok(None),
		Some(value) => saturating_integer(&value)
			.map(Some)
			.ok_or_else(|| ErrorData::invalid_params(format!("{key} must be a number."), None)),
	}
}

/// Any JSON number as an `i64`. Fractions truncate and out-of-range values saturate, since
/// the service clamps them anyway.
fn saturating_integer(value: &Value) -> Option<i64> {
	let number = value.as_number()?;

	if let Some(int) = number.as_i64() {
		return Some(int);
	}
	if number.as_u64().is_some() {
		return Some(i64::MAX);
	}

	number.as_f64().map(|float| float as i64)
}

fn take_string_list(params: &mut JsonObject, key: &str) -> Result<Vec<String>, ErrorData> {
	let items = match params.remove(key) {
		None | Some(Value::Null) => return Ok(Vec::new()),
		Some(Value::Array(items)) => items,
		Some(_) =>
			return Err(ErrorData::invalid_params(format!("{key} must be an array."), None)),
	};

	items
		.into_iter()
		.map(|item| match item {
			Value::String(text) => Ok(text),
			_ => Err(ErrorData::invalid_params(format!("{key} items must be strings."), None)),
		})
		.collect()
}

fn response_format_property() -> Value {
	serde_json::json!({
		"type": ["string", "null"],
		"enum": ["id_only", "minimal", "summary", "full", null]
	})
}

fn search_enhanced_schema() -> Arc<JsonObject> {
	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": true,
		"properties": {
			"query": { "type": ["string", "null"] },
			"limit": { "type": ["integer", "null"] },
			"offset": { "type": ["integer", "null"] },
			"response_format": response_format_property(),
			"content_max_length": { "type": ["integer", "null"] },
			"date_from": { "type": ["string", "null"] },
			"date_to": { "type": ["string", "null"] },
			"tags_filter": { "type": ["array", "null"], "items": { "type": "string" } }
		}
	}))
}

fn search_schema() -> Arc<JsonObject> {
	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": true,
		"required": ["query"],
		"properties": {
			"query": { "type": "string" }
		}
	}))
}

fn latest_schema() -> Arc<JsonObject> {
	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": true,
		"properties": {
			"limit": { "type": ["integer", "null"] },
			"response_format": response_format_property()
		}
	}))
}

fn by_tag_schema() -> Arc<JsonObject> {
	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": true,
		"required": ["tag"],
		"properties": {
			"tag": { "type": "string" },
			"limit": { "type": ["integer", "null"] },
			"response_format": response_format_property()
		}
	}))
}

fn memo_id_schema() -> Arc<JsonObject> {
	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": true,
		"required": ["memo_id"],
		"properties": {
			"memo_id": { "type": "string" }
		}
	}))
}

fn create_schema() -> Arc<JsonObject> {
	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": true,
		"required": ["content"],
		"properties": {
			"content": { "type": "string" },
			"tags": { "type": ["array", "null"], "items": { "type": "string" } }
		}
	}))
}

fn update_schema() -> Arc<JsonObject> {
	Arc::new(rmcp::object!({
		"type": "object",
		"additionalProperties": true,
		"required": ["memo_id", "content"],
		"properties": {
			"memo_id": { "type": "string" },
			"content": { "type": "string" },
			"tags": { "type": ["array", "null"], "items": { "type": "string" } }
		}
	}))
}
