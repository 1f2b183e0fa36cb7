use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::{Map, Value};

use crate::{Error, Result};
use memos_config::MemosApi;

const MEMOS_PATH: &str = "/api/v1/memos";
const MEMO_NAME_PREFIX: &str = "memos/";
const DEFAULT_VISIBILITY: &str = "PRIVATE";

/// Thin client over the Memos v1 REST API.
#[derive(Clone, Debug)]
pub struct MemosClient {
	client: Client,
	base_url: String,
	page_size: u32,
	max_pages: u32,
}
impl MemosClient {
	pub fn new(cfg: &MemosApi) -> Result<Self> {
		let api_key = cfg.api_key.as_deref().filter(|key| !key.trim().is_empty()).ok_or_else(|| {
			Error::InvalidConfig { message: "memos.api_key is required.".to_string() }
		})?;
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(crate::auth_headers(api_key, &cfg.default_headers)?)
			.build()?;

		Ok(Self {
			client,
			base_url: cfg.url.trim_end_matches('/').to_string(),
			page_size: cfg.page_size,
			max_pages: cfg.max_pages,
		})
	}

	/// Fetches every memo visible to the token, following `nextPageToken` until the listing is
	/// exhausted or `max_pages` is reached.
	pub async fn list_memos(&self) -> Result<Vec<Map<String, Value>>> {
		let url = format!("{}{MEMOS_PATH}", self.base_url);
		let page_size = self.page_size.to_string();
		let mut memos = Vec::new();
		let mut page_token: Option<String> = None;

		for page in 0..self.max_pages {
			let mut query = vec![("pageSize", page_size.clone())];

			if let Some(token) = page_token.take() {
				query.push(("pageToken", token));
			}

			let res = self.client.get(&url).query(&query).send().await?;
			let json = read_json(res).await?;
			let (items, next) = parse_list_page(json)?;

			tracing::debug!(page, fetched = items.len(), "Fetched memo listing page.");

			memos.extend(items);

			match next {
				Some(token) => page_token = Some(token),
				None => return Ok(memos),
			}
		}

		tracing::warn!(
			max_pages = self.max_pages,
			fetched = memos.len(),
			"Memo listing stopped at the page limit."
		);

		Ok(memos)
	}

	pub async fn get_memo(&self, memo_id: &str) -> Result<Value> {
		let url = self.memo_url(memo_id)?;
		let res = self.client.get(url).send().await?;

		read_json(res).await
	}

	pub async fn create_memo(&self, content: &str, tags: &[String]) -> Result<Value> {
		let url = format!("{}{MEMOS_PATH}", self.base_url);
		let body = serde_json::json!({
			"content": compose_content(content, tags),
			"visibility": DEFAULT_VISIBILITY,
		});
		let res = self.client.post(url).json(&body).send().await?;

		read_json(res).await
	}

	pub async fn update_memo(&self, memo_id: &str, content: &str, tags: &[String]) -> Result<Value> {
		let url = self.memo_url(memo_id)?;
		let body = serde_json::json!({ "content": compose_content(content, tags) });
		let res = self.client.patch(url).json(&body).send().await?;

		read_json(res).await
	}

	pub async fn delete_memo(&self, memo_id: &str) -> Result<Value> {
		let url = self.memo_url(memo_id)?;

		self.client.delete(url).send().await?.error_for_status()?;

		Ok(serde_json::json!({ "message": format!("Memo {memo_id} deleted successfully") }))
	}

	fn memo_url(&self, memo_id: &str) -> Result<String> {
		let name = memo_name(memo_id);

		if name.is_empty() {
			return Err(Error::InvalidArgument { message: "memo_id must be non-empty.".to_string() });
		}

		Ok(format!("{}{MEMOS_PATH}/{name}", self.base_url))
	}
}

/// Accepts both `memos/<uid>` and a bare `<uid>`.
pub fn memo_name(memo_id: &str) -> &str {
	let trimmed = memo_id.trim();

	match trimmed.strip_prefix(MEMO_NAME_PREFIX) {
		Some(rest) => rest.split('/').next().unwrap_or_default(),
		None => trimmed,
	}
}

/// Tags are stored inline: appended after a blank line, space separated.
pub fn compose_content(content: &str, tags: &[String]) -> String {
	if tags.is_empty() {
		return content.to_string();
	}

	format!("{content}\n\n{}", tags.join(" "))
}

fn parse_list_page(json: Value) -> Result<(Vec<Map<String, Value>>, Option<String>)> {
	let mut memos = Vec::new();

	match json.get("memos") {
		None | Some(Value::Null) => {},
		Some(Value::Array(items)) =>
			for item in items {
				let Some(obj) = item.as_object() else {
					return Err(Error::InvalidResponse {
						message: "Memo listing entries must be objects.".to_string(),
					});
				};

				memos.push(obj.clone());
			},
		Some(_) => {
			return Err(Error::InvalidResponse {
				message: "Memo listing field memos must be an array.".to_string(),
			});
		},
	}

	let next = json
		.get("nextPageToken")
		.and_then(Value::as_str)
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(str::to_string);

	Ok((memos, next))
}

async fn read_json(res: Response) -> Result<Value> {
	let bytes = res.error_for_status()?.bytes().await?;

	Ok(serde_json::from_slice(&bytes)?)
}
