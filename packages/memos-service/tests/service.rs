use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use memos_config::Tools;
use memos_service::{BoxFuture, Error, MemosService, NoteStore, StoreResult};
use memos_shaping::{NoteRecord, ResponseFormat, SearchRequest};

#[derive(Default)]
struct InMemoryStore {
	records: Vec<NoteRecord>,
	writes: Mutex<Vec<(String, String, Vec<String>)>>,
}
impl InMemoryStore {
	fn with_records(records: Vec<NoteRecord>) -> Self {
		Self { records, ..Default::default() }
	}

	fn record_write(&self, op: &str, content: &str, tags: &[String]) {
		self.writes.lock().expect("lock").push((op.to_string(), content.to_string(), tags.to_vec()));
	}
}
impl NoteStore for InMemoryStore {
	fn list_notes(&self) -> BoxFuture<'_, StoreResult<Vec<NoteRecord>>> {
		let records = self.records.clone();

		Box::pin(async move { Ok(records) })
	}

	fn get_note<'a>(&'a self, memo_id: &'a str) -> BoxFuture<'a, StoreResult<Value>> {
		Box::pin(async move { Ok(json!({ "name": format!("memos/{memo_id}") })) })
	}

	fn create_note<'a>(
		&'a self,
		content: &'a str,
		tags: &'a [String],
	) -> BoxFuture<'a, StoreResult<Value>> {
		self.record_write("create", content, tags);

		Box::pin(async move { Ok(json!({ "name": "memos/new", "content": content })) })
	}

	fn update_note<'a>(
		&'a self,
		memo_id: &'a str,
		content: &'a str,
		tags: &'a [String],
	) -> BoxFuture<'a, StoreResult<Value>> {
		self.record_write("update", content, tags);

		Box::pin(async move {
			Ok(json!({ "name": format!("memos/{memo_id}"), "content": content }))
		})
	}

	fn delete_note<'a>(&'a self, memo_id: &'a str) -> BoxFuture<'a, StoreResult<Value>> {
		Box::pin(async move {
			Ok(json!({ "message": format!("Memo {memo_id} deleted successfully") }))
		})
	}
}

struct FailingStore;
impl FailingStore {
	fn fail<T>() -> StoreResult<T> {
		Err(memos_providers::Error::InvalidResponse { message: "store offline".to_string() })
	}
}
impl NoteStore for FailingStore {
	fn list_notes(&self) -> BoxFuture<'_, StoreResult<Vec<NoteRecord>>> {
		Box::pin(async { Self::fail() })
	}

	fn get_note<'a>(&'a self, _memo_id: &'a str) -> BoxFuture<'a, StoreResult<Value>> {
		Box::pin(async { Self::fail() })
	}

	fn create_note<'a>(
		&'a self,
		_content: &'a str,
		_tags: &'a [String],
	) -> BoxFuture<'a, StoreResult<Value>> {
		Box::pin(async { Self::fail() })
	}

	fn update_note<'a>(
		&'a self,
		_memo_id: &'a str,
		_content: &'a str,
		_tags: &'a [String],
	) -> BoxFuture<'a, StoreResult<Value>> {
		Box::pin(async { Self::fail() })
	}

	fn delete_note<'a>(&'a self, _memo_id: &'a str) -> BoxFuture<'a, StoreResult<Value>> {
		Box::pin(async { Self::fail() })
	}
}

fn record(value: Value) -> NoteRecord {
	value.as_object().cloned().expect("fixture must be an object")
}

fn daily_records() -> Vec<NoteRecord> {
	(1..=12)
		.map(|day| {
			let tags = if day % 2 == 0 { json!(["even"]) } else { json!(["odd"]) };

			record(json!({
				"name": format!("memos/{day}"),
				"content": format!("Day {day} notes about rust"),
				"tags": tags,
				"createTime": format!("2024-01-{day:02}T00:00:00Z"),
			}))
		})
		.collect()
}

fn service_with(store: impl NoteStore + 'static) -> MemosService {
	MemosService::with_store(Tools::default(), Arc::new(store))
}

fn ids(memos: &[serde_json::Map<String, Value>]) -> Vec<&str> {
	memos.iter().filter_map(|memo| memo["id"].as_str()).collect()
}

#[tokio::test]
async fn search_pages_through_fetched_records() {
	let service = service_with(InMemoryStore::with_records(daily_records()));
	let response = service
		.search(SearchRequest { limit: 5, offset: 10, ..Default::default() })
		.await
		.expect("Search failed.");

	assert_eq!(ids(&response.memos), ["memos/2", "memos/1"]);
	assert_eq!(response.total_count, 12);
	assert!(!response.has_more);
	assert_eq!(response.next_offset, -1);
	assert_eq!(response.query_metadata.returned_count, 2);
}

#[tokio::test]
async fn search_store_failure_is_reported() {
	let service = service_with(FailingStore);
	let err = service.search(SearchRequest::default()).await.expect_err("Expected store error.");

	assert!(matches!(err, Error::Store { .. }));
	assert!(err.to_string().contains("Error searching memos: store offline"), "Unexpected: {err}");
}

#[tokio::test]
async fn legacy_search_returns_full_records() {
	let service = service_with(InMemoryStore::with_records(daily_records()));
	let memos = service.search_legacy("day 3 ").await.expect("Search failed.");

	assert_eq!(ids(&memos), ["memos/3"]);
	assert_eq!(memos[0]["content"], "Day 3 notes about rust");
	assert!(!memos[0].contains_key("relevanceScore"));
}

#[tokio::test]
async fn latest_caps_limit_and_downgrades_id_only() {
	let mut tools = Tools::default();

	tools.listing_limit_max = 3;

	let service =
		MemosService::with_store(tools, Arc::new(InMemoryStore::with_records(daily_records())));
	let memos = service.latest(10, ResponseFormat::IdOnly).await.expect("Listing failed.");

	assert_eq!(ids(&memos), ["memos/12", "memos/11", "memos/10"]);
	assert!(memos[0].contains_key("content"));
	assert!(memos[0].contains_key("tags"));
}

#[tokio::test]
async fn by_tag_strips_hash_and_filters() {
	let service = service_with(InMemoryStore::with_records(daily_records()));
	let memos = service.by_tag("#odd", 2, ResponseFormat::Minimal).await.expect("Listing failed.");

	assert_eq!(ids(&memos), ["memos/11", "memos/9"]);
	assert_eq!(memos[0]["snippet"], "Day 11 notes about rust");
	assert!(!memos[0].contains_key("content"));

	let err = service.by_tag("#", 2, ResponseFormat::Summary).await.expect_err("Expected error.");

	assert!(matches!(err, Error::InvalidRequest { .. }));
}

#[tokio::test]
async fn create_appends_default_tag() {
	let store = Arc::new(InMemoryStore::default());
	let service = MemosService::with_store(Tools::default(), store.clone());
	let created = service.create("Body", &["#work".to_string()]).await.expect("Create failed.");

	assert_eq!(created["name"], "memos/new");

	let writes = store.writes.lock().expect("lock");

	assert_eq!(writes[0].0, "create");
	assert_eq!(writes[0].2, ["#work", "#MCP"]);
}

#[tokio::test]
async fn update_passes_tags_through() {
	let store = Arc::new(InMemoryStore::default());
	let service = MemosService::with_store(Tools::default(), store.clone());
	let updated = service
		.update("memos/7", "New body", &["#edited".to_string()])
		.await
		.expect("Update failed.");

	assert_eq!(updated["content"], "New body");
	assert_eq!(store.writes.lock().expect("lock")[0].2, ["#edited"]);
}

#[tokio::test]
async fn delete_and_get_require_memo_id() {
	let service = service_with(InMemoryStore::default());
	let out = service.delete("abc").await.expect("Delete failed.");

	assert_eq!(out["message"], "Memo abc deleted successfully");

	let err = service.get(" ").await.expect_err("Expected invalid request.");

	assert!(err.to_string().contains("memo_id must be non-empty."), "Unexpected: {err}");
}

#[tokio::test]
async fn write_failures_name_the_operation() {
	let service = service_with(FailingStore);
	let err = service.create("Body", &[]).await.expect_err("Expected store error.");

	assert!(err.to_string().starts_with("Error creating memo:"), "Unexpected: {err}");

	let err = service.delete("abc").await.expect_err("Expected store error.");

	assert!(err.to_string().starts_with("Error deleting memo:"), "Unexpected: {err}");
}
