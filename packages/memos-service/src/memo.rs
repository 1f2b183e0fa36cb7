use serde_json::Value;

use crate::{Error, MemosService, Result};
use memos_providers::memos;

impl MemosService {
	pub async fn get(&self, memo_id: &str) -> Result<Value> {
		require_memo_id(memo_id)?;

		tracing::debug!(memo_id, "Fetching memo.");

		self.store.get_note(memo_id).await.map_err(|err| crate::store_error("getting memo", err))
	}

	/// Creates a private memo. The configured default tag is appended unless already present.
	pub async fn create(&self, content: &str, tags: &[String]) -> Result<Value> {
		let tags = with_default_tag(tags, &self.tools.default_tag);

		tracing::debug!(tags = ?tags, "Creating memo.");

		let created = self
			.store
			.create_note(content, &tags)
			.await
			.map_err(|err| crate::store_error("creating memo", err))?;

		let name = created.get("name").and_then(Value::as_str);

		tracing::info!(name, "Memo created.");

		Ok(created)
	}

	pub async fn update(&self, memo_id: &str, content: &str, tags: &[String]) -> Result<Value> {
		require_memo_id(memo_id)?;

		tracing::debug!(memo_id, tags = ?tags, "Updating memo.");

		let updated = self
			.store
			.update_note(memo_id, content, tags)
			.await
			.map_err(|err| crate::store_error("updating memo", err))?;

		tracing::info!(memo_id, "Memo updated.");

		Ok(updated)
	}

	pub async fn delete(&self, memo_id: &str) -> Result<Value> {
		require_memo_id(memo_id)?;

		let out = self
			.store
			.delete_note(memo_id)
			.await
			.map_err(|err| crate::store_error("deleting memo", err))?;

		tracing::info!(memo_id, "Memo deleted.");

		Ok(out)
	}
}

fn require_memo_id(memo_id: &str) -> Result<()> {
	if memos::memo_name(memo_id).is_empty() {
		return Err(Error::InvalidRequest { message: "memo_id must be non-empty.".to_string() });
	}

	Ok(())
}

fn with_default_tag(tags: &[String], default_tag: &str) -> Vec<String> {
	let mut out = tags.to_vec();

	if !out.iter().any(|tag| tag == default_tag) {
		out.push(default_tag.to_string());
	}

	out
}
