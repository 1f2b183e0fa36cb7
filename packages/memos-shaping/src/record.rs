use serde_json::{Map, Value};

pub const FIELD_NAME: &str = "name";
pub const FIELD_ID: &str = "id";
pub const FIELD_CONTENT: &str = "content";
pub const FIELD_TAGS: &str = "tags";
pub const FIELD_SNIPPET: &str = "snippet";
pub const FIELD_CREATE_TIME: &str = "createTime";
pub const FIELD_UPDATE_TIME: &str = "updateTime";
pub const FIELD_NODES: &str = "nodes";

/// A note as returned by the store. The shaper only ever reads it.
pub type NoteRecord = Map<String, Value>;

/// Lenient accessors over a raw note record. Missing or mistyped fields read as empty.
pub trait NoteFields {
	/// Memos identifies notes by `name` (`memos/<uid>`); `id` is accepted as a fallback.
	fn note_id(&self) -> &str;

	fn content(&self) -> &str;

	fn tags(&self) -> Vec<&str>;

	fn create_time(&self) -> &str;

	fn update_time(&self) -> &str;

	fn str_field(&self, key: &str) -> &str;
}
impl NoteFields for NoteRecord {
	fn note_id(&self) -> &str {
		match self.get(FIELD_NAME).and_then(Value::as_str) {
			Some(name) => name,
			None => self.str_field(FIELD_ID),
		}
	}

	fn content(&self) -> &str {
		self.str_field(FIELD_CONTENT)
	}

	fn tags(&self) -> Vec<&str> {
		self.get(FIELD_TAGS)
			.and_then(Value::as_array)
			.map(|tags| tags.iter().filter_map(Value::as_str).collect())
			.unwrap_or_default()
	}

	fn create_time(&self) -> &str {
		self.str_field(FIELD_CREATE_TIME)
	}

	fn update_time(&self) -> &str {
		self.str_field(FIELD_UPDATE_TIME)
	}

	fn str_field(&self, key: &str) -> &str {
		self.get(key).and_then(Value::as_str).unwrap_or("")
	}
}
