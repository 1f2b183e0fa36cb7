pub mod memo;
pub mod search;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use memos_config::{Config, Tools};
use memos_providers::MemosClient;
use memos_shaping::NoteRecord;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type StoreResult<T> = memos_providers::Result<T>;

/// Remote note collection the service reads from and writes to.
pub trait NoteStore
where
	Self: Send + Sync,
{
	/// Every record the caller can see, in store order.
	fn list_notes(&self) -> BoxFuture<'_, StoreResult<Vec<NoteRecord>>>;

	fn get_note<'a>(&'a self, memo_id: &'a str) -> BoxFuture<'a, StoreResult<Value>>;

	fn create_note<'a>(
		&'a self,
		content: &'a str,
		tags: &'a [String],
	) -> BoxFuture<'a, StoreResult<Value>>;

	fn update_note<'a>(
		&'a self,
		memo_id: &'a str,
		content: &'a str,
		tags: &'a [String],
	) -> BoxFuture<'a, StoreResult<Value>>;

	fn delete_note<'a>(&'a self, memo_id: &'a str) -> BoxFuture<'a, StoreResult<Value>>;
}

struct DefaultStore {
	client: MemosClient,
}
impl NoteStore for DefaultStore {
	fn list_notes(&self) -> BoxFuture<'_, StoreResult<Vec<NoteRecord>>> {
		Box::pin(self.client.list_memos())
	}

	fn get_note<'a>(&'a self, memo_id: &'a str) -> BoxFuture<'a, StoreResult<Value>> {
		Box::pin(self.client.get_memo(memo_id))
	}

	fn create_note<'a>(
		&'a self,
		content: &'a str,
		tags: &'a [String],
	) -> BoxFuture<'a, StoreResult<Value>> {
		Box::pin(self.client.create_memo(content, tags))
	}

	fn update_note<'a>(
		&'a self,
		memo_id: &'a str,
		content: &'a str,
		tags: &'a [String],
	) -> BoxFuture<'a, StoreResult<Value>> {
		Box::pin(self.client.update_memo(memo_id, content, tags))
	}

	fn delete_note<'a>(&'a self, memo_id: &'a str) -> BoxFuture<'a, StoreResult<Value>> {
		Box::pin(self.client.delete_memo(memo_id))
	}
}

pub struct MemosService {
	pub tools: Tools,
	pub store: Arc<dyn NoteStore>,
}
impl MemosService {
	/// Builds the HTTP-backed service from a loaded config.
	pub fn new(cfg: &Config) -> Result<Self> {
		let client = MemosClient::new(&cfg.memos).map_err(|err| Error::Store {
			message: format!("Failed to build Memos client: {err}"),
		})?;

		Ok(Self::with_store(cfg.tools.clone(), Arc::new(DefaultStore { client })))
	}

	pub fn with_store(tools: Tools, store: Arc<dyn NoteStore>) -> Self {
		Self { tools, store }
	}
}

pub(crate) fn store_error(action: &str, err: memos_providers::Error) -> Error {
	Error::Store { message: format!("Error {action}: {err}") }
}
