pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	/// The Memos store failed. The message names the operation that was running.
	#[error("{message}")]
	Store { message: String },
}
