//! Result shaping for note collections fetched from a Memos instance.
//!
//! Every stage is pure: filter, sort by creation time, paginate, format, and finally re-rank
//! the page by relevance when a text query is active.

pub mod filter;
pub mod format;
pub mod paginate;
pub mod params;
pub mod pipeline;
pub mod record;
pub mod relevance;
pub mod snippet;
pub mod summary;

mod text;

pub use filter::{filter_records, sort_newest_first};
pub use format::format_note;
pub use paginate::{NO_NEXT_OFFSET, Page, paginate};
pub use params::{ResponseFormat, SearchParams, SearchRequest};
pub use pipeline::{QueryMetadata, SearchResponse, rerank_by_relevance, shape};
pub use record::{NoteFields, NoteRecord};
pub use relevance::relevance_score;
pub use snippet::extract_snippets;
pub use summary::summarize;
