use crate::{
	params::SearchParams,
	record::{NoteFields, NoteRecord},
	text,
};

/// Keeps records that satisfy every active predicate.
///
/// Tags match when any record tag equals any filter tag. Date bounds are inclusive and compared
/// as raw strings, so they must use the store's timestamp layout.
pub fn filter_records<'a>(records: &'a [NoteRecord], params: &SearchParams) -> Vec<&'a NoteRecord> {
	records.iter().filter(|record| matches(record, params)).collect()
}

/// Newest first. Ties keep their incoming order.
pub fn sort_newest_first(records: &mut [&NoteRecord]) {
	records.sort_by(|a, b| b.create_time().cmp(a.create_time()));
}

fn matches(record: &NoteRecord, params: &SearchParams) -> bool {
	matches_query(record, params.query())
		&& matches_tags(record, params.tags_filter())
		&& matches_dates(record, params.date_from(), params.date_to())
}

fn matches_query(record: &NoteRecord, query: &str) -> bool {
	query.is_empty() || text::contains_folded(record.content(), query)
}

fn matches_tags(record: &NoteRecord, tags_filter: &[String]) -> bool {
	if tags_filter.is_empty() {
		return true;
	}

	let tags = record.tags();

	tags_filter.iter().any(|wanted| tags.contains(&wanted.as_str()))
}

fn matches_dates(record: &NoteRecord, date_from: Option<&str>, date_to: Option<&str>) -> bool {
	let created = record.create_time();

	if let Some(from) = date_from
		&& created < from
	{
		return false;
	}
	if let Some(to) = date_to
		&& created > to
	{
		return false;
	}

	true
}
