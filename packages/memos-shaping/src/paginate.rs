/// Continuation offset reported when no further page exists.
pub const NO_NEXT_OFFSET: i64 = -1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
	pub items: &'a [T],
	pub total_count: usize,
	pub has_more: bool,
	pub next_offset: i64,
}

/// Slices `items` to `[offset, offset + limit)`. Offsets past the end give an empty page.
pub fn paginate<T>(items: &[T], offset: usize, limit: usize) -> Page<'_, T> {
	let total_count = items.len();
	let end = offset.saturating_add(limit);
	let start = offset.min(total_count);
	let has_more = end < total_count;

	Page {
		items: &items[start..end.min(total_count)],
		total_count,
		has_more,
		next_offset: if has_more { end as i64 } else { NO_NEXT_OFFSET },
	}
}
