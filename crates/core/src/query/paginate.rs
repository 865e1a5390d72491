//! Offset/limit windows and their neighbouring slices

use std::ops::Range;

/// Index range of the window at `offset`, clamped to `len`.
pub fn window(len: usize, offset: usize, limit: Option<usize>) -> Range<usize> {
    let start = offset.min(len);
    let end = limit.map_or(len, |limit| offset.saturating_add(limit).min(len));
    start..end.max(start)
}

/// Up to `limit` items right before the window; everything before it when
/// there is no limit.
pub fn previous<T: Clone>(items: &[T], offset: usize, limit: Option<usize>) -> Option<Vec<T>> {
    let end = offset.min(items.len());
    let start = match limit {
        Some(limit) if offset > limit => offset - limit,
        _ => 0,
    };
    non_empty(items, start.min(end)..end)
}

/// Everything after the window. Without a limit the window already runs to
/// the end, so there is nothing next.
pub fn next_entries<T: Clone>(items: &[T], offset: usize, limit: Option<usize>) -> Option<Vec<T>> {
    let start = offset.saturating_add(limit?);
    non_empty(items, start.min(items.len())..items.len())
}

/// The next page of group keys: at most `limit` keys after the window.
pub fn next_groups<T: Clone>(items: &[T], offset: usize, limit: Option<usize>) -> Option<Vec<T>> {
    let limit = limit?;
    let start = offset.saturating_add(limit).min(items.len());
    let end = start.saturating_add(limit).min(items.len());
    non_empty(items, start..end)
}

fn non_empty<T: Clone>(items: &[T], range: Range<usize>) -> Option<Vec<T>> {
    if range.is_empty() {
        None
    } else {
        Some(items[range].to_vec())
    }
}
