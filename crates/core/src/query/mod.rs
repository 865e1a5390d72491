//! Filter/group/paginate engine
//!
//! Shared by every backend driver that holds its entries in memory. A query
//! runs in a fixed order: context prefix, filter tokens, then either entry
//! pagination or group pagination.

pub mod filter;
pub mod group;
pub mod paginate;

use std::collections::HashSet;

use chrono_tz::Tz;
use timetrail_domain::{
    EntriesResponse, Entry, GroupBy, NotFoundReason, PageSlice, Pagination, QueryParams, Result,
    TimetrailError,
};
use tracing::debug;

/// Evaluates `QueryParams` against an in-memory entry list.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine {
    tz: Tz,
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl QueryEngine {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Engine reading calendar dates in the IANA zone `name`.
    ///
    /// # Errors
    /// Returns `TimetrailError::Config` for an unknown zone name.
    pub fn with_timezone_name(name: &str) -> Result<Self> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|err| TimetrailError::Config(format!("unknown timezone '{name}': {err}")))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Run `params` over `entries`, which must be sorted by `start`
    /// ascending.
    ///
    /// # Errors
    /// Returns `TimetrailError::NotFound` when the resulting window is
    /// empty, with the reason telling an empty match set apart from an
    /// offset past the end.
    pub fn run(&self, entries: &[Entry], params: &QueryParams) -> Result<EntriesResponse> {
        let context = params.context_path();
        let depth = context.len();

        let mut matched = filter::by_context(entries, context);
        if let Some(tokens) = &params.filter {
            matched = filter::by_tokens(matched, tokens, depth, self.tz);
        }

        let (window, pagination) = match params.last {
            Some(group) => self.paginate_groups(matched, group, depth, params),
            None => Self::paginate_entries(&matched, params),
        };

        debug!(
            matched = pagination.count,
            returned = window.len(),
            offset = params.offset,
            limit = ?params.limit,
            group = ?params.last,
            "query evaluated"
        );

        if window.is_empty() {
            return Err(TimetrailError::NotFound(empty_reason(&pagination)));
        }

        Ok(EntriesResponse { entries: window, context: params.context.clone(), pagination })
    }

    fn paginate_entries(matched: &[&Entry], params: &QueryParams) -> (Vec<Entry>, Pagination) {
        let (offset, limit) = (params.offset, params.limit);
        let window = paginate::window(matched.len(), offset, limit);
        let owned = |slice: Vec<&Entry>| PageSlice::Entries(slice.into_iter().cloned().collect());

        let pagination = Pagination {
            count: matched.len(),
            limit,
            offset,
            previous: paginate::previous(matched, offset, limit).map(owned),
            next: paginate::next_entries(matched, offset, limit).map(owned),
            group: None,
        };
        (matched[window].iter().map(|entry| (*entry).clone()).collect(), pagination)
    }

    fn paginate_groups(
        &self,
        matched: Vec<&Entry>,
        group: GroupBy,
        depth: usize,
        params: &QueryParams,
    ) -> (Vec<Entry>, Pagination) {
        let (offset, limit) = (params.offset, params.limit);
        let keys = group::distinct_keys(&matched, group, depth, self.tz);
        let selected: HashSet<&str> =
            keys[paginate::window(keys.len(), offset, limit)].iter().map(String::as_str).collect();

        let window = matched
            .into_iter()
            .filter(|entry| selected.contains(group::group_key(entry, group, depth, self.tz).as_str()))
            .cloned()
            .collect();

        let pagination = Pagination {
            count: keys.len(),
            limit,
            offset,
            previous: paginate::previous(&keys, offset, limit).map(PageSlice::Groups),
            next: paginate::next_groups(&keys, offset, limit).map(PageSlice::Groups),
            group: Some(group),
        };
        (window, pagination)
    }
}

fn empty_reason(pagination: &Pagination) -> NotFoundReason {
    let (count, offset) = (pagination.count, pagination.offset);
    match pagination.limit {
        _ if count == 0 => NotFoundReason::NoMatches,
        Some(limit) if offset < count => NotFoundReason::EmptyWindow { offset, limit },
        _ => NotFoundReason::OffsetOutOfRange { offset, count },
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(month: u32, day: u32) -> i64 {
        NaiveDate::from_ymd_opt(2024, month, day)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
            .map(|naive| naive.and_utc().timestamp_millis())
            .unwrap()
    }

    fn entry(id: &str, start: i64, details: &[&str]) -> Entry {
        Entry::new(start, Some(start + 3_600_000), details.iter().map(|s| (*s).to_string()).collect())
            .with_id(id)
    }

    fn ids(entries: &[Entry]) -> Vec<&str> {
        entries.iter().filter_map(Entry::id).collect()
    }

    fn sample() -> Vec<Entry> {
        vec![
            entry("1", day(1, 1), &["ClientA", "ProjectX", "Design"]),
            entry("2", day(1, 1) + 1, &["ClientA", "ProjectY"]),
            entry("3", day(1, 2), &["ClientB", "Support"]),
            entry("4", day(1, 3), &["ClientA", "ProjectX", "Review"]),
            entry("5", day(2, 1), &["ClientA"]),
        ]
    }

    #[test]
    fn test_unfiltered_query_returns_everything() {
        let engine = QueryEngine::default();
        let response = engine.run(&sample(), &QueryParams::new()).unwrap();

        assert_eq!(ids(&response.entries), ["1", "2", "3", "4", "5"]);
        assert_eq!(response.pagination.count, 5);
        assert_eq!(response.pagination.previous, None);
        assert_eq!(response.pagination.next, None);
        assert_eq!(response.context, None);
    }

    #[test]
    fn test_context_then_filter() {
        let engine = QueryEngine::default();
        let params = QueryParams::new()
            .with_context(vec!["ClientA".into()])
            .with_filter(vec!["projectx".into(), "01.2024".into()]);

        let response = engine.run(&sample(), &params).unwrap();
        assert_eq!(ids(&response.entries), ["1", "4"]);
        assert_eq!(response.context, Some(vec!["ClientA".to_string()]));
    }

    #[test]
    fn test_entry_pagination_slices() {
        let engine = QueryEngine::default();
        let params = QueryParams::new().with_limit(2).with_offset(2);

        let response = engine.run(&sample(), &params).unwrap();
        assert_eq!(ids(&response.entries), ["3", "4"]);

        let pagination = response.pagination;
        assert_eq!(pagination.count, 5);
        let Some(PageSlice::Entries(previous)) = pagination.previous else {
            panic!("expected previous entries");
        };
        assert_eq!(ids(&previous), ["1", "2"]);
        let Some(PageSlice::Entries(next)) = pagination.next else {
            panic!("expected next entries");
        };
        assert_eq!(ids(&next), ["5"]);
    }

    #[test]
    fn test_group_by_days() {
        let engine = QueryEngine::default();
        let params = QueryParams::new().with_last(GroupBy::Days).with_limit(1).with_offset(1);

        let response = engine.run(&sample(), &params).unwrap();
        assert_eq!(ids(&response.entries), ["3"]);

        let pagination = response.pagination;
        assert_eq!(pagination.count, 4);
        assert_eq!(pagination.group, Some(GroupBy::Days));
        assert_eq!(pagination.previous, Some(PageSlice::Groups(vec!["2024-01-01".into()])));
        assert_eq!(pagination.next, Some(PageSlice::Groups(vec!["2024-01-03".into()])));
    }

    #[test]
    fn test_group_by_tasks_below_context() {
        let engine = QueryEngine::default();
        let params = QueryParams::new()
            .with_context(vec!["ClientA".into()])
            .with_last(GroupBy::Tasks)
            .with_limit(2);

        let response = engine.run(&sample(), &params).unwrap();
        // Keys in order of first appearance: ProjectX, ProjectY, "".
        assert_eq!(ids(&response.entries), ["1", "2", "4"]);
        assert_eq!(response.pagination.count, 3);
        assert_eq!(response.pagination.previous, None);
        assert_eq!(response.pagination.next, Some(PageSlice::Groups(vec![String::new()])));
    }

    #[test]
    fn test_not_found_reasons() {
        let engine = QueryEngine::default();

        let none = engine.run(&sample(), &QueryParams::new().with_filter(vec!["nothing".into()]));
        assert_eq!(none, Err(TimetrailError::NotFound(NotFoundReason::NoMatches)));

        let past = engine.run(&sample(), &QueryParams::new().with_offset(9));
        assert_eq!(
            past,
            Err(TimetrailError::NotFound(NotFoundReason::OffsetOutOfRange { offset: 9, count: 5 }))
        );

        let zero = engine.run(&sample(), &QueryParams::new().with_limit(0));
        assert_eq!(
            zero,
            Err(TimetrailError::NotFound(NotFoundReason::EmptyWindow { offset: 0, limit: 0 }))
        );

        let empty = engine.run(&[], &QueryParams::new());
        assert_eq!(empty, Err(TimetrailError::NotFound(NotFoundReason::NoMatches)));
    }

    #[test]
    fn test_unknown_timezone_is_config_error() {
        let err = QueryEngine::with_timezone_name("Mars/Olympus").unwrap_err();
        assert!(matches!(err, TimetrailError::Config(_)));
        assert_eq!(
            QueryEngine::with_timezone_name("Europe/Berlin").unwrap().timezone(),
            Tz::Europe__Berlin
        );
    }
}
