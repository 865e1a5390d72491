//! Context/period resolution
//!
//! The resolver keeps the stack of contexts the user navigated through.
//! The label path scopes queries and re-homes entries; the period gives
//! coarse date-scoped views their anchor.

use chrono::{Datelike, NaiveDate, TimeZone};
use chrono_tz::Tz;
use timetrail_domain::{Context, ContextKind, Entry, Period, PeriodKind};

use crate::query::filter;

/// Navigation stack of contexts, innermost last.
#[derive(Debug, Clone)]
pub struct ContextResolver {
    tz: Tz,
    frames: Vec<Context>,
}

impl ContextResolver {
    pub fn new(tz: Tz) -> Self {
        Self { tz, frames: Vec::new() }
    }

    /// Descend into `context`.
    pub fn push(&mut self, context: Context) {
        self.frames.push(context);
    }

    /// Step back out of the innermost context.
    pub fn pop(&mut self) -> Option<Context> {
        self.frames.pop()
    }

    /// Replace the whole stack with a single context.
    pub fn set(&mut self, context: Context) {
        self.frames.clear();
        self.frames.push(context);
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn current(&self) -> Option<&Context> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Label path of the innermost task context; empty when there is none.
    pub fn path(&self) -> Vec<String> {
        self.frames
            .iter()
            .rev()
            .find(|frame| frame.kind == ContextKind::Task)
            .map(|frame| frame.path.clone())
            .unwrap_or_default()
    }

    /// Period of the innermost context.
    ///
    /// A temporal context is its own period. Otherwise the nearest ancestor
    /// of a different kind decides: its period if it is temporal, none if
    /// not.
    pub fn period(&self) -> Option<Period> {
        let (top, ancestors) = self.frames.split_last()?;
        let anchor = if top.is_temporal() {
            top
        } else {
            ancestors.iter().rev().find(|frame| frame.kind != top.kind)?
        };
        let kind = anchor.kind.period_kind()?;
        self.canonical_period(kind, anchor.start?)
    }

    /// Period of `kind` containing `timestamp`, anchored at its local start.
    pub fn canonical_period(&self, kind: PeriodKind, timestamp: i64) -> Option<Period> {
        let date = self.tz.timestamp_millis_opt(timestamp).single()?.date_naive();
        let first = match kind {
            PeriodKind::Day => date,
            PeriodKind::Month => date.with_day(1)?,
            PeriodKind::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)?,
        };
        let midnight = first.and_hms_opt(0, 0, 0)?;
        let start = self.tz.from_local_datetime(&midnight).earliest()?;
        Some(Period { kind, value: start.timestamp_millis() })
    }
}

/// Entries in the subtree below `path`.
pub fn subtree<'a>(entries: &'a [Entry], path: &[String]) -> Vec<&'a Entry> {
    filter::by_context(entries, path)
}

/// `entry` with the `path` prefix removed from its details. Entries outside
/// the subtree come back unchanged.
pub fn strip_context(mut entry: Entry, path: &[String]) -> Entry {
    if !path.is_empty() && entry.has_prefix(path) {
        entry.details.drain(..path.len());
    }
    entry
}

/// `entry` with `path` prepended to its details.
pub fn attach_context(mut entry: Entry, path: &[String]) -> Entry {
    if !path.is_empty() {
        entry.details.splice(0..0, path.iter().cloned());
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAN_15_NOON_UTC: i64 = 1_705_320_000_000;
    const JAN_1_UTC: i64 = 1_704_067_200_000;
    const DEC_31_23H_UTC: i64 = 1_704_063_600_000;

    fn path(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_temporal_context_is_its_own_period() {
        let mut resolver = ContextResolver::new(Tz::UTC);
        resolver.set(Context::period(PeriodKind::Month, JAN_15_NOON_UTC));

        assert_eq!(resolver.period(), Some(Period { kind: PeriodKind::Month, value: JAN_1_UTC }));
        assert!(resolver.path().is_empty());
    }

    #[test]
    fn test_task_inside_period_inherits_it() {
        let mut resolver = ContextResolver::new(Tz::UTC);
        resolver.push(Context::period(PeriodKind::Year, JAN_15_NOON_UTC));
        resolver.push(Context::task(path(&["ClientA"])));
        resolver.push(Context::task(path(&["ClientA", "ProjectX"])));

        assert_eq!(resolver.period(), Some(Period { kind: PeriodKind::Year, value: JAN_1_UTC }));
        assert_eq!(resolver.path(), path(&["ClientA", "ProjectX"]));

        resolver.pop();
        assert_eq!(resolver.path(), path(&["ClientA"]));
    }

    #[test]
    fn test_task_only_stack_has_no_period() {
        let mut resolver = ContextResolver::new(Tz::UTC);
        assert_eq!(resolver.period(), None);

        resolver.push(Context::task(path(&["ClientA"])));
        assert_eq!(resolver.period(), None);

        resolver.set(Context::period(PeriodKind::Day, JAN_15_NOON_UTC));
        resolver.push(Context::task(path(&["A"])));
        assert_eq!(resolver.period().map(|p| p.kind), Some(PeriodKind::Day));
    }

    #[test]
    fn test_canonical_period_uses_local_midnight() {
        // 23:00 UTC on Dec 31 is already Jan 1 in Berlin.
        let resolver = ContextResolver::new(Tz::Europe__Berlin);
        let period = resolver.canonical_period(PeriodKind::Year, DEC_31_23H_UTC).unwrap();
        assert_eq!(period.value, DEC_31_23H_UTC);

        let utc = ContextResolver::new(Tz::UTC);
        let day = utc.canonical_period(PeriodKind::Day, JAN_15_NOON_UTC).unwrap();
        assert_eq!(day.value, JAN_15_NOON_UTC - 12 * 3_600_000);
    }

    #[test]
    fn test_strip_and_attach_are_inverse() {
        let context = path(&["ClientA", "ProjectX"]);
        let entry = Entry::new(0, None, path(&["ClientA", "ProjectX", "Design"])).with_id("1");

        let stripped = strip_context(entry.clone(), &context);
        assert_eq!(stripped.details, path(&["Design"]));
        assert_eq!(attach_context(stripped, &context), entry);

        let outside = Entry::new(0, None, path(&["ClientB"]));
        assert_eq!(strip_context(outside.clone(), &context), outside);
    }

    #[test]
    fn test_subtree_matches_descendants() {
        let entries = vec![
            Entry::new(0, None, path(&["ClientA"])),
            Entry::new(1, None, path(&["ClientA", "Deep", "Deeper"])),
            Entry::new(2, None, path(&["ClientB"])),
        ];
        assert_eq!(subtree(&entries, &path(&["ClientA"])).len(), 2);
        assert_eq!(subtree(&entries, &[]).len(), 3);
    }
}
