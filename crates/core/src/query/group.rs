//! Group keys for `last = days | months | years | tasks`

use std::collections::HashSet;

use chrono::TimeZone;
use chrono_tz::Tz;
use timetrail_domain::constants::{DAY_KEY_FORMAT, MONTH_KEY_FORMAT, YEAR_KEY_FORMAT};
use timetrail_domain::{Entry, GroupBy};

/// Key of the group `entry` falls into.
///
/// Temporal keys are the local calendar date of `start`, truncated to the
/// unit. The task key is the detail segment right below the context; an
/// entry with no such segment lands in the `""` group.
pub fn group_key(entry: &Entry, group: GroupBy, depth: usize, tz: Tz) -> String {
    let format = match group {
        GroupBy::Tasks => return entry.detail_at(depth).unwrap_or_default().to_string(),
        GroupBy::Days => DAY_KEY_FORMAT,
        GroupBy::Months => MONTH_KEY_FORMAT,
        GroupBy::Years => YEAR_KEY_FORMAT,
    };
    tz.timestamp_millis_opt(entry.start)
        .single()
        .map(|local| local.format(format).to_string())
        .unwrap_or_default()
}

/// Distinct group keys in order of first appearance.
pub fn distinct_keys(entries: &[&Entry], group: GroupBy, depth: usize, tz: Tz) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|entry| group_key(entry, group, depth, tz))
        .filter(|key| seen.insert(key.clone()))
        .collect()
}
