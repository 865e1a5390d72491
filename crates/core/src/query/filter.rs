//! Context and token filtering
//!
//! Filtering runs in two stages: the context prefix first, then each
//! filter token in turn. A token that looks like a date (`YYYY`,
//! `MM.YYYY`, `DD.MM.YYYY`) is compared against the entry's local start
//! date; anything else is a case-insensitive substring search over the
//! detail segments below the context.

use chrono::{Datelike, TimeZone};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use timetrail_domain::Entry;

static DATE_TOKEN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(\d{4}|\d{1,2}\.\d{4}|\d{1,2}\.\d{1,2}\.\d{4})$").ok());

/// Parsed filter token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterToken {
    Year(i32),
    Month { month: u32, year: i32 },
    Day { day: u32, month: u32, year: i32 },
    /// Lowercased substring needle.
    Text(String),
}

impl FilterToken {
    /// Classify a raw token. Blank tokens yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.trim();
        if token.is_empty() {
            return None;
        }
        Some(parse_date(token).unwrap_or_else(|| Self::Text(token.to_lowercase())))
    }

    /// Whether `entry` passes this token. `depth` is the context length;
    /// text tokens only look at details below it.
    pub fn matches(&self, entry: &Entry, depth: usize, tz: Tz) -> bool {
        match self {
            Self::Text(needle) => entry
                .details
                .iter()
                .skip(depth)
                .any(|detail| detail.to_lowercase().contains(needle.as_str())),
            date => {
                let Some(local) = tz.timestamp_millis_opt(entry.start).single() else {
                    return false;
                };
                match *date {
                    Self::Year(year) => local.year() == year,
                    Self::Month { month, year } => local.year() == year && local.month() == month,
                    Self::Day { day, month, year } => {
                        local.year() == year && local.month() == month && local.day() == day
                    }
                    Self::Text(_) => false,
                }
            }
        }
    }
}

fn parse_date(token: &str) -> Option<FilterToken> {
    if !DATE_TOKEN.as_ref()?.is_match(token) {
        return None;
    }
    let parts: Vec<&str> = token.split('.').collect();
    match parts.as_slice() {
        [year] => Some(FilterToken::Year(year.parse().ok()?)),
        [month, year] => {
            Some(FilterToken::Month { month: month.parse().ok()?, year: year.parse().ok()? })
        }
        [day, month, year] => Some(FilterToken::Day {
            day: day.parse().ok()?,
            month: month.parse().ok()?,
            year: year.parse().ok()?,
        }),
        _ => None,
    }
}

/// Keep entries whose details start with `context`, segment by segment.
pub fn by_context<'a>(entries: &'a [Entry], context: &[String]) -> Vec<&'a Entry> {
    entries.iter().filter(|entry| entry.has_prefix(context)).collect()
}

/// Keep entries that pass every token. Blank tokens are ignored.
pub fn by_tokens<'a>(
    entries: Vec<&'a Entry>,
    tokens: &[String],
    depth: usize,
    tz: Tz,
) -> Vec<&'a Entry> {
    let tokens: Vec<FilterToken> = tokens.iter().filter_map(|raw| FilterToken::parse(raw)).collect();
    if tokens.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|entry| tokens.iter().all(|token| token.matches(entry, depth, tz)))
        .collect()
}
