//! Query parameters and the windowed response

use serde::{Deserialize, Serialize};

use super::entry::Entry;
use crate::impl_keyword_conversions;

/// Grouping unit requested through the `last` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Days,
    Months,
    Years,
    Tasks,
}

impl_keyword_conversions!(GroupBy {
    Days => "days",
    Months => "months",
    Years => "years",
    Tasks => "tasks",
});

/// Input to `get_entries`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<GroupBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn with_filter(mut self, tokens: Vec<String>) -> Self {
        self.filter = Some(tokens);
        self
    }

    #[must_use]
    pub fn with_last(mut self, group: GroupBy) -> Self {
        self.last = Some(group);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Active context, empty when none was given.
    pub fn context_path(&self) -> &[String] {
        self.context.as_deref().unwrap_or(&[])
    }
}

/// Neighbouring page content: entries when paginating entries, group keys
/// when grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageSlice {
    Entries(Vec<Entry>),
    Groups(Vec<String>),
}

impl PageSlice {
    pub fn len(&self) -> usize {
        match self {
            Self::Entries(entries) => entries.len(),
            Self::Groups(groups) => groups.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Entries (or group keys, when grouping) after filtering, before
    /// windowing.
    pub count: usize,
    pub limit: Option<usize>,
    pub offset: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<PageSlice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<PageSlice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupBy>,
}

/// Output of `get_entries`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntriesResponse {
    pub entries: Vec<Entry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<String>>,
    pub pagination: Pagination,
}
